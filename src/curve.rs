//! Cubic Bezier flattening by adaptive midpoint subdivision.

use crate::fixed::{SubpixelPoint, SUBPIXEL_SCALE};

/// Maximum subdivision depth; a segment this deep is emitted as-is.
pub const MAX_SPLITS: usize = 32;

/// Flatness threshold, a quarter pixel in 26.6 units.
const FLATNESS_LIMIT: i64 = 16;

/// Subdivides a cubic Bezier until every piece is flat, invoking `sink`
/// with the endpoints of each flat sub-segment.
///
/// The flatness test adapts to chord length: chords longer than one pixel
/// compare the control-point cross products against the chord, while
/// shorter chords fall back to summed control-point deviation, which stays
/// meaningful as the chord collapses. Sub-segments are produced from the
/// far end of the curve toward the start; each one is directed along the
/// curve, so winding is preserved no matter the emission order.
pub fn flatten_cubic<F>(
    pa: SubpixelPoint,
    pb: SubpixelPoint,
    pc: SubpixelPoint,
    pd: SubpixelPoint,
    sink: &mut F,
) where
    F: FnMut(SubpixelPoint, SubpixelPoint),
{
    let mut beziers = [SubpixelPoint::default(); 4 + 3 * MAX_SPLITS];
    beziers[0] = pa;
    beziers[1] = pb;
    beziers[2] = pc;
    beziers[3] = pd;

    let end = 3 * MAX_SPLITS;
    let mut b = 0isize;
    while b >= 0 {
        let i = b as usize;
        let delta_x = beziers[i + 3].x - beziers[i].x;
        let delta_y = beziers[i + 3].y - beziers[i].y;
        let l = delta_x.abs() + delta_y.abs();

        let flat = if l > SUBPIXEL_SCALE {
            let d2 = ((beziers[i + 1].x - beziers[i].x) * delta_y
                - (beziers[i + 1].y - beziers[i].y) * delta_x)
                .abs();
            let d3 = ((beziers[i + 2].x - beziers[i].x) * delta_y
                - (beziers[i + 2].y - beziers[i].y) * delta_x)
                .abs();
            d2 + d3 <= FLATNESS_LIMIT * l
        } else {
            let d = (beziers[i].x - beziers[i + 1].x).abs()
                + (beziers[i].y - beziers[i + 1].y).abs()
                + (beziers[i].x - beziers[i + 2].x).abs()
                + (beziers[i].y - beziers[i + 2].y).abs();
            d <= FLATNESS_LIMIT
        };

        if i == end || flat {
            sink(beziers[i], beziers[i + 3]);
            b -= 3;
        } else {
            split(&mut beziers[i..i + 7]);
            b += 3;
        }
    }
}

/// Midpoint De Casteljau split, in place: the first half lands in `b[0..4]`,
/// the second half in `b[3..7]`, sharing the curve midpoint at `b[3]`.
fn split(b: &mut [SubpixelPoint]) {
    b[6] = b[3];

    let temp_x = (b[1].x + b[2].x) / 2;
    b[1].x = (b[0].x + b[1].x) / 2;
    b[5].x = (b[2].x + b[3].x) / 2;
    b[2].x = (b[1].x + temp_x) / 2;
    b[4].x = (b[5].x + temp_x) / 2;
    b[3].x = (b[2].x + b[4].x) / 2;

    let temp_y = (b[1].y + b[2].y) / 2;
    b[1].y = (b[0].y + b[1].y) / 2;
    b[5].y = (b[2].y + b[3].y) / 2;
    b[2].y = (b[1].y + temp_y) / 2;
    b[4].y = (b[5].y + temp_y) / 2;
    b[3].y = (b[2].y + b[4].y) / 2;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects sink output in forward curve order.
    fn flatten(
        pa: SubpixelPoint,
        pb: SubpixelPoint,
        pc: SubpixelPoint,
        pd: SubpixelPoint,
    ) -> Vec<(SubpixelPoint, SubpixelPoint)> {
        let mut segments = Vec::new();
        flatten_cubic(pa, pb, pc, pd, &mut |p0, p1| segments.push((p0, p1)));
        segments.reverse();
        segments
    }

    #[test]
    fn test_collinear_controls_emit_one_segment() {
        let segments = flatten(
            SubpixelPoint::new(0, 0),
            SubpixelPoint::new(64, 64),
            SubpixelPoint::new(128, 128),
            SubpixelPoint::new(192, 192),
        );
        assert_eq!(segments, vec![(SubpixelPoint::new(0, 0), SubpixelPoint::new(192, 192))]);
    }

    #[test]
    fn test_segments_chain_and_cover_the_curve() {
        let pa = SubpixelPoint::new(0, 0);
        let pd = SubpixelPoint::new(256, 0);
        let segments = flatten(
            pa,
            SubpixelPoint::new(0, 256),
            SubpixelPoint::new(256, 256),
            pd,
        );
        assert!(segments.len() > 1);
        assert_eq!(segments[0].0, pa);
        assert_eq!(segments[segments.len() - 1].1, pd);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_first_split_midpoint_is_a_segment_endpoint() {
        // B(1/2) = (p0 + 3 p1 + 3 p2 + p3) / 8 = (192, 96) for this arch
        let segments = flatten(
            SubpixelPoint::new(0, 0),
            SubpixelPoint::new(128, 128),
            SubpixelPoint::new(256, 128),
            SubpixelPoint::new(384, 0),
        );
        assert!(segments.len() > 1);
        let midpoint = SubpixelPoint::new(192, 96);
        assert!(segments.iter().any(|&(_, p1)| p1 == midpoint));
    }

    #[test]
    fn test_degenerate_curve_emits_single_point_segment() {
        let p = SubpixelPoint::new(100, 100);
        let segments = flatten(p, p, p, p);
        assert_eq!(segments, vec![(p, p)]);
    }

    #[test]
    fn test_cusp_terminates_and_chains() {
        let pa = SubpixelPoint::new(0, 0);
        let pd = SubpixelPoint::new(64, 0);
        let segments = flatten(
            pa,
            SubpixelPoint::new(0, 640_000),
            SubpixelPoint::new(0, -640_000),
            pd,
        );
        assert!(!segments.is_empty());
        assert!(segments.len() < 100_000);
        assert_eq!(segments[0].0, pa);
        assert_eq!(segments[segments.len() - 1].1, pd);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }
}
