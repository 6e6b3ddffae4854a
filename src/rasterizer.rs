//! Public rasterizer: outline fills and analytically stroked line segments.
//!
//! [`Rasterizer`] holds the clip rectangle and rendering flags. Outline
//! fills run through the scan converter; stroked segments are rasterized
//! directly from the stroke footprint, which is both faster and more
//! accurate than flattening a stroke outline into a polygon first.

use crate::basics::{FillingRule, PointD, RectI, COVER_FULL};
use crate::fixed::{Fixed, SubpixelPoint, SUBPIXEL_SCALE};
use crate::outline::{Outline, VertexTag};
use crate::scan_converter::{ScanConverter, COORD_OFFSET, COORD_ROUNDING};
use crate::span::{SpanBuffer, SpanConsumer};
use std::mem;

// ============================================================================
// Numeric helpers
// ============================================================================

/// Large finite slope substituted for divisions by zero.
const SLOPE_SENTINEL: f64 = i32::MAX as f64;

#[inline]
fn safe_divide(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        if x >= 0.0 {
            SLOPE_SENTINEL
        } else {
            -SLOPE_SENTINEL
        }
    } else {
        x / y
    }
}

/// True when both coordinates land on the same 26.6 subpixel.
#[inline]
fn subpixel_equal(p1: f64, p2: f64) -> bool {
    (p1 * SUBPIXEL_SCALE as f64) as i64 == (p2 * SUBPIXEL_SCALE as f64) as i64
}

/// Snaps a point down onto the 26.6 grid.
#[inline]
fn snap_to_subpixel_grid(p: PointD) -> PointD {
    PointD::new(
        (p.x * SUBPIXEL_SCALE as f64).floor() / SUBPIXEL_SCALE as f64,
        (p.y * SUBPIXEL_SCALE as f64).floor() / SUBPIXEL_SCALE as f64,
    )
}

// ============================================================================
// Rasterizer
// ============================================================================

pub struct Rasterizer {
    scan_converter: ScanConverter,
    clip: RectI,
    antialiased: bool,
    legacy_rounding: bool,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            scan_converter: ScanConverter::new(),
            clip: RectI::new(0, 0, -1, -1),
            antialiased: true,
            legacy_rounding: false,
        }
    }

    /// Sets the inclusive clip rectangle. Emitted spans never leave it.
    /// The left bound must be non-negative.
    pub fn clip_rect(&mut self, clip: RectI) {
        debug_assert!(!clip.is_valid() || clip.x1 >= 0);
        self.clip = clip;
    }

    /// Selects between exact analytic edge coverage and hard pixel-center
    /// sampling for strokes. Outline fills always emit full coverage.
    pub fn antialiased(&mut self, antialiased: bool) {
        self.antialiased = antialiased;
    }

    /// Biases aliased coordinates by half a pixel less one subpixel, for
    /// output that lines up with integer-rounding renderers.
    pub fn legacy_rounding(&mut self, legacy_rounding: bool) {
        self.legacy_rounding = legacy_rounding;
    }

    // ------------------------------------------------------------------
    // Outline fills
    // ------------------------------------------------------------------

    /// Fills an outline under the given rule, emitting coverage spans to
    /// `consumer`. Degenerate input (an empty outline, an invalid clip, an
    /// outline entirely outside the vertical window) produces no spans.
    pub fn rasterize<C: SpanConsumer>(
        &mut self,
        outline: &Outline,
        filling_rule: FillingRule,
        consumer: &mut C,
    ) {
        if outline.is_empty() || !self.clip.is_valid() {
            return;
        }

        let bounds = outline.bounding_rect();
        let rounding = if self.legacy_rounding {
            (COORD_OFFSET - COORD_ROUNDING) as f64 / SUBPIXEL_SCALE as f64
        } else {
            0.0
        };
        let top_bound = self.clip.y1.max((bounds.y1 + 0.5 + rounding) as i32);
        let bottom_bound = self.clip.y2.min((bounds.y2 - 0.5 + rounding) as i32);
        if top_bound > bottom_bound {
            return;
        }

        let mut buffer = SpanBuffer::new(consumer, self.clip);
        self.scan_converter.begin(
            top_bound,
            bottom_bound,
            self.clip.x1,
            self.clip.x2,
            filling_rule,
            self.legacy_rounding,
        );

        for contour in outline.contours() {
            if contour.len() < 2 {
                continue;
            }
            debug_assert!(contour[0].tag == VertexTag::OnCurve);
            let first = SubpixelPoint::from_f64(contour[0].x, contour[0].y);
            let mut last = first;
            let mut i = 1;
            while i < contour.len() {
                match contour[i].tag {
                    VertexTag::OnCurve => {
                        let p = SubpixelPoint::from_f64(contour[i].x, contour[i].y);
                        self.scan_converter.merge_line(last, p);
                        last = p;
                        i += 1;
                    }
                    VertexTag::Control => {
                        debug_assert!(
                            i + 2 < contour.len()
                                && contour[i + 1].tag == VertexTag::Control
                                && contour[i + 2].tag == VertexTag::OnCurve
                        );
                        if i + 2 >= contour.len() {
                            break;
                        }
                        let c1 = SubpixelPoint::from_f64(contour[i].x, contour[i].y);
                        let c2 = SubpixelPoint::from_f64(contour[i + 1].x, contour[i + 1].y);
                        let p = SubpixelPoint::from_f64(contour[i + 2].x, contour[i + 2].y);
                        self.scan_converter.merge_curve(last, c1, c2, p);
                        last = p;
                        i += 3;
                    }
                }
            }
            if last != first {
                self.scan_converter.merge_line(last, first);
            }
        }

        self.scan_converter.end(&mut buffer);
    }

    // ------------------------------------------------------------------
    // Stroked segments
    // ------------------------------------------------------------------

    /// Strokes the segment from `a` to `b` at `width` pixels, emitting
    /// coverage spans to `consumer`. `square_cap` extends both ends by half
    /// the width; otherwise the stroke is cut off flat at the endpoints.
    /// Zero-width and zero-length segments produce no spans.
    pub fn rasterize_line<C: SpanConsumer>(
        &mut self,
        a: PointD,
        b: PointD,
        width: f64,
        square_cap: bool,
        consumer: &mut C,
    ) {
        if !self.clip.is_valid() {
            return;
        }
        debug_assert!(width >= 0.0);
        if width <= 0.0 || (a.x == b.x && a.y == b.y) {
            return;
        }

        let mut buffer = SpanBuffer::new(consumer, self.clip);

        let mut pa = a;
        let mut pb = b;
        let half_width = 0.5 * width;

        let length = ((b.x - a.x) * (b.x - a.x) + (b.y - a.y) * (b.y - a.y)).sqrt();
        let unit_x = (b.x - a.x) / length;
        let unit_y = (b.y - a.y) / length;

        if square_cap {
            pa.x -= half_width * unit_x;
            pa.y -= half_width * unit_y;
            pb.x += half_width * unit_x;
            pb.y += half_width * unit_y;
        }

        // the stroke reaches half a width beyond the segment; clip against
        // the rectangle grown by that margin
        let margin_x = half_width * unit_y.abs();
        let margin_y = half_width * unit_x.abs();
        let low = [
            self.clip.x1 as f64 - margin_x,
            self.clip.y1 as f64 - margin_y,
        ];
        let high = [
            (self.clip.x2 + 1) as f64 + margin_x,
            (self.clip.y2 + 1) as f64 + margin_y,
        ];
        let inside =
            |p: PointD| p.x >= low[0] && p.x <= high[0] && p.y >= low[1] && p.y <= high[1];

        if !inside(pa) || !inside(pb) {
            let origin = [pa.x, pa.y];
            let delta = [pb.x - pa.x, pb.y - pa.y];
            let mut t1 = 0.0f64;
            let mut t2 = 1.0f64;
            for i in 0..2 {
                if delta[i] == 0.0 {
                    if origin[i] <= low[i] || origin[i] >= high[i] {
                        return;
                    }
                    continue;
                }
                let inv = 1.0 / delta[i];
                let mut t_low = (low[i] - origin[i]) * inv;
                let mut t_high = (high[i] - origin[i]) * inv;
                if t_low > t_high {
                    mem::swap(&mut t_low, &mut t_high);
                }
                t1 = t1.max(t_low);
                t2 = t2.min(t_high);
                if t1 >= t2 {
                    return;
                }
            }
            let clipped_a = PointD::new(pa.x + delta[0] * t1, pa.y + delta[1] * t1);
            let clipped_b = PointD::new(pa.x + delta[0] * t2, pa.y + delta[1] * t2);
            pa = clipped_a;
            pb = clipped_b;
        }

        if !self.antialiased && self.legacy_rounding {
            let bias = (COORD_OFFSET - COORD_ROUNDING) as f64 / SUBPIXEL_SCALE as f64;
            pa.x += bias;
            pa.y += bias;
            pb.x += bias;
            pb.y += bias;
        }

        if subpixel_equal(pa.x, pb.x) {
            // vertical
            if pa.y > pb.y {
                mem::swap(&mut pa, &mut pb);
            }
            let left = (pa.x - half_width)
                .clamp(self.clip.x1 as f64, (self.clip.x2 + 1) as f64);
            let right = (pa.x + half_width)
                .clamp(self.clip.x1 as f64, (self.clip.x2 + 1) as f64);
            let top = pa.y.clamp(self.clip.y1 as f64, (self.clip.y2 + 1) as f64);
            let bottom = pb.y.clamp(self.clip.y1 as f64, (self.clip.y2 + 1) as f64);
            if subpixel_equal(left, right) || subpixel_equal(top, bottom) {
                return;
            }
            if self.antialiased {
                self.fill_rect_aa(left, top, right, bottom, &mut buffer);
            } else {
                self.fill_rect_aliased(left, top, right, bottom, &mut buffer);
            }
        } else if subpixel_equal(pa.y, pb.y) {
            // horizontal
            if pa.x > pb.x {
                mem::swap(&mut pa, &mut pb);
            }
            let top = (pa.y - half_width)
                .clamp(self.clip.y1 as f64, (self.clip.y2 + 1) as f64);
            let bottom = (pa.y + half_width)
                .clamp(self.clip.y1 as f64, (self.clip.y2 + 1) as f64);
            let left = pa.x.clamp(self.clip.x1 as f64, (self.clip.x2 + 1) as f64);
            let right = pb.x.clamp(self.clip.x1 as f64, (self.clip.x2 + 1) as f64);
            if subpixel_equal(top, bottom) || subpixel_equal(left, right) {
                return;
            }
            if self.antialiased {
                self.fill_rect_aa(left, top, right, bottom, &mut buffer);
            } else {
                self.fill_rect_aliased(left, top, right, bottom, &mut buffer);
            }
        } else {
            // oblique: walk the stroke quadrilateral
            if pa.y > pb.y {
                mem::swap(&mut pa, &mut pb);
            }
            let delta_x = pb.x - pa.x;
            let delta_y = pb.y - pa.y;
            let scale = half_width / (delta_x * delta_x + delta_y * delta_y).sqrt();
            let perp_x = delta_y * scale;
            let perp_y = -delta_x * scale;

            let (top, left, right, bottom) = if pa.x < pb.x {
                (
                    snap_to_subpixel_grid(PointD::new(pa.x + perp_x, pa.y + perp_y)),
                    snap_to_subpixel_grid(PointD::new(pa.x - perp_x, pa.y - perp_y)),
                    snap_to_subpixel_grid(PointD::new(pb.x + perp_x, pb.y + perp_y)),
                    snap_to_subpixel_grid(PointD::new(pb.x - perp_x, pb.y - perp_y)),
                )
            } else {
                (
                    snap_to_subpixel_grid(PointD::new(pa.x - perp_x, pa.y - perp_y)),
                    snap_to_subpixel_grid(PointD::new(pb.x - perp_x, pb.y - perp_y)),
                    snap_to_subpixel_grid(PointD::new(pa.x + perp_x, pa.y + perp_y)),
                    snap_to_subpixel_grid(PointD::new(pb.x + perp_x, pb.y + perp_y)),
                )
            };

            let top_left_slope = safe_divide(left.x - top.x, left.y - top.y);
            let bottom_left_slope = safe_divide(bottom.x - left.x, bottom.y - left.y);
            let top_right_slope = safe_divide(right.x - top.x, right.y - top.y);
            let bottom_right_slope = safe_divide(bottom.x - right.x, bottom.y - right.y);

            if self.antialiased {
                self.stroke_oblique_aa(
                    top,
                    left,
                    right,
                    bottom,
                    top_left_slope,
                    bottom_left_slope,
                    top_right_slope,
                    bottom_right_slope,
                    &mut buffer,
                );
            } else {
                self.stroke_oblique_aliased(
                    top,
                    left,
                    right,
                    bottom,
                    top_left_slope,
                    bottom_left_slope,
                    top_right_slope,
                    bottom_right_slope,
                    &mut buffer,
                );
            }
        }
    }

    /// Exact coverage for an axis-aligned rectangle whose bounds are already
    /// clamped inside the clip rectangle.
    fn fill_rect_aa(
        &self,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        buffer: &mut SpanBuffer<'_>,
    ) {
        let i_left = left as i32;
        let i_right = right as i32;

        // up to three column strips: fractional left, full middle,
        // fractional right; coverage is the 255-scaled covered width
        let mut n = 1usize;
        let mut x = [0i32; 3];
        let mut len = [0i32; 3];
        let mut coverage = [0i32; 3];

        if i_left == i_right {
            x[0] = i_left;
            len[0] = 1;
            coverage[0] = (Fixed::from_f64(right) - Fixed::from_f64(left)).raw() * 255;
        } else {
            let left_width = Fixed::from_int(i_left + 1) - Fixed::from_f64(left);
            let right_width = Fixed::from_f64(right) - Fixed::from_int(i_right);
            x[0] = i_left;
            len[0] = 1;
            coverage[0] = left_width.raw() * 255;
            if left_width == Fixed::ONE {
                len[0] = i_right - i_left;
            } else if i_right - i_left > 1 {
                x[1] = i_left + 1;
                len[1] = i_right - i_left - 1;
                coverage[1] = (COVER_FULL as i32) << 16;
                n = 2;
            }
            if right_width > Fixed::ZERO {
                x[n] = i_right;
                len[n] = 1;
                coverage[n] = right_width.raw() * 255;
                n += 1;
            }
        }

        let top_fp = Fixed::from_f64(top);
        let bottom_fp = Fixed::from_f64(bottom);
        let last_row = (bottom.ceil() as i32 - 1).min(self.clip.y2);
        for yi in (top as i32)..=last_row {
            let row = Fixed::from_int(yi);
            let row_height = (row + Fixed::ONE).min(bottom_fp) - row.max(top_fp);
            if row_height <= Fixed::ZERO {
                continue;
            }
            for i in 0..n {
                let c = ((row_height.raw() as i64 * coverage[i] as i64) >> 32) as u32;
                buffer.add_span(x[i], len[i], yi, c);
            }
        }
    }

    /// Hard pixel-center sampling of an axis-aligned rectangle with clamped
    /// bounds.
    fn fill_rect_aliased(
        &self,
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        buffer: &mut SpanBuffer<'_>,
    ) {
        let i_top = (top + 0.5) as i32;
        let i_bottom = if bottom < 0.5 { -1 } else { (bottom - 0.5) as i32 };
        let i_left = (left + 0.5) as i32;
        let i_right = if right < 0.5 { -1 } else { (right - 0.5) as i32 };

        let len = i_right - i_left + 1;
        for yi in i_top..=i_bottom {
            buffer.add_span(i_left, len, yi, COVER_FULL as u32);
        }
    }

    /// Exact per-pixel coverage of the stroke quadrilateral. Each scanline
    /// is cut into a horizontal strip; the covered area of a pixel is the
    /// area right of the left boundary chain minus the area right of the
    /// right boundary chain.
    #[allow(clippy::too_many_arguments)]
    fn stroke_oblique_aa(
        &self,
        top: PointD,
        left: PointD,
        right: PointD,
        bottom: PointD,
        top_left_slope: f64,
        bottom_left_slope: f64,
        top_right_slope: f64,
        bottom_right_slope: f64,
        buffer: &mut SpanBuffer<'_>,
    ) {
        let top_fp = Fixed::from_f64(top.y);
        let bottom_fp = Fixed::from_f64(bottom.y);

        let first_row = self.clip.y1.max(top.y as i32);
        let last_row = self.clip.y2.min(bottom.y.ceil() as i32 - 1);

        for yi in first_row..=last_row {
            let row = Fixed::from_int(yi);
            let strip_top = row.max(top_fp);
            let strip_bottom = (row + Fixed::ONE).min(bottom_fp);
            if strip_bottom <= strip_top {
                continue;
            }
            let height = strip_bottom - strip_top;

            let left_chain = chain_strips(
                top,
                left,
                top_left_slope,
                bottom_left_slope,
                strip_top,
                strip_bottom,
            );
            let right_chain = chain_strips(
                top,
                right,
                top_right_slope,
                bottom_right_slope,
                strip_top,
                strip_bottom,
            );
            let (left_min, left_max) = chain_extent(&left_chain);
            let (right_min, right_max) = chain_extent(&right_chain);

            let last = right_max.min(self.clip.x2);
            let mut xi = left_min.max(self.clip.x1);
            while xi <= last {
                if xi > left_max && xi < right_min {
                    // interior run at full strip coverage
                    let run_end = right_min.min(last + 1);
                    let c = ((height.raw() as i64 * 255) >> 16) as u32;
                    buffer.add_span(xi, run_end - xi, yi, c);
                    xi = run_end;
                    continue;
                }
                let covered_left = if xi > left_max {
                    height
                } else {
                    chain_area(xi, &left_chain)
                };
                let covered_right = if xi < right_min {
                    Fixed::ZERO
                } else {
                    chain_area(xi, &right_chain)
                };
                let coverage = (covered_left - covered_right).max(Fixed::ZERO);
                buffer.add_span(xi, 1, yi, ((coverage.raw() as i64 * 255) >> 16) as u32);
                xi += 1;
            }
        }
    }

    /// Pixel-center sampling of the stroke quadrilateral: four row phases
    /// bounded by the corner scanlines, with incrementally stepped boundary
    /// walkers shared across phases.
    #[allow(clippy::too_many_arguments)]
    fn stroke_oblique_aliased(
        &self,
        top: PointD,
        left: PointD,
        right: PointD,
        bottom: PointD,
        top_left_slope: f64,
        bottom_left_slope: f64,
        top_right_slope: f64,
        bottom_right_slope: f64,
        buffer: &mut SpanBuffer<'_>,
    ) {
        let i_top = self.clip.y1.max((top.y + 0.5) as i32);
        let i_bottom = self
            .clip
            .y2
            .min(if bottom.y < 0.5 { -1 } else { (bottom.y - 0.5) as i32 });
        let i_left = if left.y < 0.5 { -1 } else { (left.y - 0.5) as i32 };
        let i_right = if right.y < 0.5 { -1 } else { (right.y - 0.5) as i32 };
        let i_middle = i_left.min(i_right);

        // each walker is anchored at the first row it will be read on
        let mut left_a = Fixed::from_f64(top.x + (i_top as f64 + 0.5 - top.y) * top_left_slope);
        let mut right_a = Fixed::from_f64(top.x + (i_top as f64 + 0.5 - top.y) * top_right_slope);
        let mut left_b = Fixed::from_f64(
            left.x + (i_top.max(i_left + 1) as f64 + 0.5 - left.y) * bottom_left_slope,
        );
        let mut right_b = Fixed::from_f64(
            right.x + (i_top.max(i_right + 1) as f64 + 0.5 - right.y) * bottom_right_slope,
        );

        let top_left_delta = Fixed::from_f64(top_left_slope);
        let bottom_left_delta = Fixed::from_f64(bottom_left_slope);
        let top_right_delta = Fixed::from_f64(top_right_slope);
        let bottom_right_delta = Fixed::from_f64(bottom_right_slope);

        let mut y = i_top;
        self.aliased_quad_rows(
            &mut y,
            i_middle.min(i_bottom) + 1,
            &mut left_a,
            &mut right_a,
            top_left_delta,
            top_right_delta,
            buffer,
        );
        self.aliased_quad_rows(
            &mut y,
            i_right.min(i_bottom) + 1,
            &mut left_b,
            &mut right_a,
            bottom_left_delta,
            top_right_delta,
            buffer,
        );
        self.aliased_quad_rows(
            &mut y,
            i_left.min(i_bottom) + 1,
            &mut left_a,
            &mut right_b,
            top_left_delta,
            bottom_right_delta,
            buffer,
        );
        self.aliased_quad_rows(
            &mut y,
            i_bottom + 1,
            &mut left_b,
            &mut right_b,
            bottom_left_delta,
            bottom_right_delta,
            buffer,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn aliased_quad_rows(
        &self,
        y: &mut i32,
        end: i32,
        left: &mut Fixed,
        right: &mut Fixed,
        left_delta: Fixed,
        right_delta: Fixed,
        buffer: &mut SpanBuffer<'_>,
    ) {
        while *y < end {
            let x1 = left.to_int().max(self.clip.x1);
            let x2 = right.to_int().min(self.clip.x2);
            buffer.add_span(x1, x2 - x1 + 1, *y, COVER_FULL as u32);
            *left = *left + left_delta;
            *right = *right + right_delta;
            *y += 1;
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Oblique stroke coverage
// ============================================================================

/// One quad boundary edge restricted to a horizontal strip: X positions at
/// the strip top and bottom, in 16.16.
#[derive(Debug, Clone, Copy)]
struct EdgeStrip {
    top: Fixed,
    bottom: Fixed,
    x_top: Fixed,
    x_bottom: Fixed,
}

/// Cuts a two-edge boundary chain (apex edge down to the mid corner, base
/// edge below it) to the strip, yielding the sub-strips each edge covers.
/// The two parts partition the strip; one is empty when the corner lies
/// outside it.
fn chain_strips(
    apex: PointD,
    mid: PointD,
    apex_slope: f64,
    base_slope: f64,
    strip_top: Fixed,
    strip_bottom: Fixed,
) -> [Option<EdgeStrip>; 2] {
    let mid_y = Fixed::from_f64(mid.y);
    let apex_bottom = strip_bottom.min(mid_y);
    let base_top = strip_top.max(mid_y);
    let mut parts = [None, None];
    if apex_bottom > strip_top {
        parts[0] = Some(EdgeStrip {
            top: strip_top,
            bottom: apex_bottom,
            x_top: Fixed::from_f64(apex.x + (strip_top.to_f64() - apex.y) * apex_slope),
            x_bottom: Fixed::from_f64(apex.x + (apex_bottom.to_f64() - apex.y) * apex_slope),
        });
    }
    if strip_bottom > base_top {
        parts[1] = Some(EdgeStrip {
            top: base_top,
            bottom: strip_bottom,
            x_top: Fixed::from_f64(mid.x + (base_top.to_f64() - mid.y) * base_slope),
            x_bottom: Fixed::from_f64(mid.x + (strip_bottom.to_f64() - mid.y) * base_slope),
        });
    }
    parts
}

/// Integer pixel range a chain touches within its strip.
fn chain_extent(strips: &[Option<EdgeStrip>; 2]) -> (i32, i32) {
    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for s in strips.iter().flatten() {
        min = min.min(s.x_top.min(s.x_bottom).to_int());
        max = max.max(s.x_top.max(s.x_bottom).to_int());
    }
    (min, max)
}

/// Area right of the chain within pixel column `x`, summed over the chain's
/// sub-strips.
fn chain_area(x: i32, strips: &[Option<EdgeStrip>; 2]) -> Fixed {
    let mut area = Fixed::ZERO;
    for s in strips.iter().flatten() {
        area = area + area_right_of_edge(x, s);
    }
    area
}

/// Area of pixel column `x` within the strip that lies right of the edge.
/// The full column area equals the strip height.
fn area_right_of_edge(x: i32, s: &EdgeStrip) -> Fixed {
    let h = s.bottom - s.top;
    let px0 = Fixed::from_int(x);
    let px1 = px0 + Fixed::ONE;

    let lo = s.x_top.min(s.x_bottom);
    let hi = s.x_top.max(s.x_bottom);
    if hi <= px0 {
        return h;
    }
    if lo >= px1 {
        return Fixed::ZERO;
    }

    let h_raw = h.raw() as i64;
    let dxe = s.x_bottom.raw() as i64 - s.x_top.raw() as i64;
    if dxe == 0 {
        let w = (px1 - s.x_top).clamp(Fixed::ZERO, Fixed::ONE);
        return Fixed::from_raw(((h_raw * w.raw() as i64) >> 16) as i32);
    }

    // row offsets (16.16, relative to the strip top) where the edge crosses
    // the two pixel borders
    let y_at = |border: Fixed| -> i64 {
        ((border.raw() as i64 - s.x_top.raw() as i64) * h_raw / dxe).clamp(0, h_raw)
    };
    // covered width of the column at a row offset
    let w_at = |dy: i64| -> i64 {
        let edge_x = s.x_top.raw() as i64 + dxe * dy / h_raw;
        (px1.raw() as i64 - edge_x).clamp(0, Fixed::ONE.raw() as i64)
    };

    // piecewise linear width: constant outside the crossings, a trapezoid
    // between them
    let t0 = y_at(px0).min(y_at(px1));
    let t1 = y_at(px0).max(y_at(px1));
    let mut area = t0 * w_at(0);
    area += (t1 - t0) * ((w_at(t0) + w_at(t1)) >> 1);
    area += (h_raw - t1) * w_at(h_raw);
    Fixed::from_raw((area >> 16) as i32)
}

// ============================================================================
// Tests
// ============================================================================
