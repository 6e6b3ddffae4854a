//! Edge accumulation and scan conversion.
//!
//! Callers drive a small state machine: [`ScanConverter::begin`] configures
//! the scan window and fill rule, [`ScanConverter::merge_line`] and
//! [`ScanConverter::merge_curve`] accumulate direction-normalized, clipped
//! edges, and [`ScanConverter::end`] converts the edge set into coverage
//! spans. Two strategies sit behind `end`: a classic active edge list for
//! small edge counts, and a chunked intersection tree that keeps scratch
//! memory proportional to a 64-scanline window for large ones.

use crate::basics::FillingRule;
use crate::curve::flatten_cubic;
use crate::fixed::{Fixed, SubpixelPoint, SUBPIXEL_SCALE, SUBPIXEL_SHIFT, SUBPIXEL_TO_FIXED_SHIFT};
use crate::span::SpanBuffer;
use core::mem;

/// Edge-count threshold at or below which `end` uses the active edge list.
const SIMPLE_EDGE_LIMIT: usize = 32;
/// Scanline rows per intersection-tree chunk.
const CHUNK_SIZE: i32 = 64;
/// Scratch buffers beyond this many entries are shrunk back after a call.
const SCRATCH_LIMIT: usize = 1024;

/// Half a pixel in 26.6 units; centers coordinates on pixel midpoints.
pub(crate) const COORD_OFFSET: i64 = SUBPIXEL_SCALE / 2;
/// Extra truncation bias applied under legacy rounding.
pub(crate) const COORD_ROUNDING: i64 = 1;

// ============================================================================
// Edge
// ============================================================================

/// One monotonic-in-Y edge, clipped to the scan window.
///
/// `x` is the 16.16 crossing at the center of scanline `top`; `delta` is the
/// per-scanline increment. Boundary-pinned edges produced by clipping are
/// vertical (`delta == 0`) and carry the winding of the geometry they
/// replaced.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: Fixed,
    delta: Fixed,
    top: i32,
    bottom: i32,
    winding: i32,
}

// ============================================================================
// Intersection
// ============================================================================

/// One scanline crossing in the chunked strategy: a search-tree node keyed
/// by integer X. Child links are offsets relative to the node's own arena
/// index, zero meaning no child; entry zero of each row is a sentinel root
/// at X zero, which is why the scan window may not extend left of zero.
#[derive(Debug, Clone, Copy, Default)]
struct Intersection {
    x: i32,
    winding: i32,
    left: i32,
    right: i32,
}

// ============================================================================
// ScanConverter
// ============================================================================

pub struct ScanConverter {
    edges: Vec<Edge>,
    active: Vec<usize>,
    intersections: Vec<Intersection>,
    size: usize,

    top: i32,
    bottom: i32,
    left_fp: Fixed,
    right_fp: Fixed,
    fill_rule_mask: i32,
    legacy_rounding: bool,
}

impl ScanConverter {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            active: Vec::new(),
            intersections: Vec::new(),
            size: 0,
            top: 0,
            bottom: -1,
            left_fp: Fixed::ZERO,
            right_fp: Fixed::ZERO,
            fill_rule_mask: !0,
            legacy_rounding: false,
        }
    }

    /// Configures the scan window and fill rule for one conversion.
    ///
    /// `top..=bottom` are the scanlines to produce, `left..=right` the
    /// pixel columns. `left` must be non-negative.
    pub fn begin(
        &mut self,
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
        filling_rule: FillingRule,
        legacy_rounding: bool,
    ) {
        debug_assert!(left >= 0);
        self.top = top;
        self.bottom = bottom;
        self.left_fp = Fixed::from_int(left);
        self.right_fp = Fixed::from_int(right + 1);
        self.fill_rule_mask = match filling_rule {
            FillingRule::NonZero => !0,
            FillingRule::EvenOdd => 0x1,
        };
        self.legacy_rounding = legacy_rounding;
        self.edges.clear();
    }

    /// Adds one directed edge, normalized top-to-bottom and clipped to the
    /// scan window. Geometry clipped away horizontally is folded into
    /// boundary-pinned vertical edges so its winding still counts.
    pub fn merge_line(&mut self, a: SubpixelPoint, b: SubpixelPoint) {
        let (mut a, mut b) = (a, b);
        let mut winding = 1;
        if a.y > b.y {
            mem::swap(&mut a, &mut b);
            winding = -1;
        }

        if self.legacy_rounding {
            a.x += COORD_OFFSET;
            a.y += COORD_OFFSET;
            b.x += COORD_OFFSET;
            b.y += COORD_OFFSET;
        }
        let rounding = if self.legacy_rounding { COORD_ROUNDING } else { 0 };

        // first and last scanline whose center the edge crosses
        let top = ((a.y + COORD_OFFSET - rounding) >> SUBPIXEL_SHIFT).max(self.top as i64);
        let bottom = ((b.y - COORD_OFFSET - rounding) >> SUBPIXEL_SHIFT).min(self.bottom as i64);
        if top > bottom {
            return;
        }
        let top = top as i32;
        let bottom = bottom as i32;

        let a_fp = Fixed::saturating_from_raw(
            Fixed::HALF.raw() as i64 + (a.x << SUBPIXEL_TO_FIXED_SHIFT) - rounding,
        );

        if b.x == a.x {
            self.edges.push(Edge {
                x: a_fp.clamp(self.left_fp, self.right_fp),
                delta: Fixed::ZERO,
                top,
                bottom,
                winding,
            });
        } else {
            let slope = (b.x - a.x) as f64 / (b.y - a.y) as f64;
            let delta = Fixed::from_f64(slope);

            // crossing at the center of scanline `top`
            let first_center = ((top as i64) << 16) + Fixed::HALF.raw() as i64
                - (a.y << SUBPIXEL_TO_FIXED_SHIFT);
            let x = Fixed::saturating_from_raw(
                a_fp.raw() as i64 + ((delta.raw() as i64 * first_center) >> 16),
            );

            let mut edge = Edge {
                x,
                delta,
                top,
                bottom,
                winding,
            };
            if self.clip_edge(&mut edge, self.left_fp) {
                return;
            }
            if self.clip_edge(&mut edge, self.right_fp) {
                return;
            }
            debug_assert!(edge.x >= self.left_fp);
            self.edges.push(edge);
        }
    }

    /// Adds a cubic Bezier, flattened to the shared tolerance and routed
    /// through [`Self::merge_line`] segment by segment.
    pub fn merge_curve(
        &mut self,
        pa: SubpixelPoint,
        pb: SubpixelPoint,
        pc: SubpixelPoint,
        pd: SubpixelPoint,
    ) {
        flatten_cubic(pa, pb, pc, pd, &mut |p0, p1| self.merge_line(p0, p1));
    }

    /// Scan-converts the accumulated edges into `buffer`, then resets the
    /// edge set for the next `begin`.
    pub fn end(&mut self, buffer: &mut SpanBuffer<'_>) {
        if !self.edges.is_empty() {
            if self.edges.len() <= SIMPLE_EDGE_LIMIT {
                if self.edges.iter().all(|e| e.delta == Fixed::ZERO) {
                    self.scan_convert::<true>(buffer);
                } else {
                    self.scan_convert::<false>(buffer);
                }
            } else {
                self.scan_convert_chunked(buffer);
            }
        }

        // scratch that ballooned on a pathological input is released here
        if self.intersections.len() > SCRATCH_LIMIT {
            self.intersections = Vec::new();
            self.size = 0;
        }
        if self.edges.len() > SCRATCH_LIMIT {
            self.edges.truncate(SCRATCH_LIMIT);
            self.edges.shrink_to(SCRATCH_LIMIT);
        }
        self.edges.clear();
        self.active.clear();
    }

    /// Clips a sloped edge against one vertical boundary. Outside portions
    /// become boundary-pinned vertical edges so their winding survives.
    /// Returns `true` when the edge has been consumed entirely.
    fn clip_edge(&mut self, edge: &mut Edge, boundary: Fixed) -> bool {
        let right = boundary == self.right_fp;

        // starts exactly on the boundary: keep only when sloping inward
        if edge.x == boundary {
            if (edge.delta > Fixed::ZERO) ^ right {
                return false;
            }
            self.edges.push(Edge {
                x: boundary,
                delta: Fixed::ZERO,
                ..*edge
            });
            return true;
        }

        let last = edge.x + edge.delta.mul_int(edge.bottom - edge.top);

        // ends exactly on the boundary: keep only when arriving from inside
        if last == boundary {
            if (edge.delta < Fixed::ZERO) ^ right {
                return false;
            }
            self.edges.push(Edge {
                x: boundary,
                delta: Fixed::ZERO,
                ..*edge
            });
            return true;
        }

        if (last < boundary) ^ (edge.x < boundary) {
            // crosses the boundary: pin the outside part, keep the rest
            let delta_y = Fixed::from_raw(
                ((boundary.raw() - edge.x.raw()) as f64 / edge.delta.to_f64()) as i32,
            );

            if (edge.x < boundary) ^ right {
                // outside above the crossing
                let height = (delta_y + Fixed::from_raw(1)).to_int();
                let middle = edge.top + height;
                self.edges.push(Edge {
                    x: boundary,
                    delta: Fixed::ZERO,
                    top: edge.top,
                    bottom: middle,
                    winding: edge.winding,
                });
                if middle == edge.bottom {
                    return true;
                }
                edge.x = edge.x + edge.delta.mul_int(height + 1);
                edge.top = middle + 1;
            } else {
                // outside below the crossing
                let height = delta_y.to_int();
                let middle = edge.top + height;
                if middle != edge.bottom {
                    self.edges.push(Edge {
                        x: boundary,
                        delta: Fixed::ZERO,
                        top: middle + 1,
                        bottom: edge.bottom,
                        winding: edge.winding,
                    });
                    edge.bottom = middle;
                }
            }
            false
        } else if (edge.x < boundary) ^ right {
            // entirely outside
            self.edges.push(Edge {
                x: boundary,
                delta: Fixed::ZERO,
                ..*edge
            });
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Active edge list strategy
    // ------------------------------------------------------------------

    /// Sweeps an active edge list over the scan window. `ALL_VERTICAL`
    /// is a monomorphized fast path: vertical edges keep their admission
    /// order, so the per-scanline re-sort disappears.
    fn scan_convert<const ALL_VERTICAL: bool>(&mut self, buffer: &mut SpanBuffer<'_>) {
        self.active.clear();
        self.edges.sort_unstable_by_key(|e| e.top);

        let mut next_edge = 0;
        let mut y = self.edges[0].top;

        while y <= self.bottom {
            while next_edge < self.edges.len() && self.edges[next_edge].top == y {
                if ALL_VERTICAL {
                    // insert in X order; nothing moves afterwards
                    let x = self.edges[next_edge].x;
                    self.active.push(next_edge);
                    let mut j = self.active.len() - 1;
                    while j > 0 && self.edges[self.active[j - 1]].x > x {
                        self.active[j] = self.active[j - 1];
                        j -= 1;
                    }
                    self.active[j] = next_edge;
                } else {
                    self.active.push(next_edge);
                }
                next_edge += 1;
            }

            if !ALL_VERTICAL {
                // insertion sort; the list is nearly sorted between rows
                for i in 1..self.active.len() {
                    let index = self.active[i];
                    let x = self.edges[index].x;
                    let mut j = i;
                    while j > 0 && self.edges[self.active[j - 1]].x > x {
                        self.active[j] = self.active[j - 1];
                        j -= 1;
                    }
                    self.active[j] = index;
                }
            }

            let mut x = 0;
            let mut winding = 0;
            let mut i = 0;
            while i < self.active.len() {
                let index = self.active[i];
                let edge_x = self.edges[index].x.to_int();

                if winding & self.fill_rule_mask != 0 {
                    buffer.add_span(x, edge_x - x, y, 255);
                }
                x = edge_x;
                winding += self.edges[index].winding;

                if self.edges[index].bottom == y {
                    self.active.remove(i);
                } else {
                    if !ALL_VERTICAL {
                        let edge = &mut self.edges[index];
                        edge.x = edge.x + edge.delta;
                    }
                    i += 1;
                }
            }

            y += 1;
        }
    }

    // ------------------------------------------------------------------
    // Chunked intersection-tree strategy
    // ------------------------------------------------------------------

    fn scan_convert_chunked(&mut self, buffer: &mut SpanBuffer<'_>) {
        let mut chunk_top = self.top;
        while chunk_top <= self.bottom {
            let chunk_bottom = chunk_top + CHUNK_SIZE - 1;
            self.prepare_chunk();

            for i in 0..self.edges.len() {
                let edge = self.edges[i];
                if edge.bottom < chunk_top || edge.top > chunk_bottom {
                    continue;
                }
                let top = edge.top.max(chunk_top);
                let bottom = edge.bottom.min(chunk_bottom);
                self.allocate(self.size + (bottom - top + 1) as usize);

                if edge.delta != Fixed::ZERO {
                    for row in top..=bottom {
                        let x = self.edges[i].x.to_int();
                        self.edges[i].x = self.edges[i].x + self.edges[i].delta;
                        self.merge_intersection((row - chunk_top) as usize, x, edge.winding);
                    }
                } else {
                    let x = edge.x.to_int();
                    for row in top..=bottom {
                        self.merge_intersection((row - chunk_top) as usize, x, edge.winding);
                    }
                }
            }

            self.emit_chunk(chunk_top, buffer);
            chunk_top += CHUNK_SIZE;
        }
    }

    /// Resets the arena to one sentinel root per chunk row.
    fn prepare_chunk(&mut self) {
        self.allocate(CHUNK_SIZE as usize);
        self.size = CHUNK_SIZE as usize;
        self.intersections[..CHUNK_SIZE as usize].fill(Intersection::default());
    }

    fn allocate(&mut self, size: usize) {
        if self.intersections.len() < size {
            let new_len = size.max(2 * self.intersections.len());
            self.intersections.resize(new_len, Intersection::default());
        }
    }

    /// Descends the row tree keyed by integer X, merging winding into an
    /// existing node or appending a fresh one at the arena tail.
    fn merge_intersection(&mut self, root: usize, x: i32, winding: i32) {
        let mut index = root;
        loop {
            let node = self.intersections[index];
            if x == node.x {
                self.intersections[index].winding += winding;
                return;
            }
            let offset = if x < node.x { node.left } else { node.right };
            if offset != 0 {
                index = (index as i64 + offset as i64) as usize;
                continue;
            }
            let next = self.size;
            self.size += 1;
            if x < node.x {
                self.intersections[index].left = (next - index) as i32;
            } else {
                self.intersections[index].right = (next - index) as i32;
            }
            self.intersections[next] = Intersection {
                x,
                winding,
                left: 0,
                right: 0,
            };
            return;
        }
    }

    fn emit_chunk(&self, chunk_top: i32, buffer: &mut SpanBuffer<'_>) {
        for dy in 0..CHUNK_SIZE as usize {
            let mut x = 0;
            let mut winding = 0;
            self.emit_node(dy, chunk_top + dy as i32, &mut x, &mut winding, buffer);
        }
    }

    /// In-order walk of one row tree; only the left child recurses, right
    /// descent is the tail loop.
    fn emit_node(
        &self,
        mut index: usize,
        y: i32,
        x: &mut i32,
        winding: &mut i32,
        buffer: &mut SpanBuffer<'_>,
    ) {
        loop {
            let node = self.intersections[index];
            if node.left != 0 {
                self.emit_node((index as i64 + node.left as i64) as usize, y, x, winding, buffer);
            }
            if *winding & self.fill_rule_mask != 0 {
                buffer.add_span(*x, node.x - *x, y, 255);
            }
            *x = node.x;
            *winding += node.winding;
            if node.right == 0 {
                return;
            }
            index = (index as i64 + node.right as i64) as usize;
        }
    }
}

impl Default for ScanConverter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::RectI;
    use crate::span::Span;

    fn run(
        converter: &mut ScanConverter,
        lines: &[[f64; 4]],
        clip: RectI,
        rule: FillingRule,
        legacy: bool,
    ) -> Vec<Span> {
        let mut out = Vec::new();
        {
            let mut consumer = |spans: &[Span]| {
                for s in spans {
                    assert!(s.len > 0);
                    assert!(clip.hit_test(s.x, s.y));
                    assert!(clip.hit_test(s.x + s.len as i32 - 1, s.y));
                    out.push(*s);
                }
            };
            let mut buffer = SpanBuffer::new(&mut consumer, clip);
            converter.begin(clip.y1, clip.y2, clip.x1, clip.x2, rule, legacy);
            for l in lines {
                converter.merge_line(
                    SubpixelPoint::from_f64(l[0], l[1]),
                    SubpixelPoint::from_f64(l[2], l[3]),
                );
            }
            converter.end(&mut buffer);
        }
        out
    }

    fn spans_for(lines: &[[f64; 4]], clip: RectI, rule: FillingRule) -> Vec<Span> {
        run(&mut ScanConverter::new(), lines, clip, rule, false)
    }

    /// Four sides of a rectangle, traversed clockwise in screen coordinates.
    fn rect_lines(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<[f64; 4]> {
        vec![
            [x1, y1, x2, y1],
            [x2, y1, x2, y2],
            [x2, y2, x1, y2],
            [x1, y2, x1, y1],
        ]
    }

    /// Sorts and fuses abutting full-coverage spans for strategy-independent
    /// comparison.
    fn normalized(mut spans: Vec<Span>) -> Vec<Span> {
        spans.sort_by_key(|s| (s.y, s.x));
        let mut merged: Vec<Span> = Vec::new();
        for s in spans {
            assert_eq!(s.coverage, 255);
            if let Some(last) = merged.last_mut() {
                if last.y == s.y && last.x + last.len as i32 == s.x {
                    last.len += s.len;
                    continue;
                }
            }
            merged.push(s);
        }
        merged
    }

    fn span(x: i32, len: u32, y: i32) -> Span {
        Span {
            x,
            len,
            y,
            coverage: 255,
        }
    }

    #[test]
    fn test_triangle_fill() {
        let clip = RectI::new(0, 0, 20, 20);
        let lines = [
            [0.0, 0.0, 10.0, 0.0],
            [10.0, 0.0, 0.0, 10.0],
            [0.0, 10.0, 0.0, 0.0],
        ];
        let spans = spans_for(&lines, clip, FillingRule::NonZero);
        let expected: Vec<Span> = (0..10).map(|y| span(0, (10 - y) as u32, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_horizontal_edges_are_dropped() {
        let clip = RectI::new(0, 0, 20, 20);
        let spans = spans_for(&[[1.0, 5.0, 15.0, 5.0]], clip, FillingRule::NonZero);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_rect_fill_all_vertical_fast_path() {
        let clip = RectI::new(0, 0, 20, 20);
        let spans = spans_for(&rect_lines(2.0, 3.0, 8.0, 9.0), clip, FillingRule::NonZero);
        let expected: Vec<Span> = (3..9).map(|y| span(2, 6, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_winding_vs_even_odd_on_overlap() {
        let clip = RectI::new(0, 0, 20, 20);
        let mut lines = rect_lines(0.0, 0.0, 6.0, 6.0);
        lines.extend(rect_lines(3.0, 3.0, 9.0, 9.0));

        let non_zero = spans_for(&lines, clip, FillingRule::NonZero);
        let even_odd = spans_for(&lines, clip, FillingRule::EvenOdd);

        // overlap rows: winding fills straight through, even-odd leaves the
        // doubly wound middle empty
        for y in 3..6 {
            let nz: Vec<&Span> = non_zero.iter().filter(|s| s.y == y).collect();
            assert_eq!(
                nz.iter().map(|s| (s.x, s.len)).collect::<Vec<_>>(),
                vec![(0, 3), (3, 3), (6, 3)]
            );
            let eo: Vec<&Span> = even_odd.iter().filter(|s| s.y == y).collect();
            assert_eq!(
                eo.iter().map(|s| (s.x, s.len)).collect::<Vec<_>>(),
                vec![(0, 3), (6, 3)]
            );
        }
        // non-overlap rows agree
        for y in (0..3).chain(6..9) {
            let nz: Vec<_> = non_zero.iter().filter(|s| s.y == y).cloned().collect();
            let eo: Vec<_> = even_odd.iter().filter(|s| s.y == y).cloned().collect();
            assert_eq!(nz, eo);
            assert_eq!(nz.len(), 1);
        }
    }

    #[test]
    fn test_legacy_rounding_shifts_scanline_window() {
        let clip = RectI::new(0, 0, 20, 20);
        let lines = rect_lines(2.0, 0.25, 8.0, 10.25);

        let default_spans = spans_for(&lines, clip, FillingRule::NonZero);
        let legacy_spans = run(
            &mut ScanConverter::new(),
            &lines,
            clip,
            FillingRule::NonZero,
            true,
        );

        let default_rows: Vec<i32> = default_spans.iter().map(|s| s.y).collect();
        let legacy_rows: Vec<i32> = legacy_spans.iter().map(|s| s.y).collect();
        assert_eq!(default_rows, (0..=9).collect::<Vec<_>>());
        assert_eq!(legacy_rows, (1..=10).collect::<Vec<_>>());
        for s in default_spans.iter().chain(legacy_spans.iter()) {
            assert_eq!((s.x, s.len), (2, 6));
        }
    }

    // ------------------------------------------------------------------
    // Boundary tie-breaks
    //
    // All cases use a 0..=10 x 0..=9 window. Edges are sampled at pixel
    // centers, so a vertical edge at x=9.5 bounds spans at column 10 and a
    // sloped edge crosses column round(x(y + 1/2)) on row y. A far vertical
    // edge with the opposite winding turns the edge under test into
    // observable spans.
    // ------------------------------------------------------------------

    fn tie_break_clip() -> RectI {
        RectI::new(0, 0, 10, 9)
    }

    #[test]
    fn test_edge_starting_on_left_boundary_sloping_inward_is_kept() {
        // samples row 0 at exactly x=0.0, slope +1
        let lines = [[-1.0, 0.0, 9.0, 10.0], [9.5, 10.0, 9.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9).map(|y| span(y, (10 - y) as u32, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_starting_on_left_boundary_sloping_outward_is_pinned() {
        let lines = [[0.0, 0.0, -10.0, 10.0], [9.5, 10.0, 9.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9).map(|y| span(0, 10, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_entirely_left_of_window_is_pinned() {
        let lines = [[-5.0, 0.0, -3.0, 10.0], [9.5, 10.0, 9.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9).map(|y| span(0, 10, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_entirely_right_of_window_is_pinned() {
        let lines = [[1.5, 0.0, 1.5, 10.0], [17.0, 10.0, 15.0, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9).map(|y| span(2, 9, y)).collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_crossing_left_boundary_is_split() {
        // slope +1, crosses x=0 between rows 3 and 4
        let lines = [[-4.5, 0.0, 5.5, 10.0], [8.5, 10.0, 8.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let mut expected: Vec<Span> = (0..=3).map(|y| span(0, 9, y)).collect();
        expected.extend((4..=9).map(|y| span(y - 4, (13 - y) as u32, y)));
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_crossing_right_boundary_is_split() {
        // slope +1, crosses x=11 between rows 4 and 5
        let lines = [[1.5, 0.0, 1.5, 10.0], [15.5, 10.0, 5.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let mut expected: Vec<Span> = (0..=4).map(|y| span(2, (4 + y) as u32, y)).collect();
        expected.extend((5..=9).map(|y| span(2, 9, y)));
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_ending_on_left_boundary_from_inside_is_kept() {
        // slope -1/2, reaches exactly x=0 at the last row center
        let lines = [[4.25, 0.0, -0.75, 10.0], [8.5, 10.0, 8.5, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9)
            .map(|y| {
                let x = (9 - y) / 2;
                span(x, (9 - x) as u32, y)
            })
            .collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn test_edge_starting_on_right_boundary_sloping_outward_is_pinned() {
        // samples row 0 at exactly x=11.0, slope +1
        let lines = [[1.5, 0.0, 1.5, 10.0], [20.0, 10.0, 10.0, 0.0]];
        let spans = spans_for(&lines, tie_break_clip(), FillingRule::NonZero);
        let expected: Vec<Span> = (0..=9).map(|y| span(2, 9, y)).collect();
        assert_eq!(spans, expected);
    }

    // ------------------------------------------------------------------
    // Strategy equivalence
    // ------------------------------------------------------------------

    /// Tiles `x1..x2` into `strips` vertical rectangles; 2 edges each.
    fn strip_lines(x1: f64, x2: f64, y1: f64, y2: f64, strips: usize) -> Vec<[f64; 4]> {
        let width = (x2 - x1) / strips as f64;
        let mut lines = Vec::new();
        for k in 0..strips {
            let left = x1 + width * k as f64;
            lines.extend(rect_lines(left, y1, left + width, y2));
        }
        lines
    }

    #[test]
    fn test_strategies_agree_on_decomposed_rectangle() {
        let clip = RectI::new(0, 0, 100, 200);
        // 2 edges, 32 edges (active-list limit), 64 edges (chunked)
        let whole = spans_for(&rect_lines(0.0, 0.0, 32.0, 130.0), clip, FillingRule::NonZero);
        let at_limit = spans_for(
            &strip_lines(0.0, 32.0, 0.0, 130.0, 16),
            clip,
            FillingRule::NonZero,
        );
        let chunked = spans_for(
            &strip_lines(0.0, 32.0, 0.0, 130.0, 32),
            clip,
            FillingRule::NonZero,
        );

        let expected: Vec<Span> = (0..130).map(|y| span(0, 32, y)).collect();
        assert_eq!(normalized(whole), expected);
        assert_eq!(normalized(at_limit), expected);
        assert_eq!(normalized(chunked), expected);
    }

    #[test]
    fn test_chunked_sloped_edge_advances_across_chunk_boundaries() {
        let clip = RectI::new(0, 0, 100, 200);
        // slope 1/4 over 180 rows, spanning three chunks
        let real = [[2.0, 0.0, 47.0, 180.0], [60.5, 180.0, 60.5, 0.0]];

        let simple = spans_for(&real, clip, FillingRule::NonZero);

        // pad with self-cancelling edge pairs to force the chunked strategy
        let mut padded: Vec<[f64; 4]> = real.to_vec();
        for _ in 0..16 {
            padded.push([70.0, 0.0, 70.0, 180.0]);
            padded.push([70.0, 180.0, 70.0, 0.0]);
        }
        let chunked = spans_for(&padded, clip, FillingRule::NonZero);

        assert_eq!(simple.len(), 180);
        for (y, s) in simple.iter().enumerate() {
            // x(y) = 2.625 + 0.25 y, truncated
            let x = ((2.625 + 0.25 * y as f64).floor()) as i32;
            assert_eq!((s.x, s.y), (x, y as i32));
            assert_eq!(s.x + s.len as i32, 61);
        }
        assert_eq!(simple, chunked);
    }

    #[test]
    fn test_spans_stay_inside_window_for_wild_input() {
        let clip = RectI::new(0, 0, 30, 30);
        // a self-intersecting star reaching far outside the window
        let points = [
            (15.0, -40.0),
            (40.0, 45.0),
            (-35.0, -10.0),
            (65.0, -10.0),
            (-10.0, 45.0),
        ];
        let mut lines = Vec::new();
        for i in 0..points.len() {
            let (x1, y1) = points[i];
            let (x2, y2) = points[(i + 1) % points.len()];
            lines.push([x1, y1, x2, y2]);
        }
        // the run() collector asserts every span lies inside the clip
        let spans = spans_for(&lines, clip, FillingRule::NonZero);
        assert!(!spans.is_empty());
        let even_odd = spans_for(&lines, clip, FillingRule::EvenOdd);
        assert!(!even_odd.is_empty());
    }

    #[test]
    fn test_self_intersecting_contour_fills_double_wound_lobe_by_rule() {
        let clip = RectI::new(0, 0, 20, 20);
        // one closed contour tracing two overlapping clockwise squares; the
        // connector diagonal is traversed both ways so its winding cancels,
        // leaving the overlap (3..6 x 3..6) wound twice
        let lines = [
            [0.0, 0.0, 6.0, 0.0],
            [6.0, 0.0, 6.0, 6.0],
            [6.0, 6.0, 0.0, 6.0],
            [0.0, 6.0, 0.0, 0.0],
            [0.0, 0.0, 3.0, 3.0],
            [3.0, 3.0, 9.0, 3.0],
            [9.0, 3.0, 9.0, 9.0],
            [9.0, 9.0, 3.0, 9.0],
            [3.0, 9.0, 3.0, 3.0],
            [3.0, 3.0, 0.0, 0.0],
        ];
        let non_zero = spans_for(&lines, clip, FillingRule::NonZero);
        let even_odd = spans_for(&lines, clip, FillingRule::EvenOdd);

        // the doubly wound lobe fills under winding, stays empty under
        // even-odd
        for y in 3..6 {
            let nz: Vec<(i32, u32)> = non_zero
                .iter()
                .filter(|s| s.y == y)
                .map(|s| (s.x, s.len))
                .collect();
            assert_eq!(nz, vec![(0, 3), (3, 3), (6, 3)]);
            let eo: Vec<(i32, u32)> = even_odd
                .iter()
                .filter(|s| s.y == y)
                .map(|s| (s.x, s.len))
                .collect();
            assert_eq!(eo, vec![(0, 3), (6, 3)]);
        }
        // singly wound rows agree between the rules
        for y in (0..3).chain(6..9) {
            let nz = normalized(non_zero.iter().filter(|s| s.y == y).cloned().collect());
            let eo = normalized(even_odd.iter().filter(|s| s.y == y).cloned().collect());
            assert_eq!(nz, eo);
            assert_eq!(nz.len(), 1);
            assert_eq!(nz[0].len, 6);
        }
    }

    #[test]
    fn test_converter_is_reusable() {
        let clip = RectI::new(0, 0, 20, 20);
        let lines = rect_lines(1.0, 1.0, 9.0, 9.0);
        let mut converter = ScanConverter::new();
        let first = run(&mut converter, &lines, clip, FillingRule::NonZero, false);
        let second = run(&mut converter, &lines, clip, FillingRule::NonZero, false);
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[test]
    fn test_scratch_is_shrunk_after_oversized_input() {
        let clip = RectI::new(0, 0, 3000, 200);
        let lines = strip_lines(0.0, 2600.0, 0.0, 130.0, 650);
        let mut converter = ScanConverter::new();
        let spans = run(&mut converter, &lines, clip, FillingRule::NonZero, false);
        assert!(!spans.is_empty());
        assert!(converter.edges.capacity() <= SCRATCH_LIMIT);
        assert!(converter.intersections.capacity() == 0);
    }
}
