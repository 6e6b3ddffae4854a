//! Outline input model: tagged vertices grouped into implicitly closed
//! contours.

use crate::basics::RectD;

// ============================================================================
// Vertices
// ============================================================================

/// Classification of an outline vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexTag {
    /// A point on the outline itself.
    OnCurve,
    /// A cubic Bezier control point. Control points always appear as a pair
    /// between two on-curve points.
    Control,
}

/// One outline vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineVertex {
    pub x: f64,
    pub y: f64,
    pub tag: VertexTag,
}

// ============================================================================
// Outline
// ============================================================================

/// A fillable outline: ordered tagged vertices grouped into contours.
///
/// Contours are implicitly closed; the rasterizer joins the last vertex of
/// every contour back to its first. The builder methods only produce
/// well-formed contours (a leading on-curve vertex, control points in
/// complete cubic triples), which is what the rasterizer relies on.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    vertices: Vec<OutlineVertex>,
    contour_ends: Vec<usize>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all vertices, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.contour_ends.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Starts a new contour. Any contour in progress is finished first.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.end_contour();
        self.vertices.push(OutlineVertex {
            x,
            y,
            tag: VertexTag::OnCurve,
        });
    }

    /// Adds a straight segment to the current contour. Ignored when no
    /// contour has been started.
    pub fn line_to(&mut self, x: f64, y: f64) {
        debug_assert!(self.has_open_contour(), "line_to before move_to");
        if !self.has_open_contour() {
            return;
        }
        self.vertices.push(OutlineVertex {
            x,
            y,
            tag: VertexTag::OnCurve,
        });
    }

    /// Adds a cubic Bezier segment to the current contour. Ignored when no
    /// contour has been started.
    pub fn curve4_to(
        &mut self,
        x_ctrl1: f64,
        y_ctrl1: f64,
        x_ctrl2: f64,
        y_ctrl2: f64,
        x_to: f64,
        y_to: f64,
    ) {
        debug_assert!(self.has_open_contour(), "curve4_to before move_to");
        if !self.has_open_contour() {
            return;
        }
        self.vertices.push(OutlineVertex {
            x: x_ctrl1,
            y: y_ctrl1,
            tag: VertexTag::Control,
        });
        self.vertices.push(OutlineVertex {
            x: x_ctrl2,
            y: y_ctrl2,
            tag: VertexTag::Control,
        });
        self.vertices.push(OutlineVertex {
            x: x_to,
            y: y_to,
            tag: VertexTag::OnCurve,
        });
    }

    /// Finishes the current contour. Contours are closed implicitly, so this
    /// adds no vertex; it only marks the boundary before a following
    /// `move_to`.
    pub fn close(&mut self) {
        self.end_contour();
    }

    /// Bounding box over every vertex, control points included, so it may
    /// overestimate the filled extent of a curve but never underestimates
    /// it.
    pub fn bounding_rect(&self) -> RectD {
        let mut vertices = self.vertices.iter();
        let first = match vertices.next() {
            Some(v) => v,
            None => return RectD::new(0.0, 0.0, -1.0, -1.0),
        };
        let mut rect = RectD::new(first.x, first.y, first.x, first.y);
        for v in vertices {
            rect.x1 = rect.x1.min(v.x);
            rect.y1 = rect.y1.min(v.y);
            rect.x2 = rect.x2.max(v.x);
            rect.y2 = rect.y2.max(v.y);
        }
        rect
    }

    /// Iterates all contours as vertex slices, the in-progress one included.
    pub fn contours(&self) -> impl Iterator<Item = &[OutlineVertex]> {
        let mut start = 0usize;
        let finished = self.contour_ends.iter().map(move |&end| {
            let contour = &self.vertices[start..end];
            start = end;
            contour
        });
        let tail = &self.vertices[self.last_end()..];
        finished.chain(core::iter::once(tail).filter(|c| !c.is_empty()))
    }

    fn end_contour(&mut self) {
        if self.has_open_contour() {
            self.contour_ends.push(self.vertices.len());
        }
    }

    fn last_end(&self) -> usize {
        self.contour_ends.last().copied().unwrap_or(0)
    }

    fn has_open_contour(&self) -> bool {
        self.vertices.len() > self.last_end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_tags_vertices() {
        let mut outline = Outline::new();
        outline.move_to(0.0, 0.0);
        outline.line_to(10.0, 0.0);
        outline.curve4_to(12.0, 2.0, 12.0, 8.0, 10.0, 10.0);

        let contours: Vec<_> = outline.contours().collect();
        assert_eq!(contours.len(), 1);
        let tags: Vec<_> = contours[0].iter().map(|v| v.tag).collect();
        assert_eq!(
            tags,
            vec![
                VertexTag::OnCurve,
                VertexTag::OnCurve,
                VertexTag::Control,
                VertexTag::Control,
                VertexTag::OnCurve,
            ]
        );
    }

    #[test]
    fn test_move_to_starts_new_contour() {
        let mut outline = Outline::new();
        outline.move_to(0.0, 0.0);
        outline.line_to(5.0, 0.0);
        outline.line_to(5.0, 5.0);
        outline.move_to(10.0, 10.0);
        outline.line_to(15.0, 10.0);
        outline.line_to(15.0, 15.0);

        let contours: Vec<_> = outline.contours().collect();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 3);
        assert_eq!(contours[1].len(), 3);
        assert_eq!(contours[1][0].x, 10.0);
    }

    #[test]
    fn test_close_marks_boundary_without_adding_vertices() {
        let mut outline = Outline::new();
        outline.move_to(0.0, 0.0);
        outline.line_to(5.0, 0.0);
        outline.close();
        outline.close();

        let contours: Vec<_> = outline.contours().collect();
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 2);
    }

    #[test]
    fn test_bounding_rect_includes_control_points() {
        let mut outline = Outline::new();
        outline.move_to(1.0, 1.0);
        outline.curve4_to(-3.0, 0.5, 2.0, 7.0, 1.5, 2.0);

        let rect = outline.bounding_rect();
        assert_eq!(rect.x1, -3.0);
        assert_eq!(rect.y1, 0.5);
        assert_eq!(rect.x2, 2.0);
        assert_eq!(rect.y2, 7.0);
    }

    #[test]
    fn test_empty_outline() {
        let outline = Outline::new();
        assert!(outline.is_empty());
        assert!(!outline.bounding_rect().is_valid());
        assert_eq!(outline.contours().count(), 0);
    }

    #[test]
    fn test_clear_resets() {
        let mut outline = Outline::new();
        outline.move_to(0.0, 0.0);
        outline.line_to(5.0, 0.0);
        outline.close();
        outline.clear();
        assert!(outline.is_empty());
        assert_eq!(outline.contours().count(), 0);
    }
}
