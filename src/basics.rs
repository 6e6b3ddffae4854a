//! Foundation types shared by every stage of the rasterizer.

// ============================================================================
// Cover (anti-aliasing) values
// ============================================================================

/// The type used for anti-aliasing coverage values.
pub type CoverType = u8;

pub const COVER_NONE: CoverType = 0;
pub const COVER_FULL: CoverType = 255;

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillingRule {
    NonZero,
    EvenOdd,
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the point (x, y) is inside the rectangle.
    pub fn hit_test(&self, x: T, y: T) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;
/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointD = PointBase<f64>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_constants() {
        assert_eq!(COVER_NONE, 0);
        assert_eq!(COVER_FULL, 255);
    }

    #[test]
    fn test_rect_is_valid() {
        assert!(RectI::new(10, 20, 30, 40).is_valid());
        assert!(RectI::new(10, 20, 10, 20).is_valid());
        assert!(!RectI::new(30, 40, 10, 20).is_valid());
        assert!(!RectI::new(0, 0, -1, -1).is_valid());
    }

    #[test]
    fn test_rect_hit_test() {
        let r = RectD::new(1.0, 2.0, 3.0, 4.0);
        assert!(r.hit_test(2.0, 3.0));
        assert!(r.hit_test(1.0, 2.0));
        assert!(r.hit_test(3.0, 4.0));
        assert!(!r.hit_test(0.5, 3.0));
        assert!(!r.hit_test(2.0, 4.5));
    }

    #[test]
    fn test_point() {
        let p = PointD::new(1.5, 2.5);
        assert_eq!(p.x, 1.5);
        assert_eq!(p.y, 2.5);
    }
}
