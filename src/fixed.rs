//! Fixed-point coordinate types.
//!
//! All geometry inside the scan converter is carried as 16.16 fixed point
//! ([`Fixed`]), so incremental slope accumulation is exact and identical on
//! every platform. Outline vertices cross into the converter as 26.6
//! subpixel values ([`SubpixelPoint`]); floating point appears only at the
//! public API boundary.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// ============================================================================
// 16.16 fixed point
// ============================================================================

/// Number of fractional bits in a [`Fixed`] value.
pub const FIXED_SHIFT: u32 = 16;
/// One in 16.16 fixed point.
pub const FIXED_SCALE: i32 = 1 << FIXED_SHIFT;

/// A 16.16 fixed-point coordinate.
///
/// Multiplication widens to 64 bits and truncates with an arithmetic right
/// shift. Conversions and the additive operators saturate at the
/// representable range instead of wrapping, which keeps the numeric edge
/// cases total: feeding extreme coordinates produces clamped geometry, not
/// a panic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const HALF: Fixed = Fixed(1 << (FIXED_SHIFT - 1));
    pub const ONE: Fixed = Fixed(FIXED_SCALE);

    /// Wraps a raw 16.16 bit pattern.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// The raw 16.16 bit pattern.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Narrows a widened 16.16 intermediate, clamping at the representable
    /// range.
    #[inline]
    pub fn saturating_from_raw(raw: i64) -> Self {
        Fixed(raw.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    #[inline]
    pub fn from_int(v: i32) -> Self {
        Fixed::saturating_from_raw((v as i64) << FIXED_SHIFT)
    }

    /// Integer part, rounded toward negative infinity.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FIXED_SHIFT
    }

    /// Converts from floating point, truncating toward zero and clamping at
    /// the representable range.
    #[inline]
    pub fn from_f64(v: f64) -> Self {
        Fixed((v * FIXED_SCALE as f64) as i32)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / FIXED_SCALE as f64
    }

    /// Multiplies by a plain integer (a scanline count), widened and
    /// saturated.
    #[inline]
    pub fn mul_int(self, n: i32) -> Self {
        Fixed::saturating_from_raw(self.0 as i64 * n as i64)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::saturating_from_raw((self.0 as i64 * rhs.0 as i64) >> FIXED_SHIFT)
    }
}

// ============================================================================
// 26.6 subpixel points
// ============================================================================

/// Number of fractional bits in subpixel (26.6) outline coordinates.
pub const SUBPIXEL_SHIFT: u32 = 6;
/// One pixel in 26.6 subpixel units.
pub const SUBPIXEL_SCALE: i64 = 1 << SUBPIXEL_SHIFT;
/// Left shift that widens a 26.6 value to 16.16.
pub const SUBPIXEL_TO_FIXED_SHIFT: u32 = FIXED_SHIFT - SUBPIXEL_SHIFT;

/// A point in 26.6 subpixel coordinates, the vertex format at the edge-merge
/// boundary.
///
/// Coordinates are stored widened to `i64` so that merge arithmetic can form
/// intermediate sums without overflow before the final saturating narrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubpixelPoint {
    pub x: i64,
    pub y: i64,
}

impl SubpixelPoint {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Quantizes pixel coordinates onto the 26.6 grid, truncating toward
    /// zero.
    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: (x * SUBPIXEL_SCALE as f64) as i64,
            y: (y * SUBPIXEL_SCALE as f64) as i64,
        }
    }
}

/// Widens a 26.6 subpixel coordinate to 16.16 fixed point.
#[inline]
pub fn fixed_from_subpixel(v: i64) -> Fixed {
    Fixed::saturating_from_raw(v << SUBPIXEL_TO_FIXED_SHIFT)
}

// ============================================================================
// Tests
// ============================================================================
