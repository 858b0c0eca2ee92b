//! Physical pixel unit used by every measurement that flows into the feed.
//!
//! Scroll offsets, viewport sizes and translations are all expressed as
//! [`Px`]. Document coordinates have their origin at the top-left corner of
//! the page, with the Y axis increasing downward and the X axis increasing to
//! the right.
//!
//! # Example
//!
//! ```
//! use phased_scroll::px::Px;
//!
//! let scroll_top = Px::new(800);
//! let viewport_height = Px::new(800);
//! let bottom = scroll_top + viewport_height;
//! assert_eq!(bottom, Px::new(1600));
//! ```

use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// A physical pixel value.
///
/// Negative values are allowed; they show up when the host reports
/// overscroll or when a document-space rect sits above the viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// The largest representable pixel value.
    pub const MAX: Self = Self(i32::MAX);

    /// Creates a new `Px` from an `i32`.
    pub const fn new(value: i32) -> Self {
        Px(value)
    }

    /// Returns the raw `i32` value.
    ///
    /// ```
    /// use phased_scroll::px::Px;
    ///
    /// assert_eq!(Px::new(42).raw(), 42);
    /// ```
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// ```
    /// use phased_scroll::px::Px;
    ///
    /// assert_eq!(Px::new(10).positive(), Px::new(10));
    /// assert_eq!(Px::new(-5).positive(), Px::ZERO);
    /// ```
    pub fn positive(self) -> Self {
        if self.0 < 0 { Px::ZERO } else { self }
    }

    /// Converts the pixel value to `f32`.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Creates a `Px` from an `f32`, truncating toward zero and saturating at
    /// the `i32` bounds instead of overflowing. `NaN` maps to zero.
    ///
    /// ```
    /// use phased_scroll::px::Px;
    ///
    /// assert_eq!(Px::saturating_from_f32(42.7), Px::new(42));
    /// assert_eq!(Px::saturating_from_f32(f32::MAX), Px::MAX);
    /// assert_eq!(Px::saturating_from_f32(f32::NAN), Px::ZERO);
    /// ```
    pub fn saturating_from_f32(value: f32) -> Self {
        let clamped_value = value.clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped_value as i32)
    }

    /// Computes `self + rhs`, saturating at the numeric bounds.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Px(self.0.saturating_add(rhs.0))
    }

    /// Computes `self - rhs`, saturating at the numeric bounds.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Px(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies by an item count, saturating at the numeric bounds.
    pub fn saturating_mul_count(self, times: usize) -> Self {
        let times = i64::try_from(times).unwrap_or(i64::MAX);
        let value = i64::from(self.0).saturating_mul(times);
        Px(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }
}

impl From<i32> for Px {
    fn from(value: i32) -> Self {
        Px(value)
    }
}

impl Add for Px {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0 - rhs.0)
    }
}

impl Mul<i32> for Px {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self::Output {
        Px(self.0 * rhs)
    }
}

impl Div<i32> for Px {
    type Output = Self;

    fn div(self, rhs: i32) -> Self::Output {
        Px(self.0 / rhs)
    }
}

impl AddAssign for Px {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Px {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_arithmetic() {
        let a = Px(10);
        let b = Px(5);

        assert_eq!(a + b, Px(15));
        assert_eq!(a - b, Px(5));
        assert_eq!(a * 2, Px(20));
        assert_eq!(a / 2, Px(5));

        let mut c = a;
        c += b;
        c -= Px(3);
        assert_eq!(c, Px(12));
    }

    #[test]
    fn test_px_saturating_arithmetic() {
        let max = Px(i32::MAX);
        let min = Px(i32::MIN);
        assert_eq!(max.saturating_add(Px(1)), max);
        assert_eq!(min.saturating_sub(Px(1)), min);
    }

    #[test]
    fn test_saturating_from_f32() {
        assert_eq!(Px::saturating_from_f32(f32::MAX), Px(i32::MAX));
        assert_eq!(Px::saturating_from_f32(f32::MIN), Px(i32::MIN));
        assert_eq!(Px::saturating_from_f32(100.5), Px(100));
        assert_eq!(Px::saturating_from_f32(-100.5), Px(-100));
    }

    #[test]
    fn test_saturating_mul_count() {
        assert_eq!(Px(352).saturating_mul_count(5), Px(1760));
        assert_eq!(Px(352).saturating_mul_count(0), Px::ZERO);
        assert_eq!(Px(i32::MAX).saturating_mul_count(2), Px::MAX);
    }

    #[test]
    fn test_positive() {
        assert_eq!(Px(-1).positive(), Px::ZERO);
        assert_eq!(Px(0).positive(), Px::ZERO);
        assert_eq!(Px(7).positive(), Px(7));
    }
}
