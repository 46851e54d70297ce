//! The fraction value type and its conversions to native numbers.

use std::fmt;

use num_integer::Integer;
use serde::{Deserialize, Serialize};

/// A rational number stored as a numerator/denominator pair.
///
/// No sign convention is enforced and equality is structural: `1/2` and
/// `2/4` compare unequal. Use [`Fraction::same_value`] for numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    /// Numerator.
    pub numerator: i64,
    /// Denominator; must be nonzero for arithmetic and conversions.
    pub denominator: i64,
}

impl Fraction {
    /// Create a fraction without simplifying it.
    #[must_use]
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Create `value/1`.
    #[must_use]
    pub const fn from_int(value: i64) -> Self {
        Self::new(value, 1)
    }

    /// Cross-multiplied numeric equality.
    #[must_use]
    pub fn same_value(&self, other: &Self) -> bool {
        i128::from(self.numerator) * i128::from(other.denominator)
            == i128::from(other.numerator) * i128::from(self.denominator)
    }

    /// Integer part, truncated toward zero.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero or the quotient overflows
    /// (`i64::MIN / -1`).
    #[must_use]
    pub fn to_int(&self) -> i64 {
        self.numerator / self.denominator
    }

    /// [`to_int`](Self::to_int), or `None` on a zero denominator or overflow.
    #[must_use]
    pub fn checked_to_int(&self) -> Option<i64> {
        self.numerator.checked_div(self.denominator)
    }

    /// `numerator * 10^digits / denominator`, truncated toward zero.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero or an intermediate value overflows.
    #[must_use]
    pub fn to_fixed_point(&self, digits: u32) -> i64 {
        self.numerator * num_traits::pow(10_i64, digits as usize) / self.denominator
    }

    /// [`to_fixed_point`](Self::to_fixed_point), or `None` on a zero
    /// denominator or overflow.
    #[must_use]
    pub fn checked_to_fixed_point(&self, digits: u32) -> Option<i64> {
        num_traits::checked_pow(10_i64, digits as usize)?
            .checked_mul(self.numerator)?
            .checked_div(self.denominator)
    }

    /// Nearest `f32` to the quotient.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f32(&self) -> f32 {
        self.numerator as f32 / self.denominator as f32
    }

    /// Nearest `f64` to the quotient.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Truncated quotient and remainder; the remainder takes the numerator's sign.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero or the quotient overflows.
    #[must_use]
    pub fn to_quotient_remainder(&self) -> (i64, i64) {
        self.numerator.div_rem(&self.denominator)
    }

    /// [`to_quotient_remainder`](Self::to_quotient_remainder), or `None` on a
    /// zero denominator or overflow.
    #[must_use]
    pub fn checked_to_quotient_remainder(&self) -> Option<(i64, i64)> {
        Some((
            self.numerator.checked_div(self.denominator)?,
            self.numerator.checked_rem(self.denominator)?,
        ))
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::from_int(0)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
