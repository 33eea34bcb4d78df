//! Exact rational arithmetic for aspect ratios.
//!
//! Row fitting sums the width/height ratio of every block in a row and then
//! divides the available width by that sum. Doing the accumulation in `f64`
//! drifts once a page holds a few hundred blocks, so ratios are kept as
//! reduced `i64` fractions and only converted to pixels at the very end.
//!
//! # Degenerate input
//! Nothing in here errors. A zero denominator (or non-finite / non-positive
//! pixel dimensions) collapses to `1/1`, so a single malformed block degrades
//! the layout of its row instead of failing the whole page.

use std::cmp::Ordering;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Fixed-point scale applied to fractional pixel dimensions before reduction.
const DIMENSION_SCALE: f64 = 1_000.0;

/// Denominator used when an exact result no longer fits in `i64`.
const APPROX_DENOMINATOR: i128 = 1_000_000;

/// Largest magnitude an approximated numerator may take; stays below `i64::MAX`.
const APPROX_LIMIT: f64 = 9.0e18;

/// A rational number `numerator / denominator`.
///
/// `Fraction::new` stores its terms as given. Every arithmetic operation
/// returns a reduced fraction with a positive denominator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    pub const ONE: Fraction = Fraction {
        numerator: 1,
        denominator: 1,
    };

    /// Builds `numerator / denominator` without reducing.
    ///
    /// The denominator is expected to be positive; callers validate upstream.
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Fraction {
            numerator,
            denominator,
        }
    }

    pub const fn whole(value: i64) -> Self {
        Fraction::new(value, 1)
    }

    /// Aspect ratio `width : height` from pixel dimensions.
    ///
    /// Dimensions may be fractional (they are fixed-point scaled by 1000 before
    /// reduction). Non-finite, zero or negative dimensions yield `1/1`.
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Fraction::ONE;
        }

        let scaled_w = (width * DIMENSION_SCALE).round();
        let scaled_h = (height * DIMENSION_SCALE).round();
        let limit = i64::MAX as f64;
        if scaled_w < 1.0 || scaled_h < 1.0 || scaled_w >= limit || scaled_h >= limit {
            return Fraction::ONE;
        }

        Fraction::new(scaled_w as i64, scaled_h as i64).simplify()
    }

    /// Reduces by the GCD and moves the sign onto the numerator.
    /// A zero denominator returns `1/1`.
    pub fn simplify(self) -> Self {
        reduce(i128::from(self.numerator), i128::from(self.denominator))
    }

    /// Swaps numerator and denominator. Zero inverts to `1/1`.
    pub fn invert(self) -> Self {
        Fraction::new(self.denominator, self.numerator).simplify()
    }

    pub fn to_f64(self) -> f64 {
        if self.denominator == 0 {
            return 1.0;
        }
        self.numerator as f64 / self.denominator as f64
    }

    /// Rounds `value × self` to the nearest integer, halves away from zero.
    ///
    /// This is the only place a ratio becomes a pixel count.
    pub fn scale_round(self, value: i64) -> i64 {
        let reduced = self.simplify();
        let product = i128::from(value) * i128::from(reduced.numerator);
        let den = i128::from(reduced.denominator);

        let mut quotient = product / den;
        let remainder = product % den;
        if 2 * remainder.abs() >= den {
            quotient += product.signum();
        }

        i64::try_from(quotient).unwrap_or(if quotient > 0 { i64::MAX } else { i64::MIN })
    }

    fn wide(self) -> (i128, i128) {
        let reduced = self.simplify();
        (
            i128::from(reduced.numerator),
            i128::from(reduced.denominator),
        )
    }
}

impl Add for Fraction {
    type Output = Fraction;

    /// `(a·d + c·b) / (b·d)`, reduced.
    fn add(self, other: Fraction) -> Fraction {
        let (a, b) = self.wide();
        let (c, d) = other.wide();
        match (a * d).checked_add(c * b) {
            Some(numerator) => reduce(numerator, b * d),
            None => approximate(self.to_f64() + other.to_f64()),
        }
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, other: Fraction) -> Fraction {
        let (a, b) = self.wide();
        let (c, d) = other.wide();
        reduce(a * c, b * d)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    /// Exact comparison by cross-multiplication.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.wide();
        let (c, d) = other.wide();
        (a * d).cmp(&(c * b))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn reduce(numerator: i128, denominator: i128) -> Fraction {
    if denominator == 0 {
        return Fraction::ONE;
    }

    let (numerator, denominator) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    // denominator > 0 here, so the gcd is at least 1.
    let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()) as i128;
    let (numerator, denominator) = (numerator / divisor, denominator / divisor);

    match (i64::try_from(numerator), i64::try_from(denominator)) {
        (Ok(n), Ok(d)) => Fraction::new(n, d),
        _ => approximate(numerator as f64 / denominator as f64),
    }
}

/// Nearest fraction with denominator `APPROX_DENOMINATOR`, or the nearest
/// integer when the value is too large for that denominator.
fn approximate(value: f64) -> Fraction {
    if !value.is_finite() {
        return Fraction::ONE;
    }

    let denominator = if (value * APPROX_DENOMINATOR as f64).abs() < APPROX_LIMIT {
        APPROX_DENOMINATOR
    } else {
        1
    };
    let scaled = (value * denominator as f64)
        .round()
        .clamp(-APPROX_LIMIT, APPROX_LIMIT);
    reduce(scaled as i128, denominator)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(f: Fraction) -> (i64, i64) {
        (f.numerator, f.denominator)
    }

    #[test]
    fn test_new_keeps_terms_unreduced() {
        assert_eq!(terms(Fraction::new(1920, 1080)), (1920, 1080));
    }

    #[test]
    fn test_simplify_reduces_by_gcd() {
        assert_eq!(terms(Fraction::new(1920, 1080).simplify()), (16, 9));
        assert_eq!(terms(Fraction::new(4032, 3024).simplify()), (4, 3));
    }

    #[test]
    fn test_simplify_zero_denominator_falls_back_to_one() {
        assert_eq!(terms(Fraction::new(5, 0).simplify()), (1, 1));
        assert_eq!(terms(Fraction::new(0, 0).simplify()), (1, 1));
    }

    #[test]
    fn test_simplify_moves_sign_to_numerator() {
        assert_eq!(terms(Fraction::new(3, -6).simplify()), (-1, 2));
        assert_eq!(terms(Fraction::new(-3, -6).simplify()), (1, 2));
    }

    #[test]
    fn test_from_dimensions_degenerate_inputs() {
        assert_eq!(terms(Fraction::from_dimensions(0.0, 0.0)), (1, 1));
        assert_eq!(terms(Fraction::from_dimensions(800.0, 0.0)), (1, 1));
        assert_eq!(terms(Fraction::from_dimensions(-4.0, 3.0)), (1, 1));
        assert_eq!(terms(Fraction::from_dimensions(f64::NAN, 3.0)), (1, 1));
        assert_eq!(terms(Fraction::from_dimensions(4.0, f64::INFINITY)), (1, 1));
    }

    #[test]
    fn test_from_dimensions_handles_fractional_pixels() {
        assert_eq!(terms(Fraction::from_dimensions(1.5, 1.0)), (3, 2));
        assert_eq!(terms(Fraction::from_dimensions(6000.0, 4000.0)), (3, 2));
    }

    #[test]
    fn test_add_cross_multiplies_and_reduces() {
        let sum = Fraction::new(1, 2) + Fraction::new(1, 3);
        assert_eq!(terms(sum), (5, 6));

        let sum = Fraction::new(16, 9) + Fraction::new(2, 9);
        assert_eq!(terms(sum), (2, 1));
    }

    #[test]
    fn test_repeated_thirds_sum_exactly() {
        let third = Fraction::new(1, 3);
        let total = (0..300).fold(Fraction::ZERO, |acc, _| acc + third);
        assert_eq!(terms(total), (100, 1));
    }

    #[test]
    fn test_invert_swaps_terms() {
        assert_eq!(terms(Fraction::new(16, 9).invert()), (9, 16));
        assert_eq!(terms(Fraction::ZERO.invert()), (1, 1));
    }

    #[test]
    fn test_ordering_is_exact() {
        assert!(Fraction::new(2, 3) < Fraction::ONE);
        assert!(Fraction::new(5, 1) > Fraction::new(49, 10));
        assert_eq!(Fraction::new(2, 4), Fraction::new(1, 2));
        assert_eq!(Fraction::new(1, -2), Fraction::new(-1, 2));
    }

    #[test]
    fn test_mul_reduces() {
        let product = Fraction::new(2, 3) * Fraction::new(9, 4);
        assert_eq!(terms(product), (3, 2));
    }

    #[test]
    fn test_scale_round_to_pixels() {
        assert_eq!(Fraction::new(9, 16).scale_round(1200), 675);
        assert_eq!(Fraction::new(1, 2).scale_round(5), 3);
        assert_eq!(Fraction::new(1, 3).scale_round(10), 3);
        assert_eq!(Fraction::new(-1, 2).scale_round(5), -3);
    }

    #[test]
    fn test_overflowing_sum_degrades_instead_of_panicking() {
        let big = Fraction::new(i64::MAX - 1, 3);
        let other = Fraction::new(i64::MAX - 2, 7);
        let sum = big + other;
        assert!(sum.denominator > 0);
        let expected = big.to_f64() + other.to_f64();
        assert!((sum.to_f64() - expected).abs() / expected < 1e-6);
    }
}
