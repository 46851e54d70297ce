//! Prime-list driven arithmetic on fraction values.
//!
//! Every function here is pure with respect to the prime list: it only reads
//! the ascending primes produced by [`sieve::generate`](crate::sieve::generate).
//! Common factors that do not appear in the list are never found, so results
//! are only fully reduced when all factors are below the pool's bound.

use tracing::{trace, warn};

use crate::error::FractionError;
use crate::fraction::Fraction;

/// Cancel listed prime factors common to numerator and denominator.
///
/// Primes are tried in ascending order until one exceeds the magnitude of
/// either part. Zero numerators are left untouched. Idempotent.
pub fn simplify(x: &mut Fraction, primes: &[i64]) {
    for &p in primes {
        let p_abs = p.unsigned_abs();
        if p_abs > x.numerator.unsigned_abs() || p_abs > x.denominator.unsigned_abs() {
            break;
        }
        while x.numerator % p == 0 && x.denominator % p == 0 {
            x.numerator /= p;
            x.denominator /= p;
        }
    }
}

/// Rescale `a` and `b` in place so that they share a denominator.
///
/// The prime factors of both denominators are walked in ascending order:
/// a factor present in both is skipped, a factor missing from one side is
/// multiplied into that side's numerator and denominator. Denominators of
/// opposite sign are reconciled by negating `b`.
///
/// Fails with [`FractionError::PrimeBoundExceeded`] when a denominator has a
/// factor beyond the prime list; neither operand is modified in that case.
pub fn align_denominators(
    a: &mut Fraction,
    b: &mut Fraction,
    primes: &[i64],
) -> Result<(), FractionError> {
    if a.denominator == 0 || b.denominator == 0 {
        return Err(FractionError::ZeroDenominator);
    }

    let (mut left, mut right) = (*a, *b);
    let mut rest_a = a.denominator.unsigned_abs();
    let mut rest_b = b.denominator.unsigned_abs();
    let mut next = 0;

    while rest_a != 1 || rest_b != 1 {
        let Some(&p) = primes.get(next) else {
            let denominator = if rest_a != 1 {
                a.denominator
            } else {
                b.denominator
            };
            let largest_prime = primes.last().copied().unwrap_or(0);
            warn!(denominator, largest_prime, "denominator exceeds prime bound");
            return Err(FractionError::PrimeBoundExceeded {
                denominator,
                largest_prime,
            });
        };
        let p_abs = p.unsigned_abs();
        match (rest_a % p_abs == 0, rest_b % p_abs == 0) {
            (true, true) => {
                rest_a /= p_abs;
                rest_b /= p_abs;
            }
            (true, false) => {
                right.numerator *= p;
                right.denominator *= p;
                rest_a /= p_abs;
            }
            (false, true) => {
                left.numerator *= p;
                left.denominator *= p;
                rest_b /= p_abs;
            }
            (false, false) => next += 1,
        }
    }

    if left.denominator != right.denominator {
        right.numerator = -right.numerator;
        right.denominator = -right.denominator;
    }

    trace!(%left, %right, primes_used = next, "aligned denominators");
    *a = left;
    *b = right;
    Ok(())
}

fn combine(
    a: &mut Fraction,
    b: &mut Fraction,
    primes: &[i64],
    op: fn(i64, i64) -> i64,
) -> Result<Fraction, FractionError> {
    align_denominators(a, b, primes)?;
    let mut out = Fraction::new(op(a.numerator, b.numerator), a.denominator);
    simplify(a, primes);
    simplify(b, primes);
    simplify(&mut out, primes);
    Ok(out)
}

/// `a + b`. Both operands are left simplified.
pub fn sum(a: &mut Fraction, b: &mut Fraction, primes: &[i64]) -> Result<Fraction, FractionError> {
    combine(a, b, primes, |x, y| x + y)
}

/// `a - b`. Both operands are left simplified.
pub fn sub(a: &mut Fraction, b: &mut Fraction, primes: &[i64]) -> Result<Fraction, FractionError> {
    combine(a, b, primes, |x, y| x - y)
}

/// `a * b`, simplified.
#[must_use]
pub fn mul(a: &Fraction, b: &Fraction, primes: &[i64]) -> Fraction {
    let mut out = Fraction::new(a.numerator * b.numerator, a.denominator * b.denominator);
    simplify(&mut out, primes);
    out
}

/// `a / b`, simplified.
pub fn div(a: &Fraction, b: &Fraction, primes: &[i64]) -> Result<Fraction, FractionError> {
    if b.numerator == 0 {
        return Err(FractionError::DivisionByZero);
    }
    let mut out = Fraction::new(a.numerator * b.denominator, a.denominator * b.numerator);
    simplify(&mut out, primes);
    Ok(out)
}
