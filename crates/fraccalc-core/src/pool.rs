//! The fraction pool: owner of every fraction value and of the prime list.
//!
//! A [`FractionPool`] hands out [`FractionHandle`]s, which are plain `Copy`
//! indices into pool storage. All arithmetic goes through the pool so that
//! each call can check its handles and reach the shared prime list.

use fraccalc_memory::{PoolStats, SlotArena, SlotHandle};
use tracing::debug;

use crate::constants::{DEFAULT_BUFFER_CAPACITY, FLOAT_SCALE};
use crate::engine;
use crate::error::FractionError;
use crate::fraction::Fraction;
use crate::sieve;

/// Non-owning reference to a fraction stored in a [`FractionPool`].
///
/// Valid from the call that issued it until it is released or the pool is
/// torn down. Later uses are reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FractionHandle(SlotHandle);

impl FractionHandle {
    /// Storage slot this handle points at.
    #[must_use]
    pub fn index(self) -> u32 {
        self.0.index()
    }
}

/// Pooled storage for fractions plus the prime list used to reduce them.
#[derive(Debug)]
pub struct FractionPool {
    arena: SlotArena<Fraction>,
    primes: Vec<i64>,
    prime_bound: usize,
}

impl FractionPool {
    /// Create a pool whose prime list covers `prime_bound`.
    ///
    /// Allocates one buffer of [`DEFAULT_BUFFER_CAPACITY`] slots.
    pub fn init(prime_bound: usize) -> Result<Self, FractionError> {
        Self::with_buffer_capacity(prime_bound, DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a pool with a custom number of slots per buffer.
    pub fn with_buffer_capacity(
        prime_bound: usize,
        buffer_capacity: usize,
    ) -> Result<Self, FractionError> {
        let arena = SlotArena::new(buffer_capacity)?;
        let primes = sieve::generate(prime_bound)?;
        debug!(
            prime_bound,
            primes = primes.len(),
            buffer_capacity = arena.buffer_capacity(),
            "initialized fraction pool"
        );
        Ok(Self {
            arena,
            primes,
            prime_bound,
        })
    }

    /// Release all storage and the prime list. Every handle becomes invalid.
    ///
    /// Does nothing on a pool that is already torn down.
    pub fn teardown(&mut self) {
        if self.arena.is_torn_down() {
            return;
        }
        self.arena.teardown();
        self.primes = Vec::new();
        debug!(prime_bound = self.prime_bound, "fraction pool torn down");
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.arena.is_torn_down()
    }

    // -- Lifetime management --

    /// Take a slot holding `0/1`.
    ///
    /// The most recently released slot is reused first; storage only grows
    /// when no released slot and no unused slot remain.
    pub fn acquire(&mut self) -> Result<FractionHandle, FractionError> {
        self.arena
            .insert(Fraction::default())
            .map(FractionHandle)
            .map_err(Into::into)
    }

    /// Return a slot to the pool. The handle must not be used afterwards.
    pub fn release(&mut self, handle: FractionHandle) -> Result<(), FractionError> {
        self.arena.release(handle.0).map_err(Into::into)
    }

    /// Copy a fraction into a new, independent slot.
    pub fn clone_handle(
        &mut self,
        handle: FractionHandle,
    ) -> Result<FractionHandle, FractionError> {
        let value = self.get(handle)?;
        self.arena
            .insert(value)
            .map(FractionHandle)
            .map_err(Into::into)
    }

    // -- Construction --

    /// Store `value`, simplified against the pool's primes.
    pub fn from_fraction(&mut self, mut value: Fraction) -> Result<FractionHandle, FractionError> {
        engine::simplify(&mut value, &self.primes);
        self.arena
            .insert(value)
            .map(FractionHandle)
            .map_err(Into::into)
    }

    /// `value/1`.
    pub fn from_int(&mut self, value: i64) -> Result<FractionHandle, FractionError> {
        self.from_fraction(Fraction::from_int(value))
    }

    /// `value / 10^digits`, e.g. `from_fixed_point(123, 2)` is `1.23`.
    ///
    /// # Panics
    ///
    /// Panics if `10^digits` does not fit in an `i64` (`digits > 18`).
    pub fn from_fixed_point(
        &mut self,
        value: i64,
        digits: u32,
    ) -> Result<FractionHandle, FractionError> {
        let denominator = num_traits::pow(10_i64, digits as usize);
        self.from_fraction(Fraction::new(value, denominator))
    }

    /// `round(value * FLOAT_SCALE) / FLOAT_SCALE`.
    ///
    /// Only four decimal digits survive; see [`FLOAT_SCALE`].
    pub fn from_f32(&mut self, value: f32) -> Result<FractionHandle, FractionError> {
        self.from_f64(f64::from(value))
    }

    /// `round(value * FLOAT_SCALE) / FLOAT_SCALE`.
    ///
    /// Only four decimal digits survive; see [`FLOAT_SCALE`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_f64(&mut self, value: f64) -> Result<FractionHandle, FractionError> {
        let numerator = (value * FLOAT_SCALE as f64).round() as i64;
        self.from_fraction(Fraction::new(numerator, FLOAT_SCALE))
    }

    // -- Access --

    /// Current value behind `handle`.
    pub fn get(&self, handle: FractionHandle) -> Result<Fraction, FractionError> {
        self.arena.get(handle.0).copied().map_err(Into::into)
    }

    /// Overwrite the value behind `handle` without simplifying it.
    pub fn set(&mut self, handle: FractionHandle, value: Fraction) -> Result<(), FractionError> {
        *self.arena.get_mut(handle.0)? = value;
        Ok(())
    }

    // -- Arithmetic --

    /// Reduce the fraction behind `handle` in place.
    pub fn simplify(&mut self, handle: FractionHandle) -> Result<(), FractionError> {
        let mut value = self.get(handle)?;
        engine::simplify(&mut value, &self.primes);
        self.set(handle, value)
    }

    /// Rescale `a` and `b` in place to a shared denominator.
    ///
    /// Requires both denominators to factor over the pool's prime list.
    pub fn align_denominators(
        &mut self,
        a: FractionHandle,
        b: FractionHandle,
    ) -> Result<(), FractionError> {
        let mut left = self.get(a)?;
        let mut right = self.get(b)?;
        engine::align_denominators(&mut left, &mut right, &self.primes)?;
        self.set(a, left)?;
        self.set(b, right)
    }

    /// `out = a + b`. `a` and `b` are left simplified; `out` may alias either.
    pub fn sum(
        &mut self,
        out: FractionHandle,
        a: FractionHandle,
        b: FractionHandle,
    ) -> Result<(), FractionError> {
        self.combine(out, a, b, engine::sum)
    }

    /// `out = a - b`. `a` and `b` are left simplified; `out` may alias either.
    pub fn sub(
        &mut self,
        out: FractionHandle,
        a: FractionHandle,
        b: FractionHandle,
    ) -> Result<(), FractionError> {
        self.combine(out, a, b, engine::sub)
    }

    /// `out = a * b`. Operands are untouched; `out` may alias either.
    pub fn mul(
        &mut self,
        out: FractionHandle,
        a: FractionHandle,
        b: FractionHandle,
    ) -> Result<(), FractionError> {
        let left = self.get(a)?;
        let right = self.get(b)?;
        self.get(out)?;
        let product = engine::mul(&left, &right, &self.primes);
        self.set(out, product)
    }

    /// `out = a / b`. `out` may alias `a` but never `b`.
    pub fn div(
        &mut self,
        out: FractionHandle,
        a: FractionHandle,
        b: FractionHandle,
    ) -> Result<(), FractionError> {
        if out == b {
            return Err(FractionError::AliasedDivisor);
        }
        let left = self.get(a)?;
        let right = self.get(b)?;
        self.get(out)?;
        let quotient = engine::div(&left, &right, &self.primes)?;
        self.set(out, quotient)
    }

    fn combine(
        &mut self,
        out: FractionHandle,
        a: FractionHandle,
        b: FractionHandle,
        op: fn(&mut Fraction, &mut Fraction, &[i64]) -> Result<Fraction, FractionError>,
    ) -> Result<(), FractionError> {
        let mut left = self.get(a)?;
        let mut right = self.get(b)?;
        self.get(out)?;
        let result = op(&mut left, &mut right, &self.primes)?;
        self.set(a, left)?;
        self.set(b, right)?;
        // Written last so an aliased output ends up holding the result.
        self.set(out, result)
    }

    // -- Conversion --

    /// Integer part, truncated toward zero.
    pub fn to_int(&self, handle: FractionHandle) -> Result<i64, FractionError> {
        let value = self.nonzero(handle)?;
        value.checked_to_int().ok_or(FractionError::Overflow(value))
    }

    /// `numerator * 10^digits / denominator`, truncated toward zero.
    pub fn to_fixed_point(
        &self,
        handle: FractionHandle,
        digits: u32,
    ) -> Result<i64, FractionError> {
        let value = self.nonzero(handle)?;
        value
            .checked_to_fixed_point(digits)
            .ok_or(FractionError::Overflow(value))
    }

    /// Quotient as `f32`.
    pub fn to_f32(&self, handle: FractionHandle) -> Result<f32, FractionError> {
        self.get(handle).map(|x| x.to_f32())
    }

    /// Quotient as `f64`.
    pub fn to_f64(&self, handle: FractionHandle) -> Result<f64, FractionError> {
        self.get(handle).map(|x| x.to_f64())
    }

    /// Truncated quotient and remainder.
    pub fn to_quotient_remainder(
        &self,
        handle: FractionHandle,
    ) -> Result<(i64, i64), FractionError> {
        let value = self.nonzero(handle)?;
        value
            .checked_to_quotient_remainder()
            .ok_or(FractionError::Overflow(value))
    }

    fn nonzero(&self, handle: FractionHandle) -> Result<Fraction, FractionError> {
        let value = self.get(handle)?;
        if value.denominator == 0 {
            return Err(FractionError::ZeroDenominator);
        }
        Ok(value)
    }

    // -- Introspection --

    /// The ascending prime list shared by every operation on this pool.
    #[must_use]
    pub fn primes(&self) -> &[i64] {
        &self.primes
    }

    /// Bound the prime list was generated for.
    #[must_use]
    pub fn prime_bound(&self) -> usize {
        self.prime_bound
    }

    /// Largest prime available for simplification and alignment.
    #[must_use]
    pub fn largest_prime(&self) -> Option<i64> {
        self.primes.last().copied()
    }

    /// Number of handles currently outstanding.
    #[must_use]
    pub fn live(&self) -> usize {
        self.arena.live()
    }

    /// Number of released slots waiting for reuse.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.arena.free_len()
    }

    /// Number of storage buffers allocated.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.arena.buffer_count()
    }

    /// Total number of slots across all buffers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Usage counters of the underlying storage.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.arena.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> FractionPool {
        FractionPool::init(1_000).unwrap()
    }

    #[test]
    fn init_allocates_one_buffer_and_primes() {
        let pool = pool();
        assert_eq!(pool.buffer_count(), 1);
        assert_eq!(pool.capacity(), DEFAULT_BUFFER_CAPACITY);
        assert_eq!(pool.primes()[..4], [2, 3, 5, 7]);
        assert_eq!(pool.prime_bound(), 1_000);
        assert_eq!(pool.largest_prime(), Some(997));
    }

    #[test]
    fn from_int_and_to_int() {
        let mut pool = pool();
        let h = pool.from_int(-42).unwrap();
        assert_eq!(pool.get(h).unwrap(), Fraction::new(-42, 1));
        assert_eq!(pool.to_int(h).unwrap(), -42);
    }

    #[test]
    fn from_fixed_point_scenario() {
        let mut pool = pool();
        let h = pool.from_fixed_point(123, 2).unwrap();
        assert_eq!(pool.get(h).unwrap(), Fraction::new(123, 100));
        assert_eq!(pool.to_fixed_point(h, 2).unwrap(), 123);
        assert_eq!(pool.to_quotient_remainder(h).unwrap(), (1, 23));
    }

    #[test]
    fn from_float_scenario() {
        let mut pool = pool();
        let h = pool.from_f32(0.5).unwrap();
        assert_eq!(pool.get(h).unwrap(), Fraction::new(1, 2));
        assert!((pool.to_f32(h).unwrap() - 0.5).abs() < f32::EPSILON);

        let d = pool.from_f64(0.123_456).unwrap();
        assert!(pool.get(d).unwrap().same_value(&Fraction::new(1235, 10_000)));
    }

    #[test]
    fn release_then_acquire_reuses_slot() {
        let mut pool = pool();
        let h = pool.from_int(1).unwrap();
        let index = h.index();
        pool.release(h).unwrap();
        let h2 = pool.acquire().unwrap();
        assert_eq!(h2.index(), index);
        assert_eq!(pool.get(h2).unwrap(), Fraction::default());
        assert_eq!(pool.get(h), Err(FractionError::StaleHandle));
    }

    #[test]
    fn clone_is_independent() {
        let mut pool = pool();
        let a = pool.from_fixed_point(5, 1).unwrap();
        let b = pool.clone_handle(a).unwrap();
        assert_ne!(a, b);
        pool.set(b, Fraction::new(7, 3)).unwrap();
        assert_eq!(pool.get(a).unwrap(), Fraction::new(1, 2));
        assert_eq!(pool.get(b).unwrap(), Fraction::new(7, 3));
    }

    #[test]
    fn sum_with_out_aliasing_a() {
        let mut pool = pool();
        let a = pool.from_fixed_point(5, 1).unwrap();
        let b = pool.from_fraction(Fraction::new(1, 3)).unwrap();
        pool.sum(a, a, b).unwrap();
        assert_eq!(pool.get(a).unwrap(), Fraction::new(5, 6));
        assert_eq!(pool.get(b).unwrap(), Fraction::new(1, 3));
    }

    #[test]
    fn sub_with_out_aliasing_b() {
        let mut pool = pool();
        let a = pool.from_int(3).unwrap();
        let b = pool.from_fraction(Fraction::new(1, 4)).unwrap();
        pool.sub(b, a, b).unwrap();
        assert_eq!(pool.get(b).unwrap(), Fraction::new(11, 4));
        assert_eq!(pool.get(a).unwrap(), Fraction::new(3, 1));
    }

    #[test]
    fn div_rejects_aliased_divisor() {
        let mut pool = pool();
        let a = pool.from_int(3).unwrap();
        let b = pool.from_int(4).unwrap();
        assert_eq!(pool.div(b, a, b), Err(FractionError::AliasedDivisor));
        assert_eq!(pool.get(b).unwrap(), Fraction::new(4, 1));

        pool.div(a, a, b).unwrap();
        assert_eq!(pool.get(a).unwrap(), Fraction::new(3, 4));
    }

    #[test]
    fn mul_aliasing_either_operand() {
        let mut pool = pool();
        let a = pool.from_fraction(Fraction::new(2, 3)).unwrap();
        let b = pool.from_fraction(Fraction::new(3, 4)).unwrap();
        pool.mul(b, a, b).unwrap();
        assert_eq!(pool.get(b).unwrap(), Fraction::new(1, 2));
        pool.mul(a, a, a).unwrap();
        assert_eq!(pool.get(a).unwrap(), Fraction::new(4, 9));
    }

    #[test]
    fn stale_output_handle_leaves_operands_untouched() {
        let mut pool = pool();
        let a = pool.from_fraction(Fraction::new(1, 2)).unwrap();
        let b = pool.from_fraction(Fraction::new(1, 3)).unwrap();
        let out = pool.acquire().unwrap();
        pool.release(out).unwrap();
        assert_eq!(pool.sum(out, a, b), Err(FractionError::StaleHandle));
        assert_eq!(pool.get(a).unwrap(), Fraction::new(1, 2));
        assert_eq!(pool.get(b).unwrap(), Fraction::new(1, 3));
    }

    #[test]
    fn foreign_handle_is_reported() {
        let mut left = pool();
        let right = pool();
        let h = left.from_int(1).unwrap();
        assert_eq!(right.get(h), Err(FractionError::ForeignHandle));
    }

    #[test]
    fn alignment_beyond_bound_is_reported() {
        let mut pool = FractionPool::init(8).unwrap();
        let a = pool.from_fraction(Fraction::new(1, 2)).unwrap();
        let b = pool.from_fraction(Fraction::new(1, 7)).unwrap();
        let out = pool.acquire().unwrap();
        assert!(matches!(
            pool.sum(out, a, b),
            Err(FractionError::PrimeBoundExceeded { denominator: 7, .. })
        ));
    }

    #[test]
    fn zero_denominator_conversion_is_reported() {
        let mut pool = pool();
        let h = pool.acquire().unwrap();
        pool.set(h, Fraction::new(1, 0)).unwrap();
        assert_eq!(pool.to_int(h), Err(FractionError::ZeroDenominator));
    }

    #[test]
    fn conversion_overflow_is_reported() {
        let mut pool = pool();
        let h = pool.acquire().unwrap();
        let min = Fraction::new(i64::MIN, -1);
        pool.set(h, min).unwrap();
        assert_eq!(pool.to_int(h), Err(FractionError::Overflow(min)));
        assert_eq!(
            pool.to_quotient_remainder(h),
            Err(FractionError::Overflow(min))
        );

        pool.set(h, Fraction::new(i64::MAX, 3)).unwrap();
        assert_eq!(
            pool.to_fixed_point(h, 1),
            Err(FractionError::Overflow(Fraction::new(i64::MAX, 3)))
        );
        assert_eq!(pool.to_int(h).unwrap(), i64::MAX / 3);
    }

    #[test]
    fn unreachable_prime_bound_fails_init() {
        let err = FractionPool::init(usize::MAX).unwrap_err();
        assert_eq!(err, FractionError::Allocation("prime sieve"));
    }

    #[test]
    fn oversized_buffers_fail_init() {
        let err = FractionPool::with_buffer_capacity(10, usize::MAX).unwrap_err();
        assert_eq!(err, FractionError::Allocation("slot index space"));
    }

    #[test]
    fn teardown_is_idempotent_and_invalidates_handles() {
        let mut pool = pool();
        let h = pool.from_int(1).unwrap();
        pool.teardown();
        pool.teardown();
        assert!(pool.is_torn_down());
        assert!(pool.primes().is_empty());
        assert_eq!(pool.get(h), Err(FractionError::PoolTornDown));
        assert_eq!(pool.acquire(), Err(FractionError::PoolTornDown));
    }

    #[test]
    fn growth_past_first_buffer() {
        let mut pool = FractionPool::with_buffer_capacity(100, 4).unwrap();
        let handles: Vec<_> = (0..9).map(|v| pool.from_int(v).unwrap()).collect();
        assert_eq!(pool.buffer_count(), 3);
        for (v, &h) in (0..9).zip(&handles) {
            assert_eq!(pool.to_int(h).unwrap(), v);
        }
        assert_eq!(pool.stats().buffers_allocated, 3);
    }
}
