//! Property-based tests for pooled fraction arithmetic.

use proptest::prelude::*;

use fraccalc_core::engine;
use fraccalc_core::{Fraction, FractionPool};

fn pool() -> FractionPool {
    FractionPool::init(10_000).unwrap()
}

fn nonzero(range: std::ops::Range<i64>) -> impl Strategy<Value = i64> {
    range.prop_filter("nonzero", |v| *v != 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Integer subtraction survives a trip through the pool.
    #[test]
    fn sub_of_integers_matches_native(
        a in -100_000_000i64..100_000_000,
        b in -100_000_000i64..100_000_000,
    ) {
        let mut pool = pool();
        let ha = pool.from_int(a).unwrap();
        let hb = pool.from_int(b).unwrap();
        pool.sub(ha, ha, hb).unwrap();
        prop_assert_eq!(pool.to_int(ha).unwrap(), a - b);
    }

    /// Integer addition survives a trip through the pool.
    #[test]
    fn sum_of_integers_matches_native(
        a in -100_000_000i64..100_000_000,
        b in -100_000_000i64..100_000_000,
    ) {
        let mut pool = pool();
        let ha = pool.from_int(a).unwrap();
        let hb = pool.from_int(b).unwrap();
        let out = pool.acquire().unwrap();
        pool.sum(out, ha, hb).unwrap();
        prop_assert_eq!(pool.to_int(out).unwrap(), a + b);
    }

    /// Simplifying twice is the same as simplifying once.
    #[test]
    fn simplify_is_idempotent(n in -1_000_000i64..1_000_000, d in nonzero(-1_000_000..1_000_000)) {
        let pool = pool();
        let mut once = Fraction::new(n, d);
        engine::simplify(&mut once, pool.primes());
        let mut twice = once;
        engine::simplify(&mut twice, pool.primes());
        prop_assert_eq!(once, twice);
        prop_assert!(once.same_value(&Fraction::new(n, d)));
    }

    /// No listed prime divides both parts of a simplified fraction.
    #[test]
    fn simplified_fraction_has_no_listed_common_factor(
        n in nonzero(-1_000_000..1_000_000),
        d in nonzero(-1_000_000..1_000_000),
    ) {
        let pool = pool();
        let mut x = Fraction::new(n, d);
        engine::simplify(&mut x, pool.primes());
        for &p in pool.primes() {
            prop_assert!(x.numerator % p != 0 || x.denominator % p != 0, "{} divides {}", p, x);
        }
    }

    /// Dividing a product by one factor recovers the other.
    #[test]
    fn div_undoes_mul(
        xn in -999i64..1000, xd in nonzero(-999..1000),
        yn in nonzero(-999..1000), yd in nonzero(-999..1000),
    ) {
        let mut pool = pool();
        let x = pool.from_fraction(Fraction::new(xn, xd)).unwrap();
        let y = pool.from_fraction(Fraction::new(yn, yd)).unwrap();
        let out = pool.acquire().unwrap();
        pool.mul(out, x, y).unwrap();
        pool.div(out, out, y).unwrap();
        pool.simplify(out).unwrap();
        prop_assert!(pool.get(out).unwrap().same_value(&pool.get(x).unwrap()));
    }

    /// Writing the sum into an operand gives the same value as a separate output.
    #[test]
    fn aliased_sum_matches_distinct_output(
        an in -999i64..1000, ad in nonzero(-999..1000),
        bn in -999i64..1000, bd in nonzero(-999..1000),
    ) {
        let mut pool = pool();
        let a = pool.from_fraction(Fraction::new(an, ad)).unwrap();
        let b = pool.from_fraction(Fraction::new(bn, bd)).unwrap();
        let a2 = pool.clone_handle(a).unwrap();
        let b2 = pool.clone_handle(b).unwrap();
        let out = pool.acquire().unwrap();

        pool.sum(out, a, b).unwrap();
        pool.sum(a2, a2, b2).unwrap();

        let distinct = pool.get(out).unwrap();
        let aliased = pool.get(a2).unwrap();
        prop_assert!(distinct.same_value(&aliased));
        prop_assert!(distinct.same_value(&Fraction::new(an * bd + bn * ad, ad * bd)));

        // Alignment may flip both signs of b; the reduced magnitudes must match.
        let mut expected_b = Fraction::new(bn, bd);
        engine::simplify(&mut expected_b, pool.primes());
        let left_b = pool.get(b2).unwrap();
        prop_assert!(left_b.same_value(&expected_b));
        if bn != 0 {
            prop_assert_eq!(left_b.numerator.abs(), expected_b.numerator.abs());
            prop_assert_eq!(left_b.denominator.abs(), expected_b.denominator.abs());
        }
    }

    /// Releasing N handles then acquiring N performs no buffer growth.
    #[test]
    fn recycling_never_grows(count in 1usize..2_000) {
        let mut pool = pool();
        let handles: Vec<_> = (0..count).map(|_| pool.acquire().unwrap()).collect();
        let buffers = pool.buffer_count();
        for &h in &handles {
            pool.release(h).unwrap();
        }
        for _ in 0..count {
            pool.acquire().unwrap();
        }
        prop_assert_eq!(pool.buffer_count(), buffers);
        prop_assert_eq!(pool.free_slots(), 0);
    }
}
