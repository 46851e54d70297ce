//! Bit sieve producing the ascending prime list shared by a pool.
//!
//! Only odd candidates are stored: bit `i` stands for the value `2i + 3`.
//! The requested bound is first rounded up to a multiple of
//! [`SIEVE_GRANULARITY`](crate::constants::SIEVE_GRANULARITY); the sieve then
//! holds `rounded / 2 - 2` candidates, i.e. the odd values `3..=rounded - 3`.
//! A list can therefore stop slightly above or below the requested bound,
//! and a bound that is itself prime may be left out: `generate(7)` is
//! `[2, 3, 5]` and `generate(31)` ends at 29. `generate(30)` and
//! `generate(32)` both end at 29, `generate(33)` ends at 37.

use tracing::debug;

use crate::constants::SIEVE_GRANULARITY;
use crate::error::FractionError;

/// Composite flags for odd candidates, one bit each.
struct BitSieve {
    bits: Vec<u8>,
    len: usize,
}

impl BitSieve {
    fn new(len: usize) -> Result<Self, FractionError> {
        let bytes = len.div_ceil(8);
        let mut bits = Vec::new();
        bits.try_reserve_exact(bytes)
            .map_err(|_| FractionError::Allocation("prime sieve"))?;
        bits.resize(bytes, 0);
        Ok(Self { bits, len })
    }

    fn is_composite(&self, index: usize) -> bool {
        self.bits[index / 8] & (1 << (index % 8)) != 0
    }

    fn mark(&mut self, index: usize) {
        self.bits[index / 8] |= 1 << (index % 8);
    }

    fn value(index: usize) -> usize {
        2 * index + 3
    }
}

/// Number of odd candidates the sieve covers for `bound`.
fn candidate_count(bound: usize) -> Result<usize, FractionError> {
    let rounded = bound
        .div_ceil(SIEVE_GRANULARITY)
        .checked_mul(SIEVE_GRANULARITY)
        .ok_or(FractionError::Allocation("prime sieve"))?;
    Ok((rounded / 2).saturating_sub(2))
}

/// Generate the ascending list of primes for `bound`.
///
/// The list always starts with 2. No partial list is returned on failure.
#[allow(clippy::cast_possible_wrap)]
pub fn generate(bound: usize) -> Result<Vec<i64>, FractionError> {
    let len = candidate_count(bound)?;
    let mut sieve = BitSieve::new(len)?;

    let mut found = 0usize;
    for index in 0..sieve.len {
        if sieve.is_composite(index) {
            continue;
        }
        found += 1;
        let step = BitSieve::value(index);
        let mut multiple = index + step;
        while multiple < sieve.len {
            sieve.mark(multiple);
            multiple += step;
        }
    }

    let mut primes = Vec::new();
    primes
        .try_reserve_exact(found + 1)
        .map_err(|_| FractionError::Allocation("prime list"))?;
    primes.push(2);
    primes.extend(
        (0..sieve.len)
            .filter(|&index| !sieve.is_composite(index))
            .map(|index| BitSieve::value(index) as i64),
    );

    debug!(bound, candidates = len, primes = primes.len(), "generated prime list");
    Ok(primes)
}
