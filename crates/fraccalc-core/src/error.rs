//! Error type shared by the sieve, the pool and the arithmetic engine.

use fraccalc_memory::ArenaError;

/// Error type for fraction pools and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FractionError {
    /// Growing the sieve, the prime list or the fraction storage failed.
    #[error("allocation failed while growing the {0}")]
    Allocation(&'static str),

    /// The handle was released before this use.
    #[error("handle refers to a released fraction")]
    StaleHandle,

    /// The handle belongs to another pool.
    #[error("handle was issued by a different pool")]
    ForeignHandle,

    /// The pool was torn down.
    #[error("fraction pool has been torn down")]
    PoolTornDown,

    /// `div` was asked to write its result into the divisor.
    #[error("output handle aliases the divisor")]
    AliasedDivisor,

    /// A denominator has a prime factor the pool's prime list does not contain.
    #[error(
        "denominator {denominator} has a prime factor above the largest listed \
         prime {largest_prime}"
    )]
    PrimeBoundExceeded {
        /// The offending denominator.
        denominator: i64,
        /// Largest prime available to the pool.
        largest_prime: i64,
    },

    /// An operand has a zero denominator.
    #[error("fraction has a zero denominator")]
    ZeroDenominator,

    /// The divisor is zero.
    #[error("division by a zero fraction")]
    DivisionByZero,

    /// A conversion result does not fit in an `i64`.
    #[error("conversion of {0} overflows i64")]
    Overflow(crate::fraction::Fraction),
}

impl From<ArenaError> for FractionError {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::Allocation(what) => Self::Allocation(what),
            ArenaError::StaleHandle => Self::StaleHandle,
            ArenaError::ForeignHandle => Self::ForeignHandle,
            ArenaError::TornDown => Self::PoolTornDown,
        }
    }
}
