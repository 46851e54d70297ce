//! Constants for pool sizing, sieve granularity and value scaling.

/// Number of fraction slots in every storage buffer of a pool.
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Prime bound used when none is configured.
pub const DEFAULT_PRIME_BOUND: usize = 1_000_000;

/// The sieve bound is rounded up to a multiple of this value.
pub const SIEVE_GRANULARITY: usize = 8;

/// Denominator given to fractions built from `f32`/`f64` values.
///
/// Floating-point sources keep exactly four decimal digits: the numerator is
/// `round(v * FLOAT_SCALE)`. This precision is fixed and not configurable.
pub const FLOAT_SCALE: i64 = 10_000;

/// Process exit codes used by the `fraccalc` binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A self-check round produced a value different from native arithmetic.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}
