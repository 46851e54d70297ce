//! # fraccalc-core
//!
//! Exact rational arithmetic over pooled storage.
//!
//! A [`FractionPool`] owns every fraction value together with an ascending
//! prime list produced by a bit sieve at initialization. Values are reached
//! through `Copy` handles; arithmetic simplifies results by cancelling the
//! listed primes, and aligns denominators by multiplying in missing ones.
//!
//! # Example
//! ```
//! use fraccalc_core::{Fraction, FractionPool};
//!
//! let mut pool = FractionPool::init(1_000).unwrap();
//! let a = pool.from_int(3).unwrap();
//! let b = pool.from_fixed_point(25, 2).unwrap();
//! pool.sum(a, a, b).unwrap();
//! assert_eq!(pool.get(a).unwrap(), Fraction::new(13, 4));
//! assert_eq!(pool.to_fixed_point(a, 2).unwrap(), 325);
//! pool.release(b).unwrap();
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod fraction;
pub mod pool;
pub mod sieve;

// Re-exports
pub use constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_PRIME_BOUND, FLOAT_SCALE};
pub use error::FractionError;
pub use fraction::Fraction;
pub use pool::{FractionHandle, FractionPool};

pub use fraccalc_memory::PoolStats;
