//! Round-trip self-check of pooled fraction arithmetic.
//!
//! Each round builds two fractions from integers, combines them in place,
//! converts the result back with `to_int` and compares it with the native
//! integer result. Both handles are released at the end of every round, so
//! a healthy run never grows the pool past its first buffer.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use fraccalc_core::{FractionError, FractionPool, PoolStats};

use crate::config::AppConfig;

/// Operands are drawn from `-OPERAND_LIMIT..=OPERAND_LIMIT` (`i32::MAX / 10`).
pub const OPERAND_LIMIT: i64 = 214_748_364;

/// An arithmetic operation under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// `a - b`
    Sub,
    /// `a + b`
    Sum,
    /// `a * b`
    Mul,
    /// `a / b`, truncated
    Div,
}

impl Operation {
    /// Native integer result the pool must reproduce.
    #[must_use]
    pub fn expected(self, a: i64, b: i64) -> i64 {
        match self {
            Self::Sub => a - b,
            Self::Sum => a + b,
            Self::Mul => a * b,
            Self::Div => a / b,
        }
    }

    /// Run one round against `pool`, returning the converted result.
    pub fn run_round(self, pool: &mut FractionPool, a: i64, b: i64) -> Result<i64, FractionError> {
        let ha = pool.from_int(a)?;
        let hb = pool.from_int(b)?;
        match self {
            Self::Sub => pool.sub(ha, ha, hb)?,
            Self::Sum => pool.sum(ha, ha, hb)?,
            Self::Mul => pool.mul(ha, ha, hb)?,
            Self::Div => pool.div(ha, ha, hb)?,
        }
        let value = pool.to_int(ha)?;
        pool.release(ha)?;
        pool.release(hb)?;
        Ok(value)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sub => "sub",
            Self::Sum => "sum",
            Self::Mul => "mul",
            Self::Div => "div",
        };
        f.pad(name)
    }
}

/// Deterministic operand sequence (`SplitMix64`).
#[derive(Debug, Clone)]
pub struct OperandStream {
    state: u64,
}

impl OperandStream {
    /// Start a sequence from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Next operand in `-OPERAND_LIMIT..=OPERAND_LIMIT`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn next_operand(&mut self) -> i64 {
        let span = (2 * OPERAND_LIMIT + 1) as u64;
        (self.next_u64() % span) as i64 - OPERAND_LIMIT
    }

    /// Next operand pair for `op`; divisors are never zero.
    pub fn next_pair(&mut self, op: Operation) -> (i64, i64) {
        let a = self.next_operand();
        let mut b = self.next_operand();
        if op == Operation::Div && b == 0 {
            b = 1;
        }
        (a, b)
    }
}

/// Outcome of one operation's rounds.
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    /// The operation exercised.
    pub operation: Operation,
    /// Rounds run.
    pub rounds: u64,
    /// Rounds whose result differed from native arithmetic.
    pub mismatches: u64,
}

/// Outcome of a complete self-check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Configured sieve bound.
    pub prime_bound: usize,
    /// Number of primes the sieve produced.
    pub primes: usize,
    /// Seed of the operand sequence.
    pub seed: u64,
    /// Per-operation results.
    pub operations: Vec<OperationReport>,
    /// Storage buffers allocated by the pool.
    pub buffers: usize,
    /// Slot usage counters.
    pub pool: PoolStats,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u128,
}

impl CheckReport {
    /// Total mismatching rounds across all operations.
    #[must_use]
    pub fn mismatches(&self) -> u64 {
        self.operations.iter().map(|op| op.mismatches).sum()
    }

    /// Total rounds across all operations.
    #[must_use]
    pub fn rounds(&self) -> u64 {
        self.operations.iter().map(|op| op.rounds).sum()
    }
}

/// Run the configured rounds against a fresh pool.
pub fn run(config: &AppConfig) -> Result<CheckReport, FractionError> {
    let start = Instant::now();
    let mut pool = FractionPool::init(config.max_prime)?;
    let mut operands = OperandStream::new(config.seed);
    let mut operations = Vec::new();

    for op in config.op.operations() {
        let mut mismatches = 0;
        for _ in 0..config.count {
            let (a, b) = operands.next_pair(op);
            let actual = op.run_round(&mut pool, a, b)?;
            let expected = op.expected(a, b);
            if actual != expected {
                mismatches += 1;
                warn!(%op, a, b, expected, actual, "round mismatch");
            }
        }
        info!(%op, rounds = config.count, mismatches, "operation checked");
        operations.push(OperationReport {
            operation: op,
            rounds: config.count,
            mismatches,
        });
    }

    let report = CheckReport {
        prime_bound: pool.prime_bound(),
        primes: pool.primes().len(),
        seed: config.seed,
        operations,
        buffers: pool.buffer_count(),
        pool: pool.stats(),
        elapsed_ms: start.elapsed().as_millis(),
    };
    pool.teardown();
    debug!(rounds = report.rounds(), "self-check finished");
    Ok(report)
}
