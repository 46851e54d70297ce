//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

use fraccalc_core::DEFAULT_PRIME_BOUND;

use crate::errors::AppError;
use crate::selfcheck::Operation;

/// Which arithmetic operations the self-check exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpSelection {
    /// Subtraction only.
    Sub,
    /// Addition only.
    Sum,
    /// Multiplication only.
    Mul,
    /// Division only.
    Div,
    /// Every operation, one after the other.
    All,
}

impl OpSelection {
    /// Expand the selection into the operations to run.
    #[must_use]
    pub fn operations(self) -> Vec<Operation> {
        match self {
            Self::Sub => vec![Operation::Sub],
            Self::Sum => vec![Operation::Sum],
            Self::Mul => vec![Operation::Mul],
            Self::Div => vec![Operation::Div],
            Self::All => vec![
                Operation::Sub,
                Operation::Sum,
                Operation::Mul,
                Operation::Div,
            ],
        }
    }
}

/// FracCalc-rs — exact fraction arithmetic self-check.
///
/// Builds fractions from integers in a pooled store, combines them, converts
/// the result back and compares it with native integer arithmetic.
#[derive(Parser, Debug)]
#[command(name = "fraccalc", version, about)]
pub struct AppConfig {
    /// Number of rounds per operation.
    #[arg(short = 'n', long, default_value = "500", env = "FRACCALC_COUNT")]
    pub count: u64,

    /// Upper bound for the prime sieve.
    #[arg(long, default_value_t = DEFAULT_PRIME_BOUND, env = "FRACCALC_MAX_PRIME")]
    pub max_prime: usize,

    /// Operation to check.
    #[arg(long, value_enum, default_value = "sub")]
    pub op: OpSelection,

    /// Seed for the operand sequence.
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (report only failures).
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Reject settings the self-check cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.count == 0 {
            return Err(AppError::Config("--count must be at least 1".into()));
        }
        if self.max_prime < 2 {
            return Err(AppError::Config("--max-prime must be at least 2".into()));
        }
        if self.json && self.quiet {
            return Err(AppError::Config(
                "--json and --quiet cannot be combined".into(),
            ));
        }
        Ok(())
    }
}
