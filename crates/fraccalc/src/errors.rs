//! Error handling and exit codes.

use fraccalc_core::constants::exit_codes;
use fraccalc_core::FractionError;

/// Errors surfaced by the `fraccalc` application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid command-line configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Some rounds disagreed with native integer arithmetic.
    #[error("{0} round(s) disagreed with native arithmetic")]
    Mismatch(u64),

    /// The fraction pool reported an error.
    #[error(transparent)]
    Fraction(#[from] FractionError),
}

/// Map an application error to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => exit_codes::ERROR_CONFIG,
        Some(AppError::Mismatch(_)) => exit_codes::ERROR_MISMATCH,
        Some(AppError::Fraction(_)) | None => exit_codes::ERROR_GENERIC,
    }
}
