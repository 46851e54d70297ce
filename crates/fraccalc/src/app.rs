//! Application entry point and dispatch.

use anyhow::Result;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::selfcheck::{self, CheckReport};
use crate::version::full_version;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        clap_complete::generate(shell, &mut cmd, "fraccalc", &mut std::io::stdout());
        return Ok(());
    }

    config.validate()?;
    let report = selfcheck::run(config).map_err(AppError::from)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !config.quiet {
        present(&report);
    }

    let mismatches = report.mismatches();
    if mismatches > 0 {
        return Err(AppError::Mismatch(mismatches).into());
    }
    Ok(())
}

fn present(report: &CheckReport) {
    println!(
        "{} self-check (prime bound {}, {} primes, seed {})",
        full_version(),
        report.prime_bound,
        report.primes,
        report.seed
    );
    for op in &report.operations {
        println!(
            "  {:<4} {} rounds, {} mismatches",
            op.operation,
            op.rounds,
            op.mismatches
        );
    }
    println!(
        "  pool: {} buffer(s), {} fresh slot(s), {} reused, {} released",
        report.buffers, report.pool.fresh, report.pool.reused, report.pool.released
    );
    println!("  elapsed: {} ms", report.elapsed_ms);
}
