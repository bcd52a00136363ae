//! submission-checker entry point
//!
//! Initializes logging and delegates to the check command.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dcase_submission_checker::CheckerError;
use dcase_submission_checker::cli::Cli;
use dcase_submission_checker::cli::commands::check::handle_check;
use dcase_submission_checker::submission::EXIT_FATAL;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --log-level CLI arg
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());

    // Logs go to stderr so the report on stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    let mut stdout = std::io::stdout().lock();
    match handle_check(&cli, &mut stdout) {
        Ok(outcome) => ExitCode::from(outcome.exit_code),
        Err(err) => {
            match err.downcast_ref::<CheckerError>() {
                Some(checker_error) => eprintln!("{}", checker_error.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::from(EXIT_FATAL)
        }
    }
}
