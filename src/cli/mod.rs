//! CLI module for the submission-checker binary

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Cli, CheckRequest, ReportFormat};
