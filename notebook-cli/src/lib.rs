//! Notebook CLI Library
//!
//! Command-line interface definitions, error mapping and exit codes for the
//! `notebook` binary.

// Re-export modules for use in tests
/// Command-line interface definitions and argument parsing
pub mod cli;
/// CLI error type and exit code mapping
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log subscriber setup
pub mod logging;
