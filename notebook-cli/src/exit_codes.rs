//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: General failure (storage errors, unknown note, not signed in)
//! - 2: Invalid input or usage

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General failure
pub const EXIT_WARNING: i32 = 1;

/// Invalid input or usage
pub const EXIT_ERROR: i32 = 2;
