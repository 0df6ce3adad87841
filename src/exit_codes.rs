//! Exit code constants for the textmerge CLI.
//!
//! - 0: Success, including runs where individual patch files were skipped
//! - 1: User error (bad arguments, missing input, unwritable output)
//! - 2: Parse failure (malformed base file or config)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing input paths, or unwritable output.
pub const USER_ERROR: i32 = 1;

/// Parse failure: a base entry file or the config file is malformed.
pub const PARSE_FAILURE: i32 = 2;
