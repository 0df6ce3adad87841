//! Filesystem utilities for textmerge.
//!
//! This module provides atomic write operations so output files are never
//! left in a partially written state.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
