//! Utility modules for filesystem operations.

pub mod fs;
