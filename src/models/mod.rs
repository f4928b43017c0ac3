//! Data structures shared across the store and CLI.

pub mod config;
pub mod identity;
pub mod record;
