//! Password generation and encrypted credential storage CLI.
//!
//! Generates random passwords under character-class policies and stores
//! them encrypted (ChaCha20-Poly1305) under a label or service+username
//! identity, in a JSON file or SQLite database.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Generation, crypto, and storage logic
//! - `models` — Data structures
//! - `util` — Filesystem utilities

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;
