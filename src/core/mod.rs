//! Core generation, crypto, and storage logic.

pub mod cipher;
pub mod config_io;
pub mod file_lock;
pub mod generator;
pub mod keyfile;
pub mod paths;
pub mod store;
