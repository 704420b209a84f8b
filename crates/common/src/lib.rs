//! Shared helpers for the offices workspace: logging setup, filesystem
//! environment checks and small response types used by several crates.

pub mod types;
pub mod utils;
pub mod env;
