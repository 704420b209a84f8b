//! Storage abstractions for service layer
//!
//! File-backed stores used by the JSON document backend.

pub mod json_map_store;
