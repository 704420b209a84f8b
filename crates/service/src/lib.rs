//! Service layer for office records.
//! - Orchestrates validation, document persistence and photo blobs.
//! - Reuses the entity and field rules from the `models` crate.
//! - Storage backends sit behind traits so tests run on in-memory mocks.

pub mod blob;
pub mod errors;
pub mod office;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
