//! Service layer for the users/parts document store.
//! - Keeps the HTTP layer free of storage and classification rules.
//! - Storage sits behind `data::repository::DocumentRepository` so tests can swap it.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod data;
pub mod runtime;
pub mod storage;
