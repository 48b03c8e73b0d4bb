//! Storage backends for the service layer
//!
//! File-backed implementations of the repository traits.

pub mod json_document_store;

pub use json_document_store::JsonFileStore;
