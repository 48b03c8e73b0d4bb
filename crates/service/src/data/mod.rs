//! Data module: three-layer architecture (domain, repository, service).
//!
//! Holds the users/parts document model and the read / upsert / replace workflows.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::DataService;
