//! # Birthday Shared Library
//!
//! Data layer of the birthday backend: table models, the API transfer shapes
//! built on top of them, and the database plumbing that registers the schema.
//!
//! ## Module Organization
//!
//! - `models`: Table models, Public/Create/Update shapes and their CRUD operations
//! - `db`: Connection pool and schema registration
//! - `validation`: Validated JSON extractor for request bodies
//! - `error`: Error type mapping validation and database failures to HTTP responses

pub mod db;
pub mod error;
pub mod models;
pub mod validation;

/// Current version of the birthday shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
