//! # Birthday Prestart
//!
//! Startup task run before the backend serves traffic: waits for PostgreSQL
//! to answer, optionally creates the database, then registers the schema.
//!
//! ## Modules
//!
//! - `config`: Environment configuration for the task and its logging
//! - `prestart`: Readiness loop and schema registration

pub mod config;
pub mod prestart;
