//! CIBIL Advisor API Library
//!
//! This library scores uploaded loan and credit card transaction files. It
//! parses a CSV upload, validates its columns, and derives a synthetic credit
//! score with supporting statistics.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `ingest`: CSV parsing and column validation.
//! - `metrics`: Credit metrics and scoring.
//! - `models`: Transaction and result models.
//! - `server`: Router and middleware assembly.

pub mod api;
pub mod core;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod server;
