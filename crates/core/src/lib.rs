//! Core types and shared functionality for the Bienestar document service.
//!
//! This crate provides:
//! - The document metadata record model
//! - The persisted TTL cache for resolved preview URLs
//! - Unified error types
//! - Layered application configuration

pub mod cache;
pub mod config;
pub mod document;
pub mod error;

pub use cache::{CacheEntry, DocumentCache};
pub use config::AppConfig;
pub use document::DocumentRecord;
pub use error::Error;
