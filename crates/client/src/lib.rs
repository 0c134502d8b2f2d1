//! Client-side building blocks for the document preview subsystem.
//!
//! This crate provides preview URL resolution, reachability probing, and
//! thin HTTP clients for the intranet document metadata and download APIs.

pub mod api;
pub mod probe;
pub mod resolve;

pub use api::{ApiClient, ApiConfig, ApiError, DocumentPage, DocumentQuery};
pub use probe::{HttpProber, UrlProber, Validator};
pub use resolve::{UrlResolver, is_trusted_url};
