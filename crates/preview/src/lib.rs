//! Viewer selection for intranet documents.
//!
//! Combines the content-type classifier, the URL cache, the resolver,
//! and the reachability validator into a per-document orchestration
//! service that decides between inline rendering and direct download.

pub mod classify;
pub mod service;

pub use classify::{ViewerKind, can_preview, classify};
pub use service::{PreviewService, PreviewUrl, ViewPlan};
