//! oanlp-common — Shared types, errors, and the HTTP client used across all oanlp crates.

pub mod error;
pub mod document;
pub mod sandbox;

// Re-export commonly used types
pub use document::Document;
pub use error::{OaNlpError, Result};
