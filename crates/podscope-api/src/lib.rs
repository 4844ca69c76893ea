//! Backend client for podscope
//!
//! This crate wraps the podscope backend's JSON endpoints for listing
//! contexts and pods, fetching pod logs, and describing pods.

mod client;
mod error;

pub use client::{ApiClient, Credentials};
pub use error::ApiError;

// Re-export types that are used in our public API
pub use podscope_types::{PodDescription, PodRef, PodSummary};
