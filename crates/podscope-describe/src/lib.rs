//! Text rendering for podscope
//!
//! This crate turns backend payloads into display text: the
//! `kubectl describe`-style pod report and compact pod ages.

mod age;
mod describe;

pub use age::{format_age, format_age_now, format_elapsed_seconds, parse_timestamp};
pub use describe::{NONE_PLACEHOLDER, format_pod_description};

// Re-export the input type so callers only need this crate to render
pub use podscope_types::PodDescription;
