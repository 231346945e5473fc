//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ErrorCategory`]: machine-readable failure categories exposed to callers

pub mod error;
