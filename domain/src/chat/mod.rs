//! Chat domain.
//!
//! - [`entities::Role`]: closed set of conversation roles
//! - [`entities::ChatMessage`]: a single turn supplied by the caller
//! - [`entities::ChatRequest`]: model identifier plus ordered turns

pub mod entities;
