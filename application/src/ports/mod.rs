//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod cli_gateway;
pub mod conversation_logger;
pub mod progress;
