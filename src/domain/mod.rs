//! Domain layer for the frequency profiler
//!
//! This module contains the search state machine, interrupt models and the
//! ports the infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ParameterError, SearchError, SearchResult, ToolingError};
