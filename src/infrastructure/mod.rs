//! Infrastructure layer module
//!
//! This module contains the adapters for everything outside the process:
//! - Configuration management
//! - Logging infrastructure
//! - Platform traits header rewriting
//! - Build/run toolchain invocation
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod platform;
pub mod toolchain;
