//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - PlatformConfig: reading and rewriting the declared clock frequency
//! - BuildRunner: cleaning, building and running a workload
//!
//! These traits keep the search controller independent of `make`, the
//! filesystem and the emulator.

pub mod build_runner;
pub mod platform_config;

pub use build_runner::BuildRunner;
pub use platform_config::PlatformConfig;
