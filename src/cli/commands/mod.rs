//! Subcommand implementations.

pub mod search;
pub mod testbench;
pub mod validate;
