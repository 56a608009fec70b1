//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::search::SearchArgs;
use super::commands::testbench::TestbenchArgs;
use super::commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "freqprof")]
#[command(about = "freqprof - interrupt-timing frequency profiler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to freqprof.yaml)
    #[arg(short, long, global = true, env = "FREQPROF_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for the highest frequency with a correct interrupt sequence
    Search(SearchArgs),

    /// Run a workload repeatedly until the interrupt controller misbehaves
    Testbench(TestbenchArgs),

    /// Validate the interrupt sequence of an existing trace file
    Validate(ValidateArgs),
}
