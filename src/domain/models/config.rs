use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::frequency::{FrequencyRange, Hz, SearchParameters};
use super::interrupt::TransitionTable;
use crate::infrastructure::logging::LogConfig;

/// Main configuration structure for freqprof
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Frequency search parameters
    #[serde(default)]
    pub search: SearchConfig,

    /// Location of the platform's frequency declaration
    #[serde(default)]
    pub platform: TraitsConfig,

    /// Build/run tool invocation
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Trace extraction and validation
    #[serde(default)]
    pub trace: TraceConfig,

    /// Repeated pass/fail stress loop
    #[serde(default)]
    pub testbench: TestbenchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

/// Frequency search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Inclusive search bounds in Hz
    #[serde(default)]
    pub range: FrequencyRange,

    /// Granularity of the linear phase and the recommendation, in Hz
    #[serde(default = "default_step")]
    pub step: Hz,

    /// Trials per candidate frequency
    #[serde(default = "default_measurements")]
    pub measurements: u32,

    /// Workload passed to the build/run tool
    #[serde(default = "default_search_application")]
    pub application: String,

    /// Safety cap on search iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

const fn default_step() -> Hz {
    50
}

const fn default_measurements() -> u32 {
    3
}

fn default_search_application() -> String {
    "ea_test".to_string()
}

const fn default_max_iterations() -> u32 {
    1000
}

impl SearchConfig {
    /// Parameters handed to the controller.
    pub const fn parameters(&self) -> SearchParameters {
        SearchParameters {
            range: self.range,
            step: self.step,
            measurements: self.measurements,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            range: FrequencyRange::default(),
            step: default_step(),
            measurements: default_measurements(),
            application: default_search_application(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Platform frequency declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraitsConfig {
    /// Hardware traits header holding the frequency constant
    #[serde(default = "default_traits_path")]
    pub traits_path: PathBuf,

    /// Line prefix identifying the declaration
    #[serde(default = "default_declaration_prefix")]
    pub declaration_prefix: String,
}

fn default_traits_path() -> PathBuf {
    ["include", "machine", "riscv", "sifive_u", "sifive_u_traits.h"]
        .iter()
        .collect()
}

fn default_declaration_prefix() -> String {
    "    static const int FREQUENCY".to_string()
}

impl Default for TraitsConfig {
    fn default() -> Self {
        Self {
            traits_path: default_traits_path(),
            declaration_prefix: default_declaration_prefix(),
        }
    }
}

/// Where a run's trace is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSource {
    /// Log file written by the run (see `ToolchainConfig::log_path`)
    LogFile,
    /// Captured standard output of the run command
    Stdout,
}

/// Build/run tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolchainConfig {
    /// Build tool executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Targets invoked, in order, to clean the workspace
    #[serde(default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    /// Arguments for building and running; `{application}` is substituted
    #[serde(default = "default_run_args")]
    pub run_args: Vec<String>,

    /// Directory the tool runs in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Trace source used by the search
    #[serde(default = "default_trace_source")]
    pub trace_source: TraceSource,

    /// Log file template, relative to `working_dir`; `{application}` is substituted
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

fn default_program() -> String {
    "make".to_string()
}

fn default_clean_targets() -> Vec<String> {
    vec!["clean".to_string(), "veryclean".to_string()]
}

fn default_run_args() -> Vec<String> {
    vec!["APPLICATION={application}".to_string(), "run".to_string()]
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_trace_source() -> TraceSource {
    TraceSource::LogFile
}

fn default_log_path() -> String {
    "img/{application}.log".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            clean_targets: default_clean_targets(),
            run_args: default_run_args(),
            working_dir: default_working_dir(),
            trace_source: default_trace_source(),
            log_path: default_log_path(),
        }
    }
}

/// Trace extraction and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraceConfig {
    /// Prefix of lines recording an interrupt dispatch
    #[serde(default = "default_dispatch_prefix")]
    pub dispatch_prefix: String,

    /// Allowed successors per interrupt descriptor; the RISC-V timer chain when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<TransitionTable>,
}

impl TraceConfig {
    /// Configured table, or the default timer chain.
    pub fn transition_table(&self) -> TransitionTable {
        self.transitions.clone().unwrap_or_default()
    }
}

fn default_dispatch_prefix() -> String {
    "riscv_cpu_do_interrupt".to_string()
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            dispatch_prefix: default_dispatch_prefix(),
            transitions: None,
        }
    }
}

/// Repeated pass/fail stress loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TestbenchConfig {
    /// Number of runs
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Workload to run
    #[serde(default = "default_testbench_application")]
    pub application: String,

    /// Output text marking an interrupt-controller failure
    #[serde(default = "default_failure_marker")]
    pub failure_marker: String,

    /// Output text marking a successful run
    #[serde(default = "default_success_marker")]
    pub success_marker: String,

    /// File the output of the first failing run is written to
    #[serde(default = "default_failure_output")]
    pub failure_output: PathBuf,
}

const fn default_runs() -> u32 {
    100
}

fn default_testbench_application() -> String {
    "multicore".to_string()
}

fn default_failure_marker() -> String {
    "IC:".to_string()
}

fn default_success_marker() -> String {
    "Hello multicore world!".to_string()
}

fn default_failure_output() -> PathBuf {
    PathBuf::from("output.txt")
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            application: default_testbench_application(),
            failure_marker: default_failure_marker(),
            success_marker: default_success_marker(),
            failure_output: default_failure_output(),
        }
    }
}
