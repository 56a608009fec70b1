use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::{TraceSource, TransitionTable};

/// Default project configuration file
pub const DEFAULT_CONFIG_FILE: &str = "freqprof.yaml";

/// Optional local override file
pub const LOCAL_CONFIG_FILE: &str = ".freqprof/local.yaml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FREQPROF_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid frequency range: low ({0}) must not exceed high ({1})")]
    InvalidRange(u64, u64),

    #[error("Invalid step: {0}. Must be positive")]
    InvalidStep(u64),

    #[error("Invalid measurements: {0}. Must be at least 1")]
    InvalidMeasurements(u32),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid testbench runs: {0}. Must be at least 1")]
    InvalidRuns(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `freqprof.yaml`, or `path` when given
    /// 3. `.freqprof/local.yaml` (local overrides, optional)
    /// 4. Environment variables (`FREQPROF_*` prefix, `__` separates nested keys)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let primary = path.map_or_else(|| Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), Path::to_path_buf);

        let config: Config = Self::figment(&primary)
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", primary.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let search = &config.search;
        if search.range.low > search.range.high {
            return Err(ConfigError::InvalidRange(
                search.range.low,
                search.range.high,
            ));
        }

        if search.step == 0 {
            return Err(ConfigError::InvalidStep(search.step));
        }

        if search.measurements == 0 {
            return Err(ConfigError::InvalidMeasurements(search.measurements));
        }

        if search.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(search.max_iterations));
        }

        if search.application.trim().is_empty() {
            return Err(ConfigError::EmptyField("search.application"));
        }

        if config.platform.declaration_prefix.is_empty() {
            return Err(ConfigError::EmptyField("platform.declaration_prefix"));
        }

        if config.platform.traits_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyField("platform.traits_path"));
        }

        if config.toolchain.program.trim().is_empty() {
            return Err(ConfigError::EmptyField("toolchain.program"));
        }

        if config.toolchain.run_args.is_empty() {
            return Err(ConfigError::EmptyField("toolchain.run_args"));
        }

        if config.toolchain.trace_source == TraceSource::LogFile
            && config.toolchain.log_path.trim().is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "toolchain.log_path is required when trace_source is log_file".to_string(),
            ));
        }

        if config.trace.dispatch_prefix.is_empty() {
            return Err(ConfigError::EmptyField("trace.dispatch_prefix"));
        }

        if config
            .trace
            .transitions
            .as_ref()
            .is_some_and(TransitionTable::is_empty)
        {
            return Err(ConfigError::EmptyField("trace.transitions"));
        }

        if config.testbench.runs == 0 {
            return Err(ConfigError::InvalidRuns(config.testbench.runs));
        }

        if config.testbench.failure_marker.is_empty() {
            return Err(ConfigError::EmptyField("testbench.failure_marker"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
