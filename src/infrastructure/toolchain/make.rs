//! `make`-driven build/run adapter.
//!
//! Cleans with `make clean` / `make veryclean`, builds and runs with
//! `make APPLICATION=<app> run`, then reads the trace from the workload's log
//! file or from the captured stdout.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::domain::errors::ToolingError;
use crate::domain::models::{ToolchainConfig, TraceSource};
use crate::domain::ports::BuildRunner;

const APPLICATION_PLACEHOLDER: &str = "{application}";

/// [`BuildRunner`] that shells out to a make-style build tool.
#[derive(Debug, Clone)]
pub struct MakeToolchain {
    config: ToolchainConfig,
}

impl MakeToolchain {
    /// Create an adapter from toolchain configuration.
    pub const fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Same toolchain, reading traces from `source` instead.
    #[must_use]
    pub const fn with_trace_source(mut self, source: TraceSource) -> Self {
        self.config.trace_source = source;
        self
    }

    /// Arguments for the run invocation of `application`.
    pub fn run_args(&self, application: &str) -> Vec<String> {
        self.config
            .run_args
            .iter()
            .map(|arg| arg.replace(APPLICATION_PLACEHOLDER, application))
            .collect()
    }

    /// Log file the run of `application` writes its trace to.
    pub fn log_path(&self, application: &str) -> PathBuf {
        self.config
            .working_dir
            .join(self.config.log_path.replace(APPLICATION_PLACEHOLDER, application))
    }

    fn describe(&self, args: &[String]) -> String {
        std::iter::once(self.config.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tool with `args` to completion, returning its stdout.
    async fn invoke(&self, args: &[String]) -> Result<String, ToolingError> {
        let command = self.describe(args);
        debug!(command = %command, "Running build tool");

        let output = Command::new(&self.config.program)
            .args(args)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ToolingError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(command = %command, status = %output.status, stderr = %stderr, "Build tool failed");
            Err(ToolingError::ProcessFailed {
                command,
                status: output.status.to_string(),
                stderr,
            })
        }
    }

    async fn read_log(path: &Path) -> Result<String, ToolingError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| ToolingError::io(path, e))
    }
}

#[async_trait]
impl BuildRunner for MakeToolchain {
    #[instrument(skip(self))]
    async fn clean(&self) -> Result<(), ToolingError> {
        for target in &self.config.clean_targets {
            self.invoke(std::slice::from_ref(target)).await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn run(&self, application: &str) -> Result<String, ToolingError> {
        let stdout = self.invoke(&self.run_args(application)).await?;

        match self.config.trace_source {
            TraceSource::Stdout => Ok(stdout),
            TraceSource::LogFile => Self::read_log(&self.log_path(application)).await,
        }
    }
}
