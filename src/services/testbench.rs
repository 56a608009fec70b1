//! Testbench Service
//!
//! Repeated pass/fail stress loop: cleans once, then runs a workload over and
//! over until a run shows the interrupt-controller failure marker without the
//! success marker. The first failing output is saved for inspection.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::TestbenchConfig;
use crate::domain::ports::BuildRunner;

/// Outcome of a testbench session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestbenchReport {
    pub application: String,
    pub runs_requested: u32,
    /// Runs that finished, including a failing one
    pub runs_completed: u32,
    /// 1-based index of the first failing run
    pub failed_run: Option<u32>,
    /// Where the failing run's output was written
    pub output_path: Option<PathBuf>,
}

impl TestbenchReport {
    /// Every requested run passed.
    pub const fn passed(&self) -> bool {
        self.failed_run.is_none()
    }
}

/// Runs one workload repeatedly and stops at the first failure.
pub struct Testbench {
    runner: Arc<dyn BuildRunner>,
    config: TestbenchConfig,
}

impl Testbench {
    /// Create a testbench over `runner`.
    pub fn new(runner: Arc<dyn BuildRunner>, config: TestbenchConfig) -> Self {
        Self { runner, config }
    }

    /// Whether a run's output indicates a failure.
    pub fn is_failure(&self, output: &str) -> bool {
        output.contains(&self.config.failure_marker) && !output.contains(&self.config.success_marker)
    }

    /// Execute the configured number of runs.
    #[instrument(skip(self), fields(application = %self.config.application, runs = self.config.runs))]
    pub async fn run(&self) -> Result<TestbenchReport> {
        self.runner
            .clean()
            .await
            .context("Failed to clean build workspace before testbench")?;

        let mut report = TestbenchReport {
            application: self.config.application.clone(),
            runs_requested: self.config.runs,
            runs_completed: 0,
            failed_run: None,
            output_path: None,
        };

        for run in 1..=self.config.runs {
            info!(run, total = self.config.runs, "Running test");

            let output = self
                .runner
                .run(&self.config.application)
                .await
                .with_context(|| format!("Run {run}/{} failed to execute", self.config.runs))?;
            report.runs_completed = run;

            if self.is_failure(&output) {
                warn!(run, "Test failed");
                fs::write(&self.config.failure_output, &output)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to write failing output to {}",
                            self.config.failure_output.display()
                        )
                    })?;
                report.failed_run = Some(run);
                report.output_path = Some(self.config.failure_output.clone());
                break;
            }

            debug!(run, "Test passed");
        }

        Ok(report)
    }
}
