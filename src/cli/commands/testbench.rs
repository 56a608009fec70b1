//! Implementation of the `freqprof testbench` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, TraceSource};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::toolchain::MakeToolchain;
use crate::services::{Testbench, TestbenchReport};

#[derive(Args, Debug, Default)]
pub struct TestbenchArgs {
    /// Number of runs
    #[arg(short, long)]
    pub runs: Option<u32>,

    /// Workload to run
    #[arg(short, long)]
    pub application: Option<String>,

    /// File the first failing run's output is written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl TestbenchArgs {
    /// Fold flag overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        let testbench = &mut config.testbench;
        if let Some(runs) = self.runs {
            testbench.runs = runs;
        }
        if let Some(application) = &self.application {
            testbench.application.clone_from(application);
        }
        if let Some(output) = &self.output {
            testbench.failure_output.clone_from(output);
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TestbenchOutput {
    pub success: bool,
    #[serde(flatten)]
    pub report: TestbenchReport,
}

impl CommandOutput for TestbenchOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        match (report.failed_run, &report.output_path) {
            (Some(run), Some(path)) => format!(
                "{} run {run}/{} of {} failed; output written to {}",
                style("Test failed:").red().bold(),
                report.runs_requested,
                report.application,
                path.display()
            ),
            (Some(run), None) => format!(
                "{} run {run}/{} of {} failed",
                style("Test failed:").red().bold(),
                report.runs_requested,
                report.application
            ),
            (None, _) => format!(
                "{} {}/{} runs of {} passed",
                style("All tests passed:").green().bold(),
                report.runs_completed,
                report.runs_requested,
                report.application
            ),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: TestbenchArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid testbench parameters")?;

    let runner = Arc::new(
        MakeToolchain::new(config.toolchain.clone()).with_trace_source(TraceSource::Stdout),
    );
    let report = Testbench::new(runner, config.testbench.clone()).run().await?;

    let failed_run = report.failed_run;
    output(
        &TestbenchOutput {
            success: report.passed(),
            report,
        },
        json_mode,
    );

    if let Some(run) = failed_run {
        bail!("Interrupt controller failure detected on run {run}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        TestbenchArgs {
            runs: Some(5),
            output: Some(PathBuf::from("fail.log")),
            ..TestbenchArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.testbench.runs, 5);
        assert_eq!(config.testbench.application, "multicore");
        assert_eq!(config.testbench.failure_output, PathBuf::from("fail.log"));
    }

    #[test]
    fn test_human_output_names_failing_run() {
        let output = TestbenchOutput {
            success: false,
            report: TestbenchReport {
                application: "multicore".to_string(),
                runs_requested: 100,
                runs_completed: 42,
                failed_run: Some(42),
                output_path: Some(PathBuf::from("output.txt")),
            },
        };
        let human = output.to_human();
        assert!(human.contains("run 42/100"));
        assert!(human.contains("output.txt"));
        assert_eq!(output.to_json()["failed_run"], 42);
    }
}
