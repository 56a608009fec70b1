//! Implementation of the `freqprof validate` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use tokio::fs;

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, TrialOutcome};
use crate::services::{SequenceValidator, TraceParser};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Trace file to check
    pub file: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct ValidateOutput {
    pub file: PathBuf,
    pub events: usize,
    #[serde(flatten)]
    pub outcome: TrialOutcome,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        match &self.outcome {
            TrialOutcome::Correct => format!(
                "{} {} interrupt event(s) in {}",
                style("Correct:").green().bold(),
                self.events,
                self.file.display()
            ),
            TrialOutcome::Violation { previous, next } => format!(
                "{} {} may not follow {} ({} event(s) in {})",
                style("Violation:").red().bold(),
                truncate(next.as_str(), 40),
                truncate(previous.as_str(), 40),
                self.events,
                self.file.display()
            ),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Extract and validate the events of an in-memory trace.
pub fn check_trace(trace: &str, config: &Config) -> (usize, TrialOutcome) {
    let events = TraceParser::new(config.trace.dispatch_prefix.clone()).extract_events(trace);
    let outcome = SequenceValidator::new(config.trace.transition_table()).validate(&events);
    (events.len(), outcome)
}

pub async fn execute(args: ValidateArgs, config: Config, json_mode: bool) -> Result<()> {
    let trace = fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read trace file {}", args.file.display()))?;

    let (events, outcome) = check_trace(&trace, &config);
    let violated = outcome.is_violation();
    output(
        &ValidateOutput {
            file: args.file,
            events,
            outcome,
        },
        json_mode,
    );

    if violated {
        bail!("Interrupt ordering violation");
    }
    Ok(())
}
