//! Implementation of the `freqprof search` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use std::sync::Arc;

use crate::cli::output::{format_hz, output, CommandOutput};
use crate::domain::models::{
    AggregatedResult, Config, FrequencyRange, Hz, SearchReport, Termination,
};
use crate::domain::SearchError;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::platform::TraitsFile;
use crate::infrastructure::toolchain::MakeToolchain;
use crate::services::{FrequencySearch, SequenceValidator, TraceParser};

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Range floor in Hz
    #[arg(long)]
    pub low: Option<Hz>,

    /// Range ceiling in Hz
    #[arg(long)]
    pub high: Option<Hz>,

    /// Linear-phase step and recommendation granularity in Hz
    #[arg(short, long)]
    pub step: Option<Hz>,

    /// Trials per candidate frequency
    #[arg(short, long)]
    pub measurements: Option<u32>,

    /// Workload to build and run
    #[arg(short, long)]
    pub application: Option<String>,
}

impl SearchArgs {
    /// Fold flag overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        let search = &mut config.search;
        search.range = FrequencyRange {
            low: self.low.unwrap_or(search.range.low),
            high: self.high.unwrap_or(search.range.high),
        };
        if let Some(step) = self.step {
            search.step = step;
        }
        if let Some(measurements) = self.measurements {
            search.measurements = measurements;
        }
        if let Some(application) = &self.application {
            search.application.clone_from(application);
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SearchOutput {
    pub success: bool,
    /// Whether the original frequency was written back
    pub restored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(flatten)]
    pub report: SearchReport,
}

impl SearchOutput {
    fn new(report: SearchReport, restored: bool) -> Self {
        let warning = match report.termination {
            Termination::FloorReached => Some(format!(
                "No candidate passed every trial; {} is the range floor, not a confirmed safe frequency",
                format_hz(report.highest_safe)
            )),
            Termination::Aborted => Some(format!(
                "Search aborted; last candidate was {}",
                format_hz(report.highest_safe)
            )),
            Termination::Converged | Termination::CeilingReached => None,
        };
        Self {
            success: restored && report.termination != Termination::Aborted,
            restored,
            warning,
            report,
        }
    }
}

fn probe_verdict(probe: &AggregatedResult) -> Cell {
    if probe.is_clean() {
        Cell::new("pass").fg(Color::Green)
    } else if probe.is_intermittent() {
        Cell::new("intermittent").fg(Color::Yellow)
    } else {
        Cell::new("fail").fg(Color::Red)
    }
}

fn probe_table(probes: &[AggregatedResult]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Frequency").add_attribute(Attribute::Bold),
            Cell::new("Errors").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
        ]);

    for (i, probe) in probes.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format_hz(probe.frequency)),
            Cell::new(format!("{}/{}", probe.errors, probe.total)),
            probe_verdict(probe),
        ]);
    }
    table
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let headline = match report.termination {
            Termination::Converged => style("Frequency search converged").green().bold(),
            Termination::CeilingReached => style("Every frequency up to the ceiling passed").green().bold(),
            Termination::FloorReached => style("Frequency search reached the range floor").yellow().bold(),
            Termination::Aborted => style("Frequency search aborted").red().bold(),
        };
        let elapsed = (report.finished_at - report.started_at).num_milliseconds();

        let mut lines = vec![headline.to_string(), String::new()];
        let restore_note = if self.restored {
            style("(restored)").dim()
        } else {
            style("(NOT restored)").red().bold()
        };
        lines.push(format!(
            "  Original frequency:        {} {restore_note}",
            format_hz(report.original_frequency)
        ));
        lines.push(format!(
            "  Highest unsafe frequency:  {}",
            format_hz(report.highest_unsafe)
        ));
        lines.push(format!(
            "  Highest safe frequency:    {}",
            format_hz(report.highest_safe)
        ));
        lines.push(format!(
            "  Recommended frequency:     {}",
            style(format_hz(report.recommended)).cyan().bold()
        ));
        lines.push(format!(
            "  Iterations:                {} ({:.1}s)",
            report.iterations,
            elapsed as f64 / 1000.0
        ));

        if let Some(warning) = &self.warning {
            lines.push(String::new());
            lines.push(format!("{} {warning}", style("warning:").yellow().bold()));
        }

        if !report.probes.is_empty() {
            lines.push(String::new());
            lines.push(probe_table(&report.probes).to_string());
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SearchArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config);
    ConfigLoader::validate(&config).context("Invalid search parameters")?;

    let platform = Arc::new(TraitsFile::new(
        config.platform.traits_path.clone(),
        config.platform.declaration_prefix.clone(),
    ));
    let runner = Arc::new(MakeToolchain::new(config.toolchain.clone()));

    let search = FrequencySearch::new(
        platform,
        runner,
        TraceParser::new(config.trace.dispatch_prefix.clone()),
        SequenceValidator::new(config.trace.transition_table()),
        config.search.parameters(),
        config.search.application.clone(),
    )
    .with_max_iterations(config.search.max_iterations);

    match search.run().await {
        Ok(report) => {
            output(&SearchOutput::new(report, true), json_mode);
            Ok(())
        }
        Err(err) => {
            if let Some(report) = err.report() {
                let restored = !matches!(err, SearchError::Restore { .. });
                output(&SearchOutput::new(report.clone(), restored), json_mode);
            }
            let context = match &err {
                SearchError::Restore { original, .. } => format!(
                    "Platform left misconfigured; restore {} by hand",
                    format_hz(*original)
                ),
                _ => "Frequency search failed".to_string(),
            };
            Err(anyhow::Error::new(err).context(context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SearchParameters;
    use chrono::Utc;

    fn report(termination: Termination) -> SearchReport {
        let now = Utc::now();
        SearchReport {
            original_frequency: 1000,
            highest_safe: 4991,
            highest_unsafe: 10_000,
            recommended: 4950,
            termination,
            iterations: 10,
            parameters: SearchParameters::default(),
            probes: vec![
                AggregatedResult {
                    frequency: 10_000,
                    errors: 3,
                    total: 3,
                },
                AggregatedResult {
                    frequency: 5050,
                    errors: 1,
                    total: 3,
                },
                AggregatedResult {
                    frequency: 4991,
                    errors: 0,
                    total: 3,
                },
            ],
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let mut config = Config::default();
        let args = SearchArgs {
            high: Some(8000),
            measurements: Some(5),
            ..SearchArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.search.range.low, 100);
        assert_eq!(config.search.range.high, 8000);
        assert_eq!(config.search.step, 50);
        assert_eq!(config.search.measurements, 5);
        assert_eq!(config.search.application, "ea_test");
    }

    #[test]
    fn test_floor_reached_carries_warning() {
        let output = SearchOutput::new(report(Termination::FloorReached), true);
        assert!(output.warning.is_some());
        assert!(output.to_human().contains("warning:"));

        let converged = SearchOutput::new(report(Termination::Converged), true);
        assert!(converged.warning.is_none());
    }

    #[test]
    fn test_json_output_is_flat() {
        let output = SearchOutput::new(report(Termination::Converged), true);
        let json = output.to_json();

        assert_eq!(json["success"], true);
        assert_eq!(json["recommended"], 4950);
        assert_eq!(json["highest_unsafe"], 10_000);
        assert_eq!(json["termination"], "converged");
        assert_eq!(json["probes"].as_array().map(Vec::len), Some(3));
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_aborted_is_not_success() {
        let output = SearchOutput::new(report(Termination::Aborted), true);
        assert!(!output.success);
        assert!(output.restored);

        let unrestored = SearchOutput::new(report(Termination::Converged), false);
        assert!(!unrestored.success);
        assert!(unrestored.to_human().contains("NOT restored"));
    }

    #[test]
    fn test_human_output_lists_probes() {
        let human = SearchOutput::new(report(Termination::Converged), true).to_human();
        assert!(human.contains("4,950 Hz"));
        assert!(human.contains("intermittent"));
        assert!(human.contains("1/3"));
    }
}
