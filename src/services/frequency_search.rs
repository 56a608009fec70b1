//! Frequency Search Controller
//!
//! Drives the [`SearchState`] machine against real collaborators: applies each
//! candidate through the [`PlatformConfig`] port, runs the configured number of
//! trials through the [`BuildRunner`] port, validates every trace, and folds
//! the error count into the next state.
//!
//! The platform's original frequency is captured before the first write and
//! restored on every exit path, including tooling aborts.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::{SearchError, SearchResult, ToolingError};
use crate::domain::models::{
    AggregatedResult, Hz, SearchParameters, SearchReport, SearchState, Termination, TrialOutcome,
};
use crate::domain::ports::{BuildRunner, PlatformConfig};
use crate::services::sequence_validator::SequenceValidator;
use crate::services::trace_parser::TraceParser;

/// Default cap on search iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Why the search loop stopped before terminating on its own.
enum Interrupted {
    Tooling {
        state: SearchState,
        source: ToolingError,
    },
    IterationLimit(SearchState),
}

/// Bisection/linear frequency search over a platform.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use freqprof::domain::models::SearchParameters;
/// use freqprof::domain::ports::{BuildRunner, PlatformConfig};
/// use freqprof::services::{FrequencySearch, SequenceValidator, TraceParser};
///
/// # async fn example(platform: Arc<dyn PlatformConfig>, runner: Arc<dyn BuildRunner>) -> anyhow::Result<()> {
/// let search = FrequencySearch::new(
///     platform,
///     runner,
///     TraceParser::new("riscv_cpu_do_interrupt"),
///     SequenceValidator::default(),
///     SearchParameters::default(),
///     "ea_test",
/// );
/// let report = search.run().await?;
/// println!("recommended: {} Hz", report.recommended);
/// # Ok(())
/// # }
/// ```
pub struct FrequencySearch {
    platform: Arc<dyn PlatformConfig>,
    runner: Arc<dyn BuildRunner>,
    parser: TraceParser,
    validator: SequenceValidator,
    params: SearchParameters,
    application: String,
    max_iterations: u32,
}

impl FrequencySearch {
    /// Create a controller over the given collaborators.
    ///
    /// `params` are checked when the search runs; invalid ones fail with
    /// [`SearchError::InvalidParameters`] before the platform is touched.
    pub fn new(
        platform: Arc<dyn PlatformConfig>,
        runner: Arc<dyn BuildRunner>,
        parser: TraceParser,
        validator: SequenceValidator,
        params: SearchParameters,
        application: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            runner,
            parser,
            validator,
            params,
            application: application.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration safety cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run the search to completion and restore the original frequency.
    #[instrument(
        skip(self),
        fields(
            application = %self.application,
            low = self.params.range.low,
            high = self.params.range.high,
            step = self.params.step,
            measurements = self.params.measurements
        )
    )]
    pub async fn run(&self) -> SearchResult<SearchReport> {
        let started_at = Utc::now();
        self.params.validate()?;

        let original = self.platform.frequency().await.map_err(SearchError::Setup)?;
        info!(original_frequency = original, "Captured original platform frequency");

        let mut probes = Vec::new();
        let outcome = self.search_loop(&mut probes).await;

        let restored = self.platform.set_frequency(original).await;
        match &restored {
            Ok(()) => info!(original_frequency = original, "Original frequency restored"),
            Err(e) => error!(
                original_frequency = original,
                error = %e,
                "Failed to restore original frequency"
            ),
        }

        match outcome {
            Ok((state, termination)) => {
                let report = SearchReport::from_state(
                    &state,
                    termination,
                    self.params,
                    original,
                    probes,
                    started_at,
                );
                match restored {
                    Ok(()) => {
                        info!(
                            highest_safe = report.highest_safe,
                            highest_unsafe = report.highest_unsafe,
                            recommended = report.recommended,
                            termination = termination.as_str(),
                            iterations = report.iterations,
                            "Frequency search finished"
                        );
                        Ok(report)
                    }
                    Err(source) => Err(SearchError::Restore {
                        original,
                        report: Box::new(report),
                        source,
                    }),
                }
            }
            Err(Interrupted::Tooling { state, source }) => {
                let report = SearchReport::from_state(
                    &state,
                    Termination::Aborted,
                    self.params,
                    original,
                    probes,
                    started_at,
                );
                match restored {
                    Ok(()) => Err(SearchError::Aborted {
                        frequency: state.current,
                        report: Box::new(report),
                        source,
                    }),
                    Err(restore_error) => {
                        error!(error = %source, "Search had already aborted before restore failed");
                        Err(SearchError::Restore {
                            original,
                            report: Box::new(report),
                            source: restore_error,
                        })
                    }
                }
            }
            Err(Interrupted::IterationLimit(state)) => match restored {
                Ok(()) => Err(SearchError::IterationLimit(self.max_iterations)),
                Err(source) => {
                    error!(
                        max_iterations = self.max_iterations,
                        "Iteration limit reached before restore failed"
                    );
                    let report = SearchReport::from_state(
                        &state,
                        Termination::Aborted,
                        self.params,
                        original,
                        probes,
                        started_at,
                    );
                    Err(SearchError::Restore {
                        original,
                        report: Box::new(report),
                        source,
                    })
                }
            },
        }
    }

    /// Measure, advance, repeat until the state machine terminates.
    async fn search_loop(
        &self,
        probes: &mut Vec<AggregatedResult>,
    ) -> Result<(SearchState, Termination), Interrupted> {
        let mut state = SearchState::initial(&self.params);

        loop {
            if state.iteration >= self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    current = state.current,
                    "Iteration limit reached"
                );
                return Err(Interrupted::IterationLimit(state));
            }

            info!(
                frequency = state.current,
                lower_bound = state.lower_bound,
                upper_bound = state.upper_bound,
                "Profiling frequency"
            );

            let result = match self.measure(state.current).await {
                Ok(result) => result,
                Err(source) => {
                    error!(frequency = state.current, error = %source, "Measurement aborted by tooling failure");
                    return Err(Interrupted::Tooling { state, source });
                }
            };
            probes.push(result);

            info!(
                frequency = result.frequency,
                errors = result.errors,
                total = result.total,
                "Frequency tested"
            );

            let transition = state.advance(&result, &self.params);
            if let Some(termination) = Termination::from_transition(&transition, &self.params) {
                return Ok((*transition.state(), termination));
            }
            state = *transition.state();
        }
    }

    /// Apply `frequency` and run every trial for it.
    async fn measure(&self, frequency: Hz) -> Result<AggregatedResult, ToolingError> {
        self.platform.set_frequency(frequency).await?;
        debug!(frequency, "Frequency applied to platform");

        let total = self.params.measurements;
        let mut errors = 0;
        for trial in 1..=total {
            debug!(trial, total, "Running measurement");
            if self.trial().await?.is_violation() {
                errors += 1;
            }
        }

        Ok(AggregatedResult {
            frequency,
            errors,
            total,
        })
    }

    /// One clean-build-run-validate cycle.
    async fn trial(&self) -> Result<TrialOutcome, ToolingError> {
        self.runner.clean().await?;
        let trace = self.runner.run(&self.application).await?;

        let events = self.parser.extract_events(&trace);
        let outcome = self.validator.validate(&events);

        match &outcome {
            TrialOutcome::Correct => debug!(events = events.len(), "Trace valid"),
            TrialOutcome::Violation { previous, next } => warn!(
                previous = %previous,
                next = %next,
                events = events.len(),
                "Interrupt ordering violation detected"
            ),
        }

        Ok(outcome)
    }
}
