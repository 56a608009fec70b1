use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frequency::{Hz, SearchParameters};
use super::search::{AggregatedResult, SearchState, Termination};

/// Final (or partial, on abort) result of a frequency search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Frequency declared before the search touched the platform
    pub original_frequency: Hz,
    /// Converged safe frequency (the range floor when `termination` is `FloorReached`)
    pub highest_safe: Hz,
    /// Highest intermittent-failure frequency observed, or the range ceiling
    pub highest_unsafe: Hz,
    /// `highest_safe` snapped down onto the step grid
    pub recommended: Hz,
    pub termination: Termination,
    pub iterations: u32,
    pub parameters: SearchParameters,
    /// Every measured candidate, in order
    pub probes: Vec<AggregatedResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchReport {
    /// Build a report from the last state reached.
    pub fn from_state(
        state: &SearchState,
        termination: Termination,
        parameters: SearchParameters,
        original_frequency: Hz,
        probes: Vec<AggregatedResult>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            original_frequency,
            highest_safe: state.current,
            highest_unsafe: state.highest_unsafe,
            recommended: parameters.snap_to_grid(state.current),
            termination,
            iterations: state.iteration,
            parameters,
            probes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Whether `highest_safe` was actually confirmed by a clean measurement.
    pub fn is_confirmed_safe(&self) -> bool {
        matches!(
            self.termination,
            Termination::Converged | Termination::CeilingReached
        )
    }
}
