//! Frequency units, ranges and search parameters.

use serde::{Deserialize, Serialize};

use crate::domain::errors::ParameterError;

/// Clock frequency in hertz.
pub type Hz = u64;

/// Inclusive frequency range the search is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FrequencyRange {
    /// Range floor (inclusive)
    pub low: Hz,
    /// Range ceiling (inclusive)
    pub high: Hz,
}

impl FrequencyRange {
    /// Create a range, returning `None` when `low > high`.
    pub const fn new(low: Hz, high: Hz) -> Option<Self> {
        if low > high {
            None
        } else {
            Some(Self { low, high })
        }
    }

    /// Whether `hz` lies inside the range.
    pub const fn contains(&self, hz: Hz) -> bool {
        hz >= self.low && hz <= self.high
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self {
            low: 100,
            high: 10_000,
        }
    }
}

/// Parameters threaded into the search controller at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Frequencies the search may visit
    pub range: FrequencyRange,
    /// Granularity of the linear phase and of the recommendation grid
    pub step: Hz,
    /// Trials run per candidate frequency
    pub measurements: u32,
}

impl SearchParameters {
    /// Check the invariants the search relies on: `low <= high`, a non-zero
    /// step and at least one measurement.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let FrequencyRange { low, high } = self.range;
        FrequencyRange::new(low, high).ok_or(ParameterError::InvertedRange { low, high })?;

        if self.step == 0 {
            return Err(ParameterError::ZeroStep);
        }
        if self.measurements == 0 {
            return Err(ParameterError::ZeroMeasurements);
        }
        Ok(())
    }

    /// Snap a frequency down onto the `step` grid anchored at `range.low`.
    ///
    /// Frequencies below the floor snap to the floor. A zero step has no grid
    /// and leaves the frequency as is.
    pub const fn snap_to_grid(&self, hz: Hz) -> Hz {
        let offset = hz.saturating_sub(self.range.low);
        match offset.checked_div(self.step) {
            Some(steps) => steps * self.step + self.range.low,
            None => offset + self.range.low,
        }
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            range: FrequencyRange::default(),
            step: 50,
            measurements: 3,
        }
    }
}
