//! Frequency search state machine.
//!
//! The search is a pure transition function over [`SearchState`]: the
//! controller measures the current candidate, builds an [`AggregatedResult`]
//! and calls [`SearchState::advance`], which either yields the next state or
//! terminates. No I/O happens here.
//!
//! Two phases:
//! - **Bisection** while `upper_bound - lower_bound > step`: a failing
//!   candidate becomes the new upper bound, a clean one the new lower bound,
//!   and the next candidate is the floored midpoint.
//! - **Linear** once the gap is `<= step`: a failing candidate steps down by
//!   `step`; the first clean candidate is the converged answer.

use serde::{Deserialize, Serialize};

use super::frequency::{Hz, SearchParameters};

/// Error counts gathered for one candidate frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Candidate the trials ran at
    pub frequency: Hz,
    /// Trials that reported a violation
    pub errors: u32,
    /// Trials run
    pub total: u32,
}

impl AggregatedResult {
    /// Every trial passed.
    pub const fn is_clean(&self) -> bool {
        self.errors == 0
    }

    /// Some, but not all, trials failed.
    pub const fn is_intermittent(&self) -> bool {
        self.errors > 0 && self.errors < self.total
    }
}

/// Mutable search bookkeeping, replaced wholesale on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Candidate to measure next (or the final answer once terminated)
    pub current: Hz,
    /// Highest frequency known to pass, or the range floor
    pub lower_bound: Hz,
    /// Lowest frequency known to fail, or the range ceiling
    pub upper_bound: Hz,
    /// Most recent candidate with intermittent failures; starts at the ceiling
    pub highest_unsafe: Hz,
    /// Number of results folded in so far
    pub iteration: u32,
}

/// Which end of the range a search ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBoundary {
    /// Stepped below `range.low` without a clean result
    Floor,
    /// Midpoint landed above `range.high`
    Ceiling,
}

/// Outcome of folding one [`AggregatedResult`] into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Measure `state.current` next
    Continue(SearchState),
    /// Gap closed to `<= step` with a clean result at `state.current`
    Converged(SearchState),
    /// Ran off one end of the configured range
    Exhausted {
        state: SearchState,
        boundary: RangeBoundary,
    },
}

impl Transition {
    /// State carried by the transition.
    pub const fn state(&self) -> &SearchState {
        match self {
            Self::Continue(state) | Self::Converged(state) | Self::Exhausted { state, .. } => state,
        }
    }

    /// Whether the search stops here.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue(_))
    }
}

/// How a finished search ended, as reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Boundary located inside the range
    Converged,
    /// The range ceiling is safe; the real boundary may lie above it
    CeilingReached,
    /// Nothing in the range was confirmed safe; the result is the floor
    FloorReached,
    /// A tooling failure stopped the search before it terminated
    Aborted,
}

impl Termination {
    /// Classify a terminal transition. Non-terminal transitions yield `None`.
    pub fn from_transition(transition: &Transition, params: &SearchParameters) -> Option<Self> {
        match transition {
            Transition::Continue(_) => None,
            Transition::Converged(state) if state.current >= params.range.high => {
                Some(Self::CeilingReached)
            }
            Transition::Converged(_) => Some(Self::Converged),
            Transition::Exhausted {
                boundary: RangeBoundary::Ceiling,
                ..
            } => Some(Self::CeilingReached),
            Transition::Exhausted {
                boundary: RangeBoundary::Floor,
                ..
            } => Some(Self::FloorReached),
        }
    }

    /// Short label for human output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::CeilingReached => "ceiling reached",
            Self::FloorReached => "floor reached",
            Self::Aborted => "aborted",
        }
    }
}

impl SearchState {
    /// Initial state: start at the ceiling with the whole range open.
    pub const fn initial(params: &SearchParameters) -> Self {
        Self {
            current: params.range.high,
            lower_bound: params.range.low,
            upper_bound: params.range.high,
            highest_unsafe: params.range.high,
            iteration: 0,
        }
    }

    /// Whether the bound gap is still wider than one step.
    pub const fn in_bisection(&self, params: &SearchParameters) -> bool {
        self.upper_bound - self.lower_bound > params.step
    }

    /// Fold the measurement of `self.current` into the next state.
    pub fn advance(&self, result: &AggregatedResult, params: &SearchParameters) -> Transition {
        debug_assert_eq!(result.frequency, self.current);

        let mut next = Self {
            iteration: self.iteration + 1,
            ..*self
        };
        let range = params.range;
        let step = params.step;

        if !result.is_clean() {
            if result.is_intermittent() {
                next.highest_unsafe = self.current;
            }

            if self.in_bisection(params) {
                next.upper_bound = self.current;
                next.current = self.lower_bound + (self.current - self.lower_bound) / 2;
                return Transition::Continue(next);
            }

            match self.current.checked_sub(step) {
                Some(lowered) if lowered >= range.low => {
                    next.current = lowered;
                    next.upper_bound = lowered;
                    next.lower_bound = lowered.saturating_sub(step).max(range.low);
                    Transition::Continue(next)
                }
                _ => {
                    next.current = range.low;
                    Transition::Exhausted {
                        state: next,
                        boundary: RangeBoundary::Floor,
                    }
                }
            }
        } else if self.in_bisection(params) {
            next.lower_bound = self.current;
            next.current = self.current + (self.upper_bound - self.current) / 2;

            if next.current > range.high {
                next.current = range.high;
                return Transition::Exhausted {
                    state: next,
                    boundary: RangeBoundary::Ceiling,
                };
            }

            Transition::Continue(next)
        } else {
            Transition::Converged(next)
        }
    }
}
