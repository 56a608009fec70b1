//! Interrupt events, allowed-successor tables and per-trial outcomes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Opaque interrupt descriptor extracted from a trace line (e.g. `desc=m_timer`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterruptEvent(String);

impl InterruptEvent {
    /// Wrap a raw label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The raw label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterruptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterruptEvent {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Machine timer interrupt descriptor.
pub const MTIMER_INTERRUPT: &str = "desc=m_timer";
/// Supervisor timer interrupt descriptor.
pub const STIMER_INTERRUPT: &str = "desc=s_timer";
/// Supervisor environment-call descriptor.
pub const ECALL_INTERRUPT: &str = "desc=supervisor_ecall";

/// Allowed successors per interrupt event.
///
/// Events missing from the table have no allowed successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    allowed: BTreeMap<InterruptEvent, BTreeSet<InterruptEvent>>,
}

impl TransitionTable {
    /// Build a table from `(event, successors)` pairs. Repeated keys merge.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<T>)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut allowed: BTreeMap<InterruptEvent, BTreeSet<InterruptEvent>> = BTreeMap::new();
        for (event, successors) in pairs {
            allowed
                .entry(InterruptEvent::new(event))
                .or_default()
                .extend(successors.into_iter().map(InterruptEvent::new));
        }
        Self { allowed }
    }

    /// Whether `next` may directly follow `previous`.
    pub fn allows(&self, previous: &InterruptEvent, next: &InterruptEvent) -> bool {
        self.allowed
            .get(previous)
            .is_some_and(|successors| successors.contains(next))
    }

    /// Successors of `event`, empty when the event is unknown.
    pub fn successors(&self, event: &InterruptEvent) -> impl Iterator<Item = &InterruptEvent> {
        self.allowed.get(event).into_iter().flatten()
    }

    /// Number of events with an entry.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl Default for TransitionTable {
    /// RISC-V timer chain: m_timer may repeat or hand over to s_timer,
    /// s_timer must be followed by the supervisor ecall, which returns to m_timer.
    fn default() -> Self {
        Self::from_pairs([
            (MTIMER_INTERRUPT, vec![MTIMER_INTERRUPT, STIMER_INTERRUPT]),
            (STIMER_INTERRUPT, vec![ECALL_INTERRUPT]),
            (ECALL_INTERRUPT, vec![MTIMER_INTERRUPT]),
        ])
    }
}

/// Result of validating one trial's trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrialOutcome {
    /// Every consecutive pair was allowed
    Correct,
    /// First disallowed pair found in the trace
    Violation {
        previous: InterruptEvent,
        next: InterruptEvent,
    },
}

impl TrialOutcome {
    /// Whether this outcome counts as a timing error.
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation { .. })
    }
}
