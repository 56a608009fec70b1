//! Interrupt Sequence Validator
//!
//! First-order check over an interrupt event stream: only the most recent
//! event decides whether the next one is allowed.

use crate::domain::models::{InterruptEvent, TransitionTable, TrialOutcome};

/// Validates consecutive interrupt pairs against a [`TransitionTable`].
#[derive(Debug, Clone, Default)]
pub struct SequenceValidator {
    table: TransitionTable,
}

impl SequenceValidator {
    /// Create a validator over `table`.
    pub const fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    /// Scan `trace` and stop at the first disallowed pair.
    pub fn validate(&self, trace: &[InterruptEvent]) -> TrialOutcome {
        let mut previous: Option<&InterruptEvent> = None;

        for event in trace {
            if let Some(prev) = previous {
                if !self.table.allows(prev, event) {
                    return TrialOutcome::Violation {
                        previous: prev.clone(),
                        next: event.clone(),
                    };
                }
            }
            previous = Some(event);
        }

        TrialOutcome::Correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_validator() -> SequenceValidator {
        SequenceValidator::new(TransitionTable::from_pairs([
            ("A", vec!["A", "B"]),
            ("B", vec!["C"]),
            ("C", vec!["A"]),
        ]))
    }

    fn trace(labels: &[&str]) -> Vec<InterruptEvent> {
        labels.iter().copied().map(InterruptEvent::from).collect()
    }

    #[test]
    fn test_empty_and_single_event_traces_are_correct() {
        let validator = abc_validator();
        assert_eq!(validator.validate(&[]), TrialOutcome::Correct);
        assert_eq!(validator.validate(&trace(&["B"])), TrialOutcome::Correct);
        assert_eq!(validator.validate(&trace(&["Z"])), TrialOutcome::Correct);
    }

    #[test]
    fn test_allowed_chain_is_correct() {
        let validator = abc_validator();
        assert_eq!(
            validator.validate(&trace(&["A", "B", "C", "A"])),
            TrialOutcome::Correct
        );
        assert_eq!(
            validator.validate(&trace(&["A", "A", "A", "B", "C"])),
            TrialOutcome::Correct
        );
    }

    #[test]
    fn test_disallowed_pair_is_violation() {
        let validator = abc_validator();
        assert_eq!(
            validator.validate(&trace(&["A", "C"])),
            TrialOutcome::Violation {
                previous: "A".into(),
                next: "C".into(),
            }
        );
        assert_eq!(
            validator.validate(&trace(&["B", "A"])),
            TrialOutcome::Violation {
                previous: "B".into(),
                next: "A".into(),
            }
        );
    }

    #[test]
    fn test_reports_first_violation_only() {
        let validator = abc_validator();
        let outcome = validator.validate(&trace(&["A", "B", "B", "A", "C"]));
        assert_eq!(
            outcome,
            TrialOutcome::Violation {
                previous: "B".into(),
                next: "B".into(),
            }
        );
    }

    #[test]
    fn test_unknown_event_has_no_successor() {
        let validator = abc_validator();
        assert!(validator.validate(&trace(&["A", "B", "X"])).is_violation());
        assert!(validator.validate(&trace(&["X", "A"])).is_violation());
    }

    #[test]
    fn test_default_table_timer_chain() {
        let validator = SequenceValidator::default();
        let ok = trace(&[
            "desc=m_timer",
            "desc=m_timer",
            "desc=s_timer",
            "desc=supervisor_ecall",
            "desc=m_timer",
        ]);
        assert_eq!(validator.validate(&ok), TrialOutcome::Correct);

        let late = trace(&["desc=m_timer", "desc=s_timer", "desc=m_timer"]);
        assert!(validator.validate(&late).is_violation());
    }
}
