//! Extraction of interrupt events from execution traces.

use crate::domain::models::InterruptEvent;

/// Pulls interrupt dispatch events out of line-oriented trace text.
///
/// A line is a dispatch when it starts with the configured prefix; its event
/// label is the last whitespace-separated token.
#[derive(Debug, Clone)]
pub struct TraceParser {
    dispatch_prefix: String,
}

impl TraceParser {
    /// Parser matching lines that start with `dispatch_prefix`.
    pub fn new(dispatch_prefix: impl Into<String>) -> Self {
        Self {
            dispatch_prefix: dispatch_prefix.into(),
        }
    }

    /// Ordered interrupt events found in `trace`.
    pub fn extract_events(&self, trace: &str) -> Vec<InterruptEvent> {
        trace
            .lines()
            .filter(|line| line.starts_with(&self.dispatch_prefix))
            .filter_map(|line| line.split_whitespace().last())
            .map(InterruptEvent::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QEMU_TRACE: &str = "\
OpenSBI v1.2
riscv_cpu_do_interrupt: hart:0, async:1, cause:0000000000000007, epc:0x0000000080001c2e, tval:0x0000000000000000, desc=m_timer
some unrelated output line desc=s_timer
riscv_cpu_do_interrupt: hart:0, async:1, cause:0000000000000005, epc:0x0000000080001c30, tval:0x0000000000000000, desc=s_timer
riscv_cpu_do_interrupt: hart:0, async:0, cause:0000000000000009, epc:0x0000000080001c40, tval:0x0000000000000000, desc=supervisor_ecall
  riscv_cpu_do_interrupt: indented lines are not dispatch records desc=m_timer
";

    #[test]
    fn test_extracts_last_token_of_dispatch_lines() {
        let parser = TraceParser::new("riscv_cpu_do_interrupt");
        let events = parser.extract_events(QEMU_TRACE);
        let labels: Vec<&str> = events.iter().map(InterruptEvent::as_str).collect();
        assert_eq!(
            labels,
            vec!["desc=m_timer", "desc=s_timer", "desc=supervisor_ecall"]
        );
    }

    #[test]
    fn test_empty_trace_has_no_events() {
        let parser = TraceParser::new("riscv_cpu_do_interrupt");
        assert!(parser.extract_events("").is_empty());
        assert!(parser.extract_events("hello\nworld\n").is_empty());
    }

    #[test]
    fn test_handles_crlf_line_endings() {
        let parser = TraceParser::new("irq");
        let events = parser.extract_events("irq a\r\nirq b\r\n");
        assert_eq!(events, vec![InterruptEvent::from("a"), InterruptEvent::from("b")]);
    }
}
