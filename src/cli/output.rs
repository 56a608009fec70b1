//! Output formatting utilities for the CLI.

use serde::Serialize;

/// A command result that renders as text or JSON.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Print a command result to stdout in the requested mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Thousands-separated frequency, e.g. `4,950 Hz`.
pub fn format_hz(hz: u64) -> String {
    let digits = hz.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{grouped} Hz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("desc=supervisor_ecall", 10), "desc=su...");
    }

    #[test]
    fn test_format_hz() {
        assert_eq!(format_hz(100), "100 Hz");
        assert_eq!(format_hz(4950), "4,950 Hz");
        assert_eq!(format_hz(10_000), "10,000 Hz");
        assert_eq!(format_hz(1_000_000), "1,000,000 Hz");
    }
}
