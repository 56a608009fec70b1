//! Hardware traits header adapter.
//!
//! The platform frequency lives in a C++ traits header as a single
//! declaration line, e.g.
//!
//! ```text
//!     static const long FREQUENCY = 1000; // Hz
//! ```
//!
//! The rewrite is split into pure text transforms ([`read_frequency`],
//! [`apply_frequency`]) and a thin [`TraitsFile`] that persists them.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::errors::ToolingError;
use crate::domain::models::Hz;
use crate::domain::ports::PlatformConfig;

/// Byte span of the numeric literal within the declaration line.
struct Declaration<'a> {
    line: &'a str,
    literal_start: usize,
    literal_end: usize,
}

impl Declaration<'_> {
    fn literal(&self) -> &str {
        &self.line[self.literal_start..self.literal_end]
    }
}

/// Why a declaration could not be located or parsed. Converted to
/// [`ToolingError`] once the file path is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// No line starts with the prefix
    NotFound,
    /// The line has no `= <literal>;` shape, or the literal is not an integer
    Malformed { literal: String, line: String },
}

impl DeclarationError {
    fn into_tooling(self, prefix: &str, path: &Path) -> ToolingError {
        match self {
            Self::NotFound => ToolingError::DeclarationNotFound {
                prefix: prefix.to_string(),
                path: path.to_path_buf(),
            },
            Self::Malformed { literal, line } => ToolingError::MalformedLiteral { literal, line },
        }
    }
}

fn malformed(literal: &str, line: &str) -> DeclarationError {
    DeclarationError::Malformed {
        literal: literal.trim().to_string(),
        line: line.trim_end().to_string(),
    }
}

fn locate<'a>(line: &'a str, prefix: &str) -> Result<Declaration<'a>, DeclarationError> {
    let after_prefix = prefix.len();
    let rest = &line[after_prefix..];

    let eq = rest.find('=').ok_or_else(|| malformed("", line))?;
    let value_start = after_prefix + eq + 1;
    let semi = line[value_start..]
        .find(';')
        .ok_or_else(|| malformed(&line[value_start..], line))?;
    let value_end = value_start + semi;

    let raw = &line[value_start..value_end];
    let literal_start = value_start + (raw.len() - raw.trim_start().len());
    let literal_end = value_end - (raw.len() - raw.trim_end().len());

    Ok(Declaration {
        line,
        literal_start,
        literal_end,
    })
}

fn parse_literal(declaration: &Declaration<'_>) -> Result<Hz, DeclarationError> {
    let literal = declaration.literal();
    let digits = literal.trim_end_matches(['l', 'L', 'u', 'U']);
    digits
        .parse::<Hz>()
        .map_err(|_| malformed(literal, declaration.line))
}

/// Read the declared frequency from traits header text.
pub fn read_frequency(text: &str, prefix: &str) -> Result<Hz, DeclarationError> {
    let line = text
        .lines()
        .find(|line| line.starts_with(prefix))
        .ok_or(DeclarationError::NotFound)?;
    parse_literal(&locate(line, prefix)?)
}

/// Rewrite the declaration to `hz`, leaving every other byte untouched.
///
/// Only the first matching line is rewritten. The text before the literal,
/// the trailing `; // Hz` comment and the line ending are all preserved.
pub fn apply_frequency(text: &str, prefix: &str, hz: Hz) -> Result<String, DeclarationError> {
    let mut output = String::with_capacity(text.len() + 8);
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        if !replaced && line.starts_with(prefix) {
            let declaration = locate(line, prefix)?;
            parse_literal(&declaration)?;
            output.push_str(&line[..declaration.literal_start]);
            output.push_str(&hz.to_string());
            output.push_str(&line[declaration.literal_end..]);
            replaced = true;
        } else {
            output.push_str(line);
        }
    }

    if replaced {
        Ok(output)
    } else {
        Err(DeclarationError::NotFound)
    }
}

/// [`PlatformConfig`] backed by a traits header on disk.
#[derive(Debug, Clone)]
pub struct TraitsFile {
    path: PathBuf,
    prefix: String,
}

impl TraitsFile {
    /// Adapter for the declaration starting with `prefix` in `path`.
    pub fn new(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the traits header.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String, ToolingError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|e| ToolingError::io(&self.path, e))
    }
}

#[async_trait]
impl PlatformConfig for TraitsFile {
    async fn frequency(&self) -> Result<Hz, ToolingError> {
        let text = self.read().await?;
        read_frequency(&text, &self.prefix).map_err(|e| e.into_tooling(&self.prefix, &self.path))
    }

    async fn set_frequency(&self, hz: Hz) -> Result<(), ToolingError> {
        let text = self.read().await?;
        let updated = apply_frequency(&text, &self.prefix, hz)
            .map_err(|e| e.into_tooling(&self.prefix, &self.path))?;

        if updated != text {
            fs::write(&self.path, updated)
                .await
                .map_err(|e| ToolingError::io(&self.path, e))?;
        }
        debug!(path = %self.path.display(), frequency = hz, "Frequency declared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "    static const long FREQUENCY";

    const TRAITS: &str = "\
template<> struct Traits<Timer>: public Traits<Machine_Common>
{
    static const bool debugged = hysterically_debugged;

    static const long FREQUENCY = 1000; // Hz
    static const long CLOCK = 10000000;
};
";

    #[test]
    fn test_read_frequency() {
        assert_eq!(read_frequency(TRAITS, PREFIX), Ok(1000));
    }

    #[test]
    fn test_apply_rewrites_only_the_literal() {
        let updated = apply_frequency(TRAITS, PREFIX, 4950).unwrap();
        assert_eq!(updated, TRAITS.replace("= 1000;", "= 4950;"));
        assert_eq!(read_frequency(&updated, PREFIX), Ok(4950));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let once = apply_frequency(TRAITS, PREFIX, 777).unwrap();
        let twice = apply_frequency(&once, PREFIX, 777).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_preserves_crlf_and_missing_trailing_newline() {
        let text = "a\r\n    static const long FREQUENCY = 10; // Hz\r\nb";
        let updated = apply_frequency(text, PREFIX, 20).unwrap();
        assert_eq!(updated, "a\r\n    static const long FREQUENCY = 20; // Hz\r\nb");
    }

    #[test]
    fn test_long_suffix_literal() {
        let text = "    static const long FREQUENCY = 2500L; // Hz\n";
        assert_eq!(read_frequency(text, PREFIX), Ok(2500));
        assert_eq!(
            apply_frequency(text, PREFIX, 300).unwrap(),
            "    static const long FREQUENCY = 300; // Hz\n"
        );
    }

    #[test]
    fn test_missing_declaration() {
        let text = "    static const int FREQUENCY = 1000; // Hz\n";
        assert_eq!(read_frequency(text, PREFIX), Err(DeclarationError::NotFound));
        assert_eq!(
            apply_frequency(text, PREFIX, 10),
            Err(DeclarationError::NotFound)
        );
    }

    #[test]
    fn test_malformed_literal() {
        let text = "    static const long FREQUENCY = CLOCK / 1000; // Hz\n";
        assert!(matches!(
            read_frequency(text, PREFIX),
            Err(DeclarationError::Malformed { literal, .. }) if literal == "CLOCK / 1000"
        ));
        assert!(apply_frequency(text, PREFIX, 10).is_err());

        let no_semicolon = "    static const long FREQUENCY = 1000\n";
        assert!(read_frequency(no_semicolon, PREFIX).is_err());
    }

    #[tokio::test]
    async fn test_traits_file_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sifive_u_traits.h");
        std::fs::write(&path, TRAITS).unwrap();

        let adapter = TraitsFile::new(&path, PREFIX);
        assert_eq!(adapter.frequency().await.unwrap(), 1000);

        adapter.set_frequency(5000).await.unwrap();
        assert_eq!(adapter.frequency().await.unwrap(), 5000);

        adapter.set_frequency(1000).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TRAITS);
    }

    #[tokio::test]
    async fn test_traits_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = TraitsFile::new(dir.path().join("absent.h"), PREFIX);
        assert!(matches!(
            adapter.frequency().await,
            Err(ToolingError::Io { .. })
        ));
    }
}
