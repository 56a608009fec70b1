//! Domain errors for the frequency profiler.
//!
//! Timing violations are *not* errors: they are [`TrialOutcome`] values that
//! drive the search. Everything here is a tooling failure that aborts it.
//!
//! [`TrialOutcome`]: crate::domain::models::TrialOutcome

use std::path::PathBuf;
use thiserror::Error;

use super::models::{Hz, SearchReport};

/// Failures of the external collaborators: build tooling, processes, files.
#[derive(Debug, Error)]
pub enum ToolingError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with {status}: {stderr}")]
    ProcessFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Frequency declaration `{prefix}` not found in {}", path.display())]
    DeclarationNotFound { prefix: String, path: PathBuf },

    #[error("Malformed frequency literal `{literal}` in declaration: {line}")]
    MalformedLiteral { literal: String, line: String },
}

impl ToolingError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Search parameters that violate the controller's preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Invalid frequency range: low ({low}) must not exceed high ({high})")]
    InvertedRange { low: Hz, high: Hz },

    #[error("Step must be positive")]
    ZeroStep,

    #[error("Measurements must be at least 1")]
    ZeroMeasurements,
}

/// Errors surfaced by the search controller.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Parameters were rejected before the platform was touched.
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// Reading the platform's frequency failed before anything was changed.
    #[error("Failed to read the configured platform frequency: {0}")]
    Setup(#[source] ToolingError),

    /// A trial's tooling failed; the original frequency was restored.
    #[error("Search aborted at {frequency} Hz: {source}")]
    Aborted {
        frequency: Hz,
        report: Box<SearchReport>,
        #[source]
        source: ToolingError,
    },

    /// Restoring the original frequency failed. The platform is left misconfigured.
    #[error("Failed to restore original frequency {original} Hz: {source}")]
    Restore {
        original: Hz,
        report: Box<SearchReport>,
        #[source]
        source: ToolingError,
    },

    #[error("Search did not terminate within {0} iterations")]
    IterationLimit(u32),
}

impl SearchError {
    /// Partial or final report attached to the error, if any.
    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            Self::Aborted { report, .. } | Self::Restore { report, .. } => Some(report),
            Self::InvalidParameters(_) | Self::Setup(_) | Self::IterationLimit(_) => None,
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
