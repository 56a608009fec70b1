//! Platform configuration port - access to the declared clock frequency.

use async_trait::async_trait;

use crate::domain::errors::ToolingError;
use crate::domain::models::Hz;

/// Reads and rewrites the platform's declared frequency.
///
/// Implementations must leave everything but the frequency literal untouched,
/// and `set_frequency` must be idempotent.
#[async_trait]
pub trait PlatformConfig: Send + Sync {
    /// Currently declared frequency.
    async fn frequency(&self) -> Result<Hz, ToolingError>;

    /// Declare `hz` as the platform frequency.
    async fn set_frequency(&self, hz: Hz) -> Result<(), ToolingError>;
}
