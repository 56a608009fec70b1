//! Build/run port - compiles and executes a workload.

use async_trait::async_trait;

use crate::domain::errors::ToolingError;

/// Builds and executes workloads on real or emulated hardware.
///
/// Calls are blocking from the caller's point of view: the controller awaits
/// each one to completion before issuing the next.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Remove build artifacts. Must succeed when there is nothing to clean.
    async fn clean(&self) -> Result<(), ToolingError>;

    /// Build and run `application`, returning its trace text.
    async fn run(&self, application: &str) -> Result<String, ToolingError>;
}
