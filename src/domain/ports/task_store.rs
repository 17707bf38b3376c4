//! Task store port - access to the shared task checklist file.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::DomainResult;

/// Whole-file access to the task checklist.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Current contents, or `None` when the file does not exist.
    async fn read(&self, path: &Path) -> DomainResult<Option<String>>;

    /// Replace the whole file. Implementations must never leave a partially
    /// written file behind.
    async fn write(&self, path: &Path, contents: &str) -> DomainResult<()>;
}
