//! Filesystem task store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::TaskStore;

/// Reads and replaces task files on disk.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash never leaves a half-written checklist.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTaskStore;

impl FileTaskStore {
    /// Create a store.
    pub const fn new() -> Self {
        Self
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tasks".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn read(&self, path: &Path) -> DomainResult<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DomainError::TaskFileRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn write(&self, path: &Path, contents: &str) -> DomainResult<()> {
        let wrap = |source| DomainError::TaskFileWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(wrap)?;
        }

        let tmp = temp_path(path);
        if let Err(err) = fs::write(&tmp, contents).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(wrap(err));
        }
        if let Err(err) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(wrap(err));
        }

        debug!(path = %path.display(), bytes = contents.len(), "task file replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTaskStore::new();
        assert_eq!(store.read(&dir.path().join("TASKS.md")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TASKS.md");
        std::fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

        let err = FileTaskStore::new().read(&path).await.unwrap_err();
        assert!(matches!(err, DomainError::TaskFileRead { .. }));
        assert!(err.to_string().starts_with("Failed to read task file"));
    }

    #[tokio::test]
    async fn test_write_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TASKS.md");
        std::fs::write(&path, "- [ ] old item\n- [ ] another old item\n").unwrap();

        let store = FileTaskStore::new();
        store.write(&path, "- [ ] A\n- [ ] B").await.unwrap();

        assert_eq!(store.read(&path).await.unwrap().as_deref(), Some("- [ ] A\n- [ ] B"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs/plan/TASKS.md");
        FileTaskStore::new().write(&path, "- [ ] A").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "- [ ] A");
    }
}
