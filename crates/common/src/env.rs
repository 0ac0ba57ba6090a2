//! Environment/runtime helpers
//!
//! Sanity checks run before the database is opened.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Filesystem path of a file-backed SQLite URL, if any.
///
/// `sqlite::memory:` and non-SQLite URLs yield `None`.
pub fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Ensure the directory holding a SQLite database file exists.
pub async fn ensure_data_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(database_url) else {
        return Ok(());
    };
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "sqlite data directory missing; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    debug!(file = %file.display(), "sqlite data directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_paths() {
        assert_eq!(sqlite_file_path("sqlite://data/catalog.db?mode=rwc"), Some(PathBuf::from("data/catalog.db")));
        assert_eq!(sqlite_file_path("sqlite:catalog.db"), Some(PathBuf::from("catalog.db")));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/catalog"), None);
    }

    #[tokio::test]
    async fn creates_missing_parent_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("catalog_env_{}", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}/nested/catalog.db?mode=rwc", root.display());
        ensure_data_dir(&url).await?;
        assert!(root.join("nested").is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
