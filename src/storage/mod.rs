//! Media storage for uploaded files (avatars, cover images, video files)
//!
//! A thin URL-returning store backed by the local filesystem. Handlers only
//! depend on `store(..) -> url` and a best-effort `delete(url)`, so the
//! backend can be swapped for an object store without touching them.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Local-disk media store
///
/// Files are written under `root_dir` with generated names and exposed
/// at `base_url/<name>`.
#[derive(Clone)]
pub struct MediaStore {
    root_dir: Arc<PathBuf>,
    base_url: Arc<String>,
}

impl MediaStore {
    pub fn new(root_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root_dir: Arc::new(root_dir.into()),
            base_url: Arc::new(base_url.into().trim_end_matches('/').to_string()),
        }
    }

    /// Store a file and return its public URL
    ///
    /// The original filename is only consulted for its extension; the stored
    /// name is a fresh UUID so uploads can never collide or traverse paths.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let name = match extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::create_dir_all(self.root_dir.as_ref())
            .await
            .context("Failed to create media directory")?;

        let path = self.root_dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write media file {}", path.display()))?;

        Ok(format!("{}/{}", self.base_url, name))
    }

    /// Delete a previously stored file by its public URL
    ///
    /// Best-effort: a missing file is not an error, and IO failures are
    /// logged rather than surfaced so a stale media file never blocks a
    /// profile update.
    pub async fn delete(&self, url: &str) {
        let Some(name) = url.rsplit('/').next() else {
            return;
        };
        // Only accept names this store could have generated
        if name.contains("..") || name.contains('/') || name.is_empty() {
            warn!(url, "Refusing to delete suspicious media URL");
            return;
        }

        let path = self.root_dir.join(name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to delete media file");
            }
        }
    }

    /// Verify the store can accept uploads
    ///
    /// Creates the root directory if it is missing; fails if the path is
    /// unusable (e.g. occupied by a file or not writable).
    pub async fn health_check(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.root_dir.as_ref())
            .await
            .with_context(|| {
                format!("Media directory unavailable: {}", self.root_dir.display())
            })?;
        Ok(())
    }

    /// Directory files are stored under
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_ref()
    }
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(dir: &Path) -> MediaStore {
        MediaStore::new(dir, "http://localhost:8080/media/")
    }

    #[tokio::test]
    async fn test_store_returns_url_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let url = store.store("avatar.png", b"fake-image-bytes").await.unwrap();

        assert!(url.starts_with("http://localhost:8080/media/"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_stored_file_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let url = store.store("clip.mp4", b"payload").await.unwrap();
        let name = url.rsplit('/').next().unwrap();
        let bytes = tokio::fs::read(dir.path().join(name)).await.unwrap();

        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let url = store.store("cover.jpg", b"bytes").await.unwrap();
        let name = url.rsplit('/').next().unwrap().to_string();
        store.delete(&url).await;

        assert!(!dir.path().join(name).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        store.delete("http://localhost:8080/media/gone.png").await;
    }

    #[tokio::test]
    async fn test_health_check_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir.path().join("media"));

        store.health_check().await.unwrap();

        assert!(dir.path().join("media").is_dir());
    }

    #[tokio::test]
    async fn test_health_check_fails_on_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("occupied");
        tokio::fs::write(&file_path, b"not a directory").await.unwrap();

        let store = test_store(&file_path);

        assert!(store.health_check().await.is_err());
    }

    #[test]
    fn test_extension_filtering() {
        assert_eq!(extension("a.png"), Some("png"));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("weird.p/ng"), None);
    }
}
