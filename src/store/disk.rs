use crate::core::storage::ObjectStore;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Stores objects as files under `{root}/{bucket}/`. Useful for local runs
/// where no cloud bucket is available.
pub struct DiskObjectStore {
    bucket_dir: PathBuf,
}

impl DiskObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: &str) -> Self {
        Self {
            bucket_dir: root.into().join(bucket),
        }
    }

    /// Keys must name a single file directly inside the bucket directory.
    fn object_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            bail!("Invalid object key for disk storage: {key:?}");
        }
        Ok(self.bucket_dir.join(key))
    }
}

#[async_trait]
impl ObjectStore for DiskObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.object_path(key)?;
        tokio::fs::create_dir_all(&self.bucket_dir)
            .await
            .with_context(|| {
                format!("Failed to create directory: {}", self.bucket_dir.display())
            })?;

        let len = body.len();
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write object to {}", path.display()))?;
        debug!("Wrote {} bytes to {}", len, path.display());
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        self.bucket_dir.join(key).display().to_string()
    }
}
