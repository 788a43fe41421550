pub mod disk;
pub mod memory;
pub mod s3;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::storage::ObjectStore;
use anyhow::Result;
use disk::DiskObjectStore;
use s3::S3ObjectStore;
use tracing::debug;

/// Builds the object store selected by the configuration, scoped to its bucket.
pub async fn build_object_store(config: &AppConfig) -> Result<Box<dyn ObjectStore>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            debug!("Using S3 storage for bucket {}", config.storage_bucket);
            Ok(Box::new(S3ObjectStore::from_env(&config.storage_bucket).await))
        }
        StorageBackend::Disk => {
            let root = config.default_data_path()?;
            debug!("Using disk storage under {}", root.display());
            Ok(Box::new(DiskObjectStore::new(root, &config.storage_bucket)))
        }
    }
}
