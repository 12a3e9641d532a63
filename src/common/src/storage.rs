use anyhow::{Context, Result};
use object_store::{ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory};
use std::sync::Arc;
use url::Url;

use crate::config::{StorageBackend, StorageConfig};

/// Create an object store from storage configuration
pub fn create_object_store(storage_config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match storage_config.backend {
        StorageBackend::S3 => {
            let builder = create_s3_builder(storage_config)?;
            let store = builder.build().with_context(|| {
                format!(
                    "Failed to build S3 store for bucket '{}'",
                    storage_config.bucket
                )
            })?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
        StorageBackend::File => {
            let path = &storage_config.path;
            if path.is_empty() {
                anyhow::bail!("File storage must specify a path");
            }
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create storage directory '{path}'"))?;
            Ok(Arc::new(LocalFileSystem::new_with_prefix(path)?))
        }
    }
}

/// Create an S3 builder for the configured bucket.
///
/// Credentials are read from the standard `AWS_*` environment variables.
/// Requests use path-style addressing so LocalStack and MinIO work without
/// DNS tricks.
pub fn create_s3_builder(storage_config: &StorageConfig) -> Result<AmazonS3Builder> {
    if storage_config.bucket.is_empty() {
        anyhow::bail!("S3 storage must specify a bucket");
    }

    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(&storage_config.bucket)
        .with_region(&storage_config.region)
        .with_virtual_hosted_style_request(false);

    if !storage_config.endpoint.is_empty() {
        let endpoint = Url::parse(&storage_config.endpoint).map_err(|e| {
            anyhow::anyhow!("Invalid S3 endpoint '{}': {}", storage_config.endpoint, e)
        })?;

        builder = builder
            .with_endpoint(endpoint.as_str().trim_end_matches('/'))
            .with_allow_http(endpoint.scheme() == "http");
    }

    Ok(builder)
}
