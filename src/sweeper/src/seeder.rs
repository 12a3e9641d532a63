//! Sample deployment objects for trying a sweep against a local store.

use crate::error::SweepError;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;

/// Deployment prefixes created when none are given.
pub const DEFAULT_SAMPLE_PREFIXES: &[&str] = &[
    "deployhash112",
    "deploy234sfh",
    "deployTest321",
    "dep348dh",
    "d348hdfzui78",
];

/// Files created inside each sample deployment when none are given.
pub const DEFAULT_SAMPLE_SUFFIXES: &[&str] = &["/index.html", "/css/font.css", "/image/hey.png"];

const SAMPLE_BODY: &[u8] = b"Hello World";

/// Writes `prefix + suffix` objects for every prefix/suffix pair.
pub struct Seeder {
    object_store: Arc<dyn ObjectStore>,
}

impl Seeder {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self { object_store }
    }

    /// Create the sample objects in prefix order and return their keys.
    ///
    /// Prefixes are written one after another, so later prefixes end up with
    /// more recent modification times.
    pub async fn seed<P, S>(&self, prefixes: &[P], suffixes: &[S]) -> Result<Vec<String>, SweepError>
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let mut keys = Vec::with_capacity(prefixes.len() * suffixes.len());

        for prefix in prefixes {
            for suffix in suffixes {
                let key = format!("{}{}", prefix.as_ref(), suffix.as_ref());
                self.object_store
                    .put(&ObjectPath::from(key.as_str()), PutPayload::from_static(SAMPLE_BODY))
                    .await
                    .map_err(|source| SweepError::Seed {
                        key: key.clone(),
                        source,
                    })?;

                tracing::debug!(key = %key, "Created sample object");
                keys.push(key);
            }
        }

        tracing::info!(objects = keys.len(), "Created sample objects");

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lister::ObjectLister;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_seeds_cartesian_product() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let seeder = Seeder::new(store.clone());

        let keys = seeder.seed(&["a", "b"], &["/1", "/2", "/3"]).await.unwrap();

        assert_eq!(keys, vec!["a/1", "a/2", "a/3", "b/1", "b/2", "b/3"]);
        let listed = ObjectLister::new(store).list_objects().await.unwrap();
        assert_eq!(listed.len(), 6);
    }

    #[tokio::test]
    async fn test_seed_default_samples() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());

        let keys = Seeder::new(store)
            .seed(DEFAULT_SAMPLE_PREFIXES, DEFAULT_SAMPLE_SUFFIXES)
            .await
            .unwrap();

        assert_eq!(
            keys.len(),
            DEFAULT_SAMPLE_PREFIXES.len() * DEFAULT_SAMPLE_SUFFIXES.len()
        );
        assert!(keys.contains(&"deployhash112/css/font.css".to_string()));
    }

    #[tokio::test]
    async fn test_empty_suffixes_create_nothing() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let no_suffixes: [&str; 0] = [];

        let keys = Seeder::new(store).seed(&["a"], &no_suffixes).await.unwrap();

        assert!(keys.is_empty());
    }
}
