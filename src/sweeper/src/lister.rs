//! Exhaustive object listing.

use crate::error::SweepError;
use futures::StreamExt;
use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use retention::ObjectRecord;
use std::sync::Arc;

/// Lists every object in a store, optionally under a key prefix.
pub struct ObjectLister {
    object_store: Arc<dyn ObjectStore>,
    prefix: Option<ObjectPath>,
}

impl ObjectLister {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            object_store,
            prefix: None,
        }
    }

    /// Restrict listing to keys under `prefix`.
    ///
    /// Returned keys are relative to the prefix so that the first segment is
    /// the deployment identifier.
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.map(ObjectPath::from);
        self
    }

    /// Snapshot the store contents.
    ///
    /// Paging is handled by the store client; the returned listing is
    /// complete or the call fails.
    pub async fn list_objects(&self) -> Result<Vec<ObjectRecord>, SweepError> {
        let prefix_display = self
            .prefix
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default();

        tracing::debug!(prefix = %prefix_display, "Listing objects");

        let mut objects = vec![];
        let mut list_stream = self.object_store.list(self.prefix.as_ref());

        while let Some(meta_result) = list_stream.next().await {
            let meta = meta_result.map_err(|source| SweepError::List {
                prefix: prefix_display.clone(),
                source,
            })?;

            tracing::trace!(
                key = %meta.location,
                last_modified = %meta.last_modified,
                size_bytes = meta.size,
                "Listed object"
            );

            let key = relative_key(meta.location.as_ref(), self.prefix.as_ref());
            objects.push(ObjectRecord::new(key, meta.last_modified).with_size(meta.size));
        }

        tracing::debug!(
            prefix = %prefix_display,
            objects = objects.len(),
            "Listed objects"
        );

        Ok(objects)
    }
}

/// Strip `prefix/` from a listed location.
pub(crate) fn relative_key(location: &str, prefix: Option<&ObjectPath>) -> String {
    prefix
        .and_then(|prefix| {
            let prefix: &str = prefix.as_ref();
            location.strip_prefix(prefix)
        })
        .and_then(|rest| rest.strip_prefix(object_store::path::DELIMITER))
        .unwrap_or(location)
        .to_string()
}

/// Rebuild the full location of a key produced by [`ObjectLister`].
pub(crate) fn full_path(key: &str, prefix: Option<&ObjectPath>) -> ObjectPath {
    let full = match prefix {
        Some(prefix) => format!("{prefix}{}{key}", object_store::path::DELIMITER),
        None => key.to_string(),
    };
    ObjectPath::parse(&full).unwrap_or_else(|_| ObjectPath::from(full.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::PutPayload;
    use object_store::memory::InMemory;

    async fn store_with(keys: &[&str]) -> Arc<dyn ObjectStore> {
        let store = Arc::new(InMemory::new());
        for key in keys {
            store
                .put(&ObjectPath::from(*key), PutPayload::from_static(b"Hello World"))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_empty_store() {
        let lister = ObjectLister::new(store_with(&[]).await);
        assert!(lister.list_objects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_all_objects_with_metadata() {
        let store = store_with(&["d1/index.html", "d1/css/font.css", "d2/index.html"]).await;

        let mut objects = ObjectLister::new(store).list_objects().await.unwrap();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["d1/css/font.css", "d1/index.html", "d2/index.html"]);
        assert!(objects.iter().all(|o| o.size_bytes == 11));
    }

    #[tokio::test]
    async fn test_prefix_restricts_listing() {
        let store = store_with(&["sites/d1/index.html", "sites/d2/index.html", "other/x"]).await;

        let objects = ObjectLister::new(store)
            .with_prefix(Some("sites"))
            .list_objects()
            .await
            .unwrap();

        let mut keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["d1/index.html", "d2/index.html"]);
    }

    #[test]
    fn test_relative_and_full_paths_round_trip() {
        let prefix = ObjectPath::from("sites");

        assert_eq!(relative_key("sites/d1/a.js", Some(&prefix)), "d1/a.js");
        assert_eq!(relative_key("d1/a.js", None), "d1/a.js");
        assert_eq!(full_path("d1/a.js", Some(&prefix)).to_string(), "sites/d1/a.js");
        assert_eq!(full_path("d1/a.js", None).to_string(), "d1/a.js");
    }
}
