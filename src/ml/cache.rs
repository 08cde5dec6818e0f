// src/ml/cache.rs
//
// Process-wide read-through model cache. Each path is loaded at most
// once per process; concurrent first loads for the same path collapse
// into a single read, and load failures are cached as absent so a bad
// blob is not re-parsed per track.

use log::warn;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::model::LogisticModel;

type Slot = Arc<OnceLock<Option<Arc<LogisticModel>>>>;

/// Path-keyed cache of parsed model blobs.
#[derive(Default)]
pub struct ModelCache {
    entries: Mutex<HashMap<String, Slot>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model at `path`, loading it on first use.
    ///
    /// Returns None when the blob is unreadable or invalid; that
    /// outcome is cached too.
    pub fn get(&self, path: &Path) -> Option<Arc<LogisticModel>> {
        let slot = {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            entries
                .entry(path.to_string_lossy().into_owned())
                .or_default()
                .clone()
        };

        slot.get_or_init(|| match LogisticModel::from_path(path) {
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                warn!("classifier disabled: {}", e);
                None
            }
        })
        .clone()
    }

    /// Number of cached entries, including cached failures.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide cache instance.
pub fn shared() -> &'static ModelCache {
    static CACHE: OnceLock<ModelCache> = OnceLock::new();
    CACHE.get_or_init(ModelCache::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_cached_as_absent() {
        let cache = ModelCache::new();
        let path = Path::new("/nonexistent/model_blob_123.json");
        assert!(cache.get(path).is_none());
        assert!(cache.get(path).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_paths_get_distinct_slots() {
        let cache = ModelCache::new();
        cache.get(Path::new("/nonexistent/a.json"));
        cache.get(Path::new("/nonexistent/b.json"));
        assert_eq!(cache.len(), 2);
    }
}
