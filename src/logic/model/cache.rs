//! Load-once cache for the model-and-dataset analysis
//!
//! Repeated interactive actions (moving the risk cutoff, changing the
//! revenue assumption) must not re-run inference and attribution. The cache
//! holds one analysis keyed on the content fingerprints of the model and
//! dataset files: content change anywhere invalidates, a mere `touch` does
//! not. Invalidation is also available explicitly.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// SHA-256 content fingerprint of a file, hex-encoded
pub fn file_fingerprint(path: impl AsRef<Path>) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Identity of one (model, dataset) pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub model: String,
    pub dataset: String,
}

impl CacheKey {
    /// Fingerprint both artifact files
    pub fn for_paths(
        model_path: impl AsRef<Path>,
        dataset_path: impl AsRef<Path>,
    ) -> std::io::Result<Self> {
        Ok(Self {
            model: file_fingerprint(model_path)?,
            dataset: file_fingerprint(dataset_path)?,
        })
    }
}

/// Single-slot memoizing cache
pub struct LoadCache<T> {
    slot: Mutex<Option<(CacheKey, Arc<T>)>>,
}

impl<T> LoadCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Cached value for `key`, if the slot holds one
    pub fn lookup(&self, key: &CacheKey) -> Option<Arc<T>> {
        let slot = self.slot.lock();
        match slot.as_ref() {
            Some((cached_key, value)) if cached_key == key => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Return the cached value for `key`, building and storing it on miss
    pub fn get_or_insert_with<E>(
        &self,
        key: CacheKey,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(hit) = self.lookup(&key) {
            log::debug!("Analysis cache hit");
            return Ok(hit);
        }
        log::debug!("Analysis cache miss, rebuilding");
        let value = Arc::new(build()?);
        *self.slot.lock() = Some((key, Arc::clone(&value)));
        Ok(value)
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

impl<T> Default for LoadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn key(model: &str, dataset: &str) -> CacheKey {
        CacheKey {
            model: model.to_string(),
            dataset: dataset.to_string(),
        }
    }

    #[test]
    fn test_hit_returns_same_arc() {
        let cache: LoadCache<u32> = LoadCache::new();
        let first = cache
            .get_or_insert_with::<()>(key("m", "d"), || Ok(7))
            .unwrap();
        let second = cache
            .get_or_insert_with::<()>(key("m", "d"), || panic!("must not rebuild"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_key_change_rebuilds() {
        let cache: LoadCache<u32> = LoadCache::new();
        let first = cache
            .get_or_insert_with::<()>(key("m", "d"), || Ok(1))
            .unwrap();
        let second = cache
            .get_or_insert_with::<()>(key("m", "d2"), || Ok(2))
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*second, 2);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let cache: LoadCache<u32> = LoadCache::new();
        let first = cache
            .get_or_insert_with::<()>(key("m", "d"), || Ok(1))
            .unwrap();
        cache.invalidate();
        let second = cache
            .get_or_insert_with::<()>(key("m", "d"), || Ok(2))
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_build_error_leaves_slot_empty() {
        let cache: LoadCache<u32> = LoadCache::new();
        let err = cache.get_or_insert_with(key("m", "d"), || Err("boom"));
        assert_eq!(err.unwrap_err(), "boom");

        let rebuilt = cache
            .get_or_insert_with::<()>(key("m", "d"), || Ok(3))
            .unwrap();
        assert_eq!(*rebuilt, 3);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("artifact.json");

        fs::write(&path, b"v1").unwrap();
        let first = file_fingerprint(&path).unwrap();

        fs::write(&path, b"v1").unwrap();
        assert_eq!(first, file_fingerprint(&path).unwrap());

        fs::write(&path, b"v2").unwrap();
        assert_ne!(first, file_fingerprint(&path).unwrap());
    }
}
