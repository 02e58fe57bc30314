//! Load-once access to the [`Store`].
//!
//! The first successful [`StoreLoader::get_or_load`] reads the artifacts;
//! every later call hands out the same `Arc`. Callers racing on the first
//! load wait on the init lock, so the files are read exactly once. A failed
//! load is not remembered and the next call tries again.

use crate::error::Result;
use crate::types::Store;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::debug;

#[derive(Debug)]
pub struct StoreLoader {
    catalog_path: PathBuf,
    similarity_path: PathBuf,
    store: OnceLock<Arc<Store>>,
    init_lock: Mutex<()>,
}

impl StoreLoader {
    pub fn new(catalog_path: impl Into<PathBuf>, similarity_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            similarity_path: similarity_path.into(),
            store: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn similarity_path(&self) -> &Path {
        &self.similarity_path
    }

    /// Whether a store has already been loaded
    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    /// Return the cached store, loading it on first use
    pub fn get_or_load(&self) -> Result<Arc<Store>> {
        if let Some(store) = self.store.get() {
            return Ok(Arc::clone(store));
        }

        // The guarded data is (), so a poisoned lock carries no broken state
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(store) = self.store.get() {
            debug!("Store was loaded while waiting on the init lock");
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(Store::load_from_files(
            &self.catalog_path,
            &self.similarity_path,
        )?);
        let _ = self.store.set(Arc::clone(&store));
        Ok(store)
    }
}
