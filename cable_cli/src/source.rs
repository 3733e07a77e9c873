//! Active catalog source for the UI.
//!
//! The store itself only reports open success or failure; degrading to the
//! embedded table is this caller's job. `CatalogSource` is built once at
//! startup and handed to the app, so the rest of the UI never cares which
//! backend is live.

use std::path::Path;

use cable_core::catalog;
use cable_core::store::CableStore;
use cable_core::CableRecord;
use tracing::{info, warn};

/// Where cable records are being read from.
pub enum CatalogSource {
    /// The persistent SQLite store
    Store(CableStore),
    /// The embedded catalog (store unavailable, read-only session)
    Builtin,
}

impl CatalogSource {
    /// Open the persistent store at `path`, falling back to the embedded
    /// catalog when it cannot be opened. The fallback keeps the whole
    /// application usable in a read-only, non-persistent mode.
    pub fn open_or_fallback(path: &Path) -> Self {
        match CableStore::open(path) {
            Ok(store) => {
                info!(path = %path.display(), "using persistent cable store");
                CatalogSource::Store(store)
            }
            Err(err) => {
                warn!(%err, "cable store unavailable, using embedded catalog");
                CatalogSource::Builtin
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, CatalogSource::Store(_))
    }

    /// One-line description for the status bar.
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Store(store) => store
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "in-memory store".to_string()),
            CatalogSource::Builtin => "built-in fallback (store unavailable)".to_string(),
        }
    }

    /// Every record, ordered by conductor size ascending.
    pub fn records(&self) -> Vec<CableRecord> {
        match self {
            CatalogSource::Store(store) => store.all_records().unwrap_or_else(|err| {
                warn!(%err, "store read failed, serving embedded catalog");
                catalog::catalog().to_vec()
            }),
            CatalogSource::Builtin => catalog::catalog().to_vec(),
        }
    }

    /// Ascending list of selectable conductor sizes.
    pub fn sizes(&self) -> Vec<u32> {
        match self {
            CatalogSource::Store(store) => store.available_sizes().unwrap_or_else(|err| {
                warn!(%err, "store read failed, serving embedded catalog");
                catalog::available_sizes()
            }),
            CatalogSource::Builtin => catalog::available_sizes(),
        }
    }

    /// Exact-match lookup; `None` means "no such cable".
    pub fn record_by_size(&self, size_mm2: u32) -> Option<CableRecord> {
        match self {
            CatalogSource::Store(store) => store
                .record_by_size(size_mm2)
                .unwrap_or_else(|err| {
                    warn!(%err, "store lookup failed, trying embedded catalog");
                    catalog::find_by_size(size_mm2).copied()
                }),
            CatalogSource::Builtin => catalog::find_by_size(size_mm2).copied(),
        }
    }

    /// Release the store handle, if one is held.
    pub fn close(self) {
        if let CatalogSource::Store(store) = self {
            if let Err(err) = store.close() {
                warn!(%err, "closing cable store failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cable_core::catalog;

    #[test]
    fn test_fallback_on_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself is not a valid database file.
        let source = CatalogSource::open_or_fallback(dir.path());
        assert!(!source.is_persistent());
        assert_eq!(source.records().len(), catalog::catalog().len());
        assert_eq!(source.record_by_size(240).unwrap().size_mm2, 240);
    }

    #[test]
    fn test_store_backed_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cable_design.db");
        let source = CatalogSource::open_or_fallback(&path);
        assert!(source.is_persistent());
        assert_eq!(source.sizes(), catalog::available_sizes());
        assert!(source.record_by_size(9999).is_none());
        source.close();
    }
}
