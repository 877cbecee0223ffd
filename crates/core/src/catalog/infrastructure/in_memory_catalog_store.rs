use std::sync::Mutex;

use crate::catalog::domain::catalog_store::CatalogStore;
use crate::catalog::domain::watch::Watch;

/// Catalog store that keeps records in memory.
///
/// Ids are assigned sequentially from 1. Useful for tests and ephemeral
/// runs where nothing should touch the filesystem.
pub struct InMemoryCatalogStore {
    records: Mutex<Vec<Watch>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything saved so far.
    pub fn records(&self) -> Vec<Watch> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn save(&self, mut watch: Watch) -> Result<Watch, Box<dyn std::error::Error>> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| format!("lock poisoned: {e}"))?;
        watch.id = Some(records.len() as u64 + 1);
        records.push(watch.clone());
        Ok(watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch(brand: &str) -> Watch {
        Watch {
            id: None,
            brand: brand.to_string(),
            model: "Unknown".to_string(),
            year: None,
            image_paths: Vec::new(),
        }
    }

    #[test]
    fn test_assigns_sequential_ids() {
        let store = InMemoryCatalogStore::new();
        let first = store.save(watch("Rolex")).unwrap();
        let second = store.save(watch("Seiko")).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[test]
    fn test_records_returns_saved_watches() {
        let store = InMemoryCatalogStore::new();
        store.save(watch("Omega")).unwrap();
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].brand, "Omega");
        assert_eq!(records[0].id, Some(1));
    }
}
