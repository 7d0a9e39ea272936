//! JSON-file backed record store.
//!
//! The whole catalog lives in one file under the data root. Every mutation
//! rewrites it through a temp file + rename so a crash mid-write never
//! leaves a truncated catalog behind.

use crate::error::{Error, Result};
use crate::store::{ProductDraft, ProductRecord, ProductStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    next_id: i64,
    records: Vec<ProductRecord>,
}

/// File-backed [`ProductStore`].
pub struct JsonStore {
    path: PathBuf,
    next_id: i64,
    records: Vec<ProductRecord>,
}

impl JsonStore {
    /// Opens (or initializes) the catalog at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let (next_id, records) = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: CatalogFile = serde_json::from_str(&content)
                .map_err(|e| Error::Store(format!("corrupt catalog {}: {e}", path.display())))?;
            (file.next_id.max(1), file.records)
        } else {
            debug!("No catalog at {}, starting empty", path.display());
            (1, Vec::new())
        };

        Ok(Self { path, next_id, records })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = CatalogFile { next_id: self.next_id, records: self.records.clone() };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::Store(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProductStore for JsonStore {
    fn create(&mut self, draft: ProductDraft) -> Result<i64> {
        let id = self.next_id;
        self.next_id += 1;

        self.records.push(ProductRecord {
            id,
            name: draft.name,
            brand: draft.brand,
            category: draft.category,
            price: draft.price,
            description: draft.description,
            image_file_name: draft.image_file_name,
            source_link: draft.source_link,
            price_trend: draft.price_trend,
            created_at: Utc::now(),
        });

        self.persist()?;
        debug!("Created record {}", id);
        Ok(id)
    }

    fn find(&self, id: i64) -> Result<Option<ProductRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn update(&mut self, record: ProductRecord) -> Result<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(Error::NotFound(record.id))?;

        let created_at = slot.created_at;
        *slot = record;
        slot.created_at = created_at;

        self.persist()
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(Error::NotFound(id));
        }
        self.persist()
    }

    fn list(&self) -> Result<Vec<ProductRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::PriceTrend;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            brand: "Acme".to_string(),
            category: "Tools".to_string(),
            price: Decimal::new(1234, 2),
            description: "desc".to_string(),
            image_file_name: "img.jpg".to_string(),
            source_link: None,
            price_trend: PriceTrend::Unchanged,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();

        assert_eq!(store.create(draft("One")).unwrap(), 1);
        assert_eq!(store.create(draft("Two")).unwrap(), 2);
        assert_eq!(store.create(draft("Three")).unwrap(), 3);
    }

    #[test]
    fn test_find_and_list_order() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        store.create(draft("One")).unwrap();
        store.create(draft("Two")).unwrap();

        let record = store.find(1).unwrap().unwrap();
        assert_eq!(record.name, "One");
        assert!(store.find(99).unwrap().is_none());

        // list() keeps insertion order
        let all = store.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "One");
        assert_eq!(all[1].name, "Two");
    }

    #[test]
    fn test_update_preserves_created_at() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        store.create(draft("One")).unwrap();

        let mut record = store.find(1).unwrap().unwrap();
        let original_created = record.created_at;
        record.name = "Renamed".to_string();
        record.created_at = Utc::now() + chrono::Duration::days(30);
        store.update(record).unwrap();

        let reloaded = store.find(1).unwrap().unwrap();
        assert_eq!(reloaded.name, "Renamed");
        assert_eq!(reloaded.created_at, original_created);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        store.create(draft("One")).unwrap();

        let mut record = store.find(1).unwrap().unwrap();
        record.id = 42;
        assert!(matches!(store.update(record), Err(Error::NotFound(42))));
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        store.create(draft("One")).unwrap();

        store.delete(1).unwrap();
        assert!(store.find(1).unwrap().is_none());
        assert!(matches!(store.delete(1), Err(Error::NotFound(1))));
    }

    #[test]
    fn test_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");

        {
            let mut store = JsonStore::open(&path).unwrap();
            store.create(draft("Persisted")).unwrap();
            store.create(draft("Deleted")).unwrap();
            store.delete(2).unwrap();
        }

        let mut store = JsonStore::open(&path).unwrap();
        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Persisted");

        // Ids are not reused after delete
        assert_eq!(store.create(draft("Next")).unwrap(), 3);
    }

    #[test]
    fn test_corrupt_catalog_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonStore::open(&path), Err(Error::Store(_))));
    }
}
