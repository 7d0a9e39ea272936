//! Direct catalog CRUD: create from a form, edit, delete, list.
//!
//! Routine glue around the store, but it owns the image-lifecycle
//! invariants: a record never exists without its image file, and old
//! images are removed only after the record mutation has gone through.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::store::{ProductDraft, ProductForm, ProductRecord, ProductStore};
use tracing::{info, warn};

pub struct ManageCommand {
    images: ImageStore,
}

impl ManageCommand {
    pub fn new(config: &Config) -> Self {
        Self { images: ImageStore::new(&config.data_dir) }
    }

    /// Creates a record from user-entered fields. The image file is
    /// required here; only link submission supplies one automatically.
    pub fn add(&self, store: &mut dyn ProductStore, form: &ProductForm) -> Result<ProductRecord> {
        form.validate()?;

        let image_path = form
            .image_file
            .as_ref()
            .ok_or_else(|| Error::validation("image", "The image file is required."))?;

        let bytes = std::fs::read(image_path).map_err(|e| {
            Error::validation("image", format!("Could not read {}: {e}", image_path.display()))
        })?;
        let image_file_name = self.images.save(&bytes)?;

        let draft = ProductDraft {
            name: form.name.clone(),
            brand: form.brand.clone(),
            category: form.category.clone(),
            price: form.price,
            description: form.description.clone(),
            image_file_name: image_file_name.clone(),
            source_link: None,
            price_trend: Default::default(),
        };

        let id = match store.create(draft) {
            Ok(id) => id,
            Err(e) => {
                if let Err(cleanup) = self.images.delete(&image_file_name) {
                    warn!("Failed to remove orphaned image {}: {}", image_file_name, cleanup);
                }
                return Err(e);
            }
        };

        let record = store.find(id)?.ok_or(Error::NotFound(id))?;
        info!("Added product {} ('{}')", record.id, record.name);
        Ok(record)
    }

    /// Updates a record's fields. A supplied image replaces the stored
    /// one; the old file is deleted only after the new one is written and
    /// the record updated. No image means keep the current one.
    pub fn edit(
        &self,
        store: &mut dyn ProductStore,
        id: i64,
        form: &ProductForm,
    ) -> Result<ProductRecord> {
        let mut record = store.find(id)?.ok_or(Error::NotFound(id))?;
        form.validate()?;

        let old_image = record.image_file_name.clone();
        let mut replaced = false;

        if let Some(image_path) = &form.image_file {
            let bytes = std::fs::read(image_path).map_err(|e| {
                Error::validation(
                    "image",
                    format!("Could not read {}: {e}", image_path.display()),
                )
            })?;
            record.image_file_name = self.images.save(&bytes)?;
            replaced = true;
        }

        record.name = form.name.clone();
        record.brand = form.brand.clone();
        record.category = form.category.clone();
        record.price = form.price;
        record.description = form.description.clone();

        if let Err(e) = store.update(record.clone()) {
            // Do not leave the replacement image behind on a failed update
            if replaced {
                if let Err(cleanup) = self.images.delete(&record.image_file_name) {
                    warn!(
                        "Failed to remove orphaned image {}: {}",
                        record.image_file_name, cleanup
                    );
                }
            }
            return Err(e);
        }

        if replaced {
            self.images.delete(&old_image)?;
        }

        info!("Updated product {}", record.id);
        Ok(record)
    }

    /// Removes a record, cascading to its image file after the record is
    /// gone from the store.
    pub fn delete(&self, store: &mut dyn ProductStore, id: i64) -> Result<()> {
        let record = store.find(id)?.ok_or(Error::NotFound(id))?;

        store.delete(id)?;
        self.images.delete(&record.image_file_name)?;

        info!("Deleted product {}", id);
        Ok(())
    }

    /// Catalog entries, newest first.
    pub fn list(&self, store: &dyn ProductStore) -> Result<Vec<ProductRecord>> {
        let mut records = store.list()?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (ManageCommand, JsonStore, ImageStore) {
        let config = Config { data_dir: dir.path().to_path_buf(), ..Config::default() };
        let cmd = ManageCommand::new(&config);
        let store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        let images = ImageStore::new(dir.path());
        (cmd, store, images)
    }

    fn form_with_image(dir: &TempDir, name: &str, bytes: &[u8]) -> ProductForm {
        let path = dir.path().join(format!("{name}.upload"));
        std::fs::write(&path, bytes).unwrap();
        ProductForm {
            name: name.to_string(),
            brand: "Acme".to_string(),
            category: "Tools".to_string(),
            price: Decimal::new(1234, 2),
            description: "desc".to_string(),
            image_file: Some(path),
        }
    }

    #[test]
    fn test_add_stores_record_and_image() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, images) = setup(&dir);

        let form = form_with_image(&dir, "Widget", b"image-bytes");
        let record = cmd.add(&mut store, &form).unwrap();

        assert_eq!(record.name, "Widget");
        assert!(record.source_link.is_none());
        assert_eq!(images.read(&record.image_file_name).unwrap(), b"image-bytes");
    }

    #[test]
    fn test_add_requires_image() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, _) = setup(&dir);

        let mut form = form_with_image(&dir, "Widget", b"x");
        form.image_file = None;

        let err = cmd.add(&mut store, &form).unwrap_err();
        assert_eq!(err.field(), Some("image"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_edit_without_image_keeps_current() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, images) = setup(&dir);

        let record = cmd.add(&mut store, &form_with_image(&dir, "Widget", b"original")).unwrap();

        let mut form = form_with_image(&dir, "Renamed", b"unused");
        form.image_file = None;
        let updated = cmd.edit(&mut store, record.id, &form).unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.image_file_name, record.image_file_name);
        assert_eq!(images.read(&updated.image_file_name).unwrap(), b"original");
    }

    #[test]
    fn test_edit_with_image_replaces_and_removes_old() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, images) = setup(&dir);

        let record = cmd.add(&mut store, &form_with_image(&dir, "Widget", b"original")).unwrap();
        let updated =
            cmd.edit(&mut store, record.id, &form_with_image(&dir, "Widget", b"replacement")).unwrap();

        assert_ne!(updated.image_file_name, record.image_file_name);
        assert_eq!(images.read(&updated.image_file_name).unwrap(), b"replacement");
        assert!(!images.exists(&record.image_file_name));
    }

    /// Store whose updates always fail, for exercising rollback paths.
    struct UpdateFailStore {
        inner: JsonStore,
    }

    impl ProductStore for UpdateFailStore {
        fn create(&mut self, draft: ProductDraft) -> crate::error::Result<i64> {
            self.inner.create(draft)
        }
        fn find(&self, id: i64) -> crate::error::Result<Option<ProductRecord>> {
            self.inner.find(id)
        }
        fn update(&mut self, _record: ProductRecord) -> crate::error::Result<()> {
            Err(Error::Store("disk full".to_string()))
        }
        fn delete(&mut self, id: i64) -> crate::error::Result<()> {
            self.inner.delete(id)
        }
        fn list(&self) -> crate::error::Result<Vec<ProductRecord>> {
            self.inner.list()
        }
    }

    #[test]
    fn test_edit_update_failure_removes_new_image() {
        let dir = TempDir::new().unwrap();
        let (cmd, store, images) = setup(&dir);
        let mut store = UpdateFailStore { inner: store };

        let record = cmd.add(&mut store, &form_with_image(&dir, "Widget", b"original")).unwrap();

        let result =
            cmd.edit(&mut store, record.id, &form_with_image(&dir, "Widget", b"replacement"));
        assert!(matches!(result, Err(Error::Store(_))));

        // The stored image is untouched and the replacement is cleaned up
        assert!(images.exists(&record.image_file_name));
        let on_disk = std::fs::read_dir(dir.path().join("pictures")).unwrap().count();
        assert_eq!(on_disk, 1);
    }

    #[test]
    fn test_edit_unknown_id() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, _) = setup(&dir);

        let form = form_with_image(&dir, "Widget", b"x");
        assert!(matches!(cmd.edit(&mut store, 42, &form), Err(Error::NotFound(42))));
    }

    #[test]
    fn test_delete_cascades_to_image() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, images) = setup(&dir);

        let record = cmd.add(&mut store, &form_with_image(&dir, "Widget", b"bytes")).unwrap();
        cmd.delete(&mut store, record.id).unwrap();

        assert!(store.find(record.id).unwrap().is_none());
        assert!(!images.exists(&record.image_file_name));
    }

    #[test]
    fn test_delete_unknown_id() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, _) = setup(&dir);
        assert!(matches!(cmd.delete(&mut store, 7), Err(Error::NotFound(7))));
    }

    #[test]
    fn test_list_newest_first() {
        let dir = TempDir::new().unwrap();
        let (cmd, mut store, _) = setup(&dir);

        cmd.add(&mut store, &form_with_image(&dir, "First", b"a")).unwrap();
        cmd.add(&mut store, &form_with_image(&dir, "Second", b"b")).unwrap();
        cmd.add(&mut store, &form_with_image(&dir, "Third", b"c")).unwrap();

        let listed = cmd.list(&store).unwrap();
        let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Third", "Second", "First"]);

        // Store-native order is untouched
        let raw = store.list().unwrap();
        assert_eq!(raw[0].name, "First");
    }
}
