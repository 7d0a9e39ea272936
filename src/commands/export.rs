//! Export command: catalog to an xlsx file.

use crate::config::Config;
use crate::error::Result;
use crate::export::SpreadsheetExporter;
use crate::images::ImageStore;
use crate::store::ProductStore;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ExportCommand {
    config: Config,
}

impl ExportCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the spreadsheet in memory. Records appear in store order.
    pub fn export_bytes(&self, store: &dyn ProductStore) -> Result<Vec<u8>> {
        let images = ImageStore::new(&self.config.data_dir);
        let records = store.list()?;
        SpreadsheetExporter::new(&images).export(&records)
    }

    /// Writes the spreadsheet to `output` (or the configured default)
    /// and returns the path written.
    pub fn execute(
        &self,
        store: &dyn ProductStore,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = output.unwrap_or(&self.config.export_file).to_path_buf();
        let buffer = self.export_bytes(store)?;
        std::fs::write(&path, &buffer)?;

        info!("Exported {} bytes to {}", buffer.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::PriceTrend;
    use crate::store::{JsonStore, ProductDraft};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    const PIXEL: &[u8] = include_bytes!("../../tests/fixtures/widget.png");

    fn setup(dir: &TempDir) -> (Config, JsonStore, ImageStore) {
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            export_file: dir.path().join("ShoppingList.xlsx"),
            ..Config::default()
        };
        let store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        let images = ImageStore::new(dir.path());
        (config, store, images)
    }

    fn seed(store: &mut JsonStore, images: &ImageStore, link: Option<&str>) -> i64 {
        let image_file_name = images.save(PIXEL).unwrap();
        store
            .create(ProductDraft {
                name: "Widget".to_string(),
                brand: "Acme".to_string(),
                category: "Tools".to_string(),
                price: Decimal::new(1234, 2),
                description: "desc".to_string(),
                image_file_name,
                source_link: link.map(String::from),
                price_trend: PriceTrend::Unchanged,
            })
            .unwrap()
    }

    #[test]
    fn test_execute_writes_default_file() {
        let dir = TempDir::new().unwrap();
        let (config, mut store, images) = setup(&dir);
        seed(&mut store, &images, Some("https://www.amazon.com/dp/B0TESTTEST"));
        seed(&mut store, &images, None);

        let cmd = ExportCommand::new(config.clone());
        let path = cmd.execute(&store, None).unwrap();

        assert_eq!(path, config.export_file);
        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[..2], b"PK");
    }

    #[test]
    fn test_execute_with_explicit_output() {
        let dir = TempDir::new().unwrap();
        let (config, mut store, images) = setup(&dir);
        seed(&mut store, &images, None);

        let out = dir.path().join("custom.xlsx");
        let cmd = ExportCommand::new(config);
        let path = cmd.execute(&store, Some(&out)).unwrap();

        assert_eq!(path, out);
        assert!(out.exists());
    }

    #[test]
    fn test_deleted_record_not_exported() {
        let dir = TempDir::new().unwrap();
        let (config, mut store, images) = setup(&dir);

        let keep = seed(&mut store, &images, None);
        let gone = seed(&mut store, &images, None);

        let record = store.find(gone).unwrap().unwrap();
        store.delete(gone).unwrap();
        images.delete(&record.image_file_name).unwrap();

        // Export still succeeds; nothing references the deleted file
        let cmd = ExportCommand::new(config);
        let buffer = cmd.export_bytes(&store).unwrap();
        assert_eq!(&buffer[..2], b"PK");
        assert!(store.find(keep).unwrap().is_some());
    }
}
