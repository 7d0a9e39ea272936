//! Scrape-and-create: turns a link submission into a catalog record.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::images::ImageStore;
use crate::price;
use crate::scrape::{ExtractMode, Extractor, HttpFetcher, PageFetcher};
use crate::store::{LinkSubmission, ProductDraft, ProductRecord, ProductStore};
use tracing::{info, warn};

/// Creates a product record from a scraped page.
pub struct SubmitLinkCommand {
    config: Config,
}

impl SubmitLinkCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Validates, scrapes, and persists. Validation runs before any
    /// network call; an invalid link never reaches the fetcher.
    pub async fn execute(
        &self,
        store: &mut dyn ProductStore,
        submission: &LinkSubmission,
    ) -> Result<ProductRecord> {
        let fetcher = HttpFetcher::new(&self.config)?;
        self.execute_with_fetcher(&fetcher, store, submission).await
    }

    /// Runs the pipeline with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        store: &mut dyn ProductStore,
        submission: &LinkSubmission,
    ) -> Result<ProductRecord> {
        submission.validate(&self.config.site_prefix)?;

        info!("Scraping {}", submission.link);
        let html = fetcher.fetch_page(&submission.link).await?;

        let fields = Extractor::new().extract(&html, ExtractMode::Full)?;
        let new_price = price::parse_composite(&fields.price_whole, &fields.price_fraction)?;

        // Full mode guarantees these are present
        let title = fields.title.ok_or(Error::Extraction("product title"))?;
        let brand = fields.brand.ok_or(Error::Extraction("brand"))?;
        let image_url = fields.image_url.ok_or(Error::Extraction("product image"))?;

        // The record is persisted only after its image is on disk
        let image_bytes = fetcher.fetch_image(&image_url).await?;
        let images = ImageStore::new(&self.config.data_dir);
        let image_file_name = images.save(&image_bytes)?;

        let draft = ProductDraft {
            name: title,
            brand,
            category: submission.category.clone(),
            price: new_price,
            description: submission.description.clone(),
            image_file_name: image_file_name.clone(),
            source_link: Some(submission.link.clone()),
            price_trend: Default::default(),
        };

        let id = match store.create(draft) {
            Ok(id) => id,
            Err(e) => {
                // Do not leave an unreferenced image behind
                if let Err(cleanup) = images.delete(&image_file_name) {
                    warn!("Failed to remove orphaned image {}: {}", image_file_name, cleanup);
                }
                return Err(e);
            }
        };

        let record = store.find(id)?.ok_or(Error::NotFound(id))?;
        info!("Created product {} ('{}') at {}", record.id, record.name, record.price);
        Ok(record)
    }
}
