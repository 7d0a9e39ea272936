//! Price refresh: re-scrapes a stored record's page and updates price + trend.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::price::{self, PriceTrend};
use crate::scrape::{ExtractMode, Extractor, HttpFetcher, PageFetcher};
use crate::store::{ProductRecord, ProductStore};
use tracing::info;

/// Re-fetches a record's source page and recomputes price and trend.
/// Touches nothing but those two fields.
pub struct RefreshPriceCommand {
    config: Config,
}

impl RefreshPriceCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, store: &mut dyn ProductStore, id: i64) -> Result<ProductRecord> {
        let fetcher = HttpFetcher::new(&self.config)?;
        self.execute_with_fetcher(&fetcher, store, id).await
    }

    /// Runs the refresh with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        store: &mut dyn ProductStore,
        id: i64,
    ) -> Result<ProductRecord> {
        let mut record = store.find(id)?.ok_or(Error::NotFound(id))?;

        let link = record
            .source_link
            .clone()
            .ok_or_else(|| Error::validation("link", "This product has no source link."))?;

        info!("Refreshing price for {} from {}", record.id, link);
        let html = fetcher.fetch_page(&link).await?;

        let fields = Extractor::new().extract(&html, ExtractMode::PriceOnly)?;
        let new_price = price::parse_composite(&fields.price_whole, &fields.price_fraction)?;

        record.price_trend = PriceTrend::of(record.price, new_price);
        record.price = new_price;
        store.update(record.clone())?;

        info!("Price for {} is now {} ({})", record.id, record.price, record.price_trend);
        Ok(record)
    }
}
