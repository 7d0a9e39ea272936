//! Field extraction from product-page HTML.

use crate::error::{Error, Result};
use crate::scrape::selectors;
use scraper::Html;
use tracing::{debug, trace};

/// How much of the page to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Title, brand, composite price, and image URL.
    Full,
    /// Only the composite price. Used by price refresh.
    PriceOnly,
}

/// Fields located on a product page. All four are populated in full mode;
/// only the price parts in price-only mode.
#[derive(Debug, Clone)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub brand: Option<String>,
    /// Raw text of the whole (integer) price element.
    pub price_whole: String,
    /// Raw text of the fractional price element.
    pub price_fraction: String,
    pub image_url: Option<String>,
}

impl ExtractedFields {
    /// Composite price text: whole+fraction concatenated, digits trimmed
    /// to their raw form, no decimal separator inserted at this stage.
    pub fn price_text(&self) -> String {
        format!("{}{}", self.price_whole.trim(), self.price_fraction.trim())
    }
}

/// Locates fields by structural query against the known page shape.
///
/// Every selector result is checked before use; a missing required element
/// is a typed [`Error::Extraction`], never a panic. Title text is
/// HTML-entity-decoded (html5ever decodes entities while parsing).
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts fields from raw HTML in the given mode.
    pub fn extract(&self, html: &str, mode: ExtractMode) -> Result<ExtractedFields> {
        let document = Html::parse_document(html);

        let price_whole = document
            .select(&selectors::PRICE_WHOLE)
            .next()
            .map(|e| e.text().collect::<String>())
            .ok_or(Error::Extraction("price whole part"))?;

        let price_fraction = document
            .select(&selectors::PRICE_FRACTION)
            .next()
            .map(|e| e.text().collect::<String>())
            .ok_or(Error::Extraction("price fraction part"))?;

        trace!("Price parts: '{}' / '{}'", price_whole.trim(), price_fraction.trim());

        if mode == ExtractMode::PriceOnly {
            return Ok(ExtractedFields {
                title: None,
                brand: None,
                price_whole,
                price_fraction,
                image_url: None,
            });
        }

        let title = document
            .select(&selectors::TITLE)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .ok_or(Error::Extraction("product title"))?;

        // Brand keeps its raw inner text
        let brand = document
            .select(&selectors::BRAND)
            .next()
            .map(|e| e.text().collect::<String>())
            .ok_or(Error::Extraction("brand"))?;

        let image_url = document
            .select(&selectors::IMAGE)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(String::from)
            .ok_or(Error::Extraction("product image"))?;

        debug!("Extracted '{}' by {}", title, brand);

        Ok(ExtractedFields {
            title: Some(title),
            brand: Some(brand),
            price_whole,
            price_fraction,
            image_url: Some(image_url),
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
