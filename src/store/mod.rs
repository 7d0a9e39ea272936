//! Product catalog records, submission payloads, and the record-store seam.
//!
//! Persistence is deliberately thin: the store is a key-value collaborator
//! keyed by integer id, not a place for business logic.

pub mod json;

use crate::error::{Error, Result};
use crate::price::PriceTrend;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use json::JsonStore;

/// Maximum length for user-entered text fields.
pub const MAX_FIELD_LEN: usize = 100;

/// Minimum plausible length for a submitted product link.
pub const MIN_LINK_LEN: usize = 25;

/// A persisted catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Store-assigned identity.
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    /// Fixed-point price, two fractional digits.
    pub price: Decimal,
    pub description: String,
    /// Name of the backing file inside local image storage. Always
    /// references an existing file for the record's lifetime.
    pub image_file_name: String,
    /// External page this record was scraped from, if any.
    #[serde(default)]
    pub source_link: Option<String>,
    /// Direction of the most recent price change.
    #[serde(default)]
    pub price_trend: PriceTrend,
    /// Assigned at creation, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create a record; the store assigns id and
/// creation timestamp.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub image_file_name: String,
    pub source_link: Option<String>,
    pub price_trend: PriceTrend,
}

/// Transient payload driving automated record creation from a product page.
#[derive(Debug, Clone)]
pub struct LinkSubmission {
    pub link: String,
    pub category: String,
    pub description: String,
}

impl LinkSubmission {
    /// Validates the submission against the expected site prefix. Runs
    /// before any network call; a failing link never reaches the fetcher.
    pub fn validate(&self, site_prefix: &str) -> Result<()> {
        if self.link.trim().is_empty() {
            return Err(Error::validation("link", "The link is required."));
        }
        if !self.link.starts_with(site_prefix) || self.link.len() <= MIN_LINK_LEN {
            return Err(Error::InvalidLink(self.link.clone()));
        }
        required_bounded("category", &self.category)?;
        required_bounded("description", &self.description)?;
        Ok(())
    }
}

/// User-entered fields for direct create and edit. The image file is
/// optional on edit ("keep the current image"); absent is valid.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    pub image_file: Option<PathBuf>,
}

impl ProductForm {
    pub fn validate(&self) -> Result<()> {
        required_bounded("name", &self.name)?;
        required_bounded("brand", &self.brand)?;
        required_bounded("category", &self.category)?;
        if self.description.len() > MAX_FIELD_LEN {
            return Err(Error::validation(
                "description",
                format!("Must be at most {MAX_FIELD_LEN} characters."),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(Error::validation("price", "The price must not be negative."));
        }
        Ok(())
    }
}

fn required_bounded(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, format!("The {field} is required.")));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(Error::validation(
            field,
            format!("Must be at most {MAX_FIELD_LEN} characters."),
        ));
    }
    Ok(())
}

/// Key-value record store keyed by integer id.
pub trait ProductStore {
    /// Persists a draft and returns the assigned id.
    fn create(&mut self, draft: ProductDraft) -> Result<i64>;

    /// Looks up a record by id.
    fn find(&self, id: i64) -> Result<Option<ProductRecord>>;

    /// Replaces an existing record. `created_at` is preserved from the
    /// stored copy; it is immutable after creation.
    fn update(&mut self, record: ProductRecord) -> Result<()>;

    /// Removes a record by id.
    fn delete(&mut self, id: i64) -> Result<()>;

    /// All records in store-native (insertion) order.
    fn list(&self) -> Result<Vec<ProductRecord>>;
}
