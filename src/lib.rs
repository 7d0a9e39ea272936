//! shoplist - Personal shopping-list manager
//!
//! CRUD over a product catalog, plus scraping an Amazon product page to
//! auto-populate entries, tracking price direction on re-fetch, and
//! exporting the catalog to a spreadsheet with embedded images.

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod images;
pub mod price;
pub mod scrape;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use price::PriceTrend;
pub use store::{LinkSubmission, ProductForm, ProductRecord, ProductStore};
