//! Page scraping: HTTP fetcher, structural selectors, and field extraction.

pub mod client;
pub mod extractor;
pub mod selectors;

pub use client::{HttpFetcher, PageFetcher};
pub use extractor::{ExtractMode, ExtractedFields, Extractor};
