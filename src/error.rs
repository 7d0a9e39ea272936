//! Error types for catalog, scraping, and export operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A submitted field failed validation.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The submitted link is not a product page on the expected site.
    #[error("The link is invalid: {0}")]
    InvalidLink(String),

    /// The page request failed (network, timeout, or non-success status).
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A required element was missing from the fetched page.
    #[error("Could not extract {0} from the page")]
    Extraction(&'static str),

    /// The product image could not be downloaded or stored.
    #[error("Image download failed: {0}")]
    ImageDownload(String),

    /// Price text could not be parsed into a decimal amount.
    #[error("Could not parse price from '{0}'")]
    PriceParse(String),

    /// No catalog record with the given id.
    #[error("Product {0} not found")]
    NotFound(i64),

    /// The catalog file could not be read or written.
    #[error("Catalog store error: {0}")]
    Store(String),

    #[error("Spreadsheet error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation { field: field.into(), message: message.into() }
    }

    /// The offending field name, for errors tied to a single input field.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            Error::InvalidLink(_) => Some("link"),
            _ => None,
        }
    }
}
