//! CSS selectors for the Amazon product-page shape.
//!
//! This file contains all selectors used to locate scraped fields.
//! Update this file when the site changes its HTML structure.
//!
//! **Update process**: When extraction fails, capture an HTML sample,
//! update selectors, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Product title, identified by an id fragment.
pub static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id*='productTitle']").unwrap());

/// Brand value inside the product-overview table row.
pub static BRAND: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "tr.po-brand span.po-break-word, \
         tr.po-brand td.a-span9 span",
    )
    .unwrap()
});

/// Whole (integer) part of the composite price.
pub static PRICE_WHOLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price .a-price-whole").unwrap());

/// Fractional (cents) part of the composite price.
pub static PRICE_FRACTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price .a-price-fraction").unwrap());

/// Main product image, identified by an id fragment; `src` holds the URL.
pub static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[id*='landingImage']").unwrap());
