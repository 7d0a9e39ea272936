//! Price normalization: composite whole+fraction text and trend classification.
//!
//! Amazon renders a price across two adjacent elements (the integer part and
//! the cents part). Both arrive here as raw text and must be cleaned and
//! merged before numeric parsing.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Merges split whole+fraction price text into a decimal with two
/// fractional digits, e.g. whole="29" fraction="99" -> 29.99.
///
/// Thousands separators and the trailing decimal point Amazon leaves in the
/// whole part are stripped; anything without digits in the whole part is a
/// `PriceParseError`.
pub fn parse_composite(whole: &str, fraction: &str) -> Result<Decimal> {
    let whole_digits: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    if whole_digits.is_empty() {
        return Err(Error::PriceParse(format!("{whole}.{fraction}")));
    }

    let units: i64 = whole_digits
        .parse()
        .map_err(|_| Error::PriceParse(format!("{whole}.{fraction}")))?;

    let fraction_digits: String =
        fraction.chars().filter(|c| c.is_ascii_digit()).take(2).collect();

    let cents: i64 = match fraction_digits.len() {
        0 => 0,
        1 => fraction_digits.parse::<i64>().map_err(|_| {
            Error::PriceParse(format!("{whole}.{fraction}"))
        })? * 10,
        _ => fraction_digits
            .parse()
            .map_err(|_| Error::PriceParse(format!("{whole}.{fraction}")))?,
    };

    units
        .checked_mul(100)
        .and_then(|u| u.checked_add(cents))
        .map(|total| Decimal::new(total, 2))
        .ok_or_else(|| Error::PriceParse(format!("{whole}.{fraction}")))
}

/// Direction of a record's most recent price change. Presentational
/// metadata only, recomputed on every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Increased,
    Decreased,
    #[default]
    Unchanged,
}

impl PriceTrend {
    /// Classifies the change from `old` to `new`.
    pub fn of(old: Decimal, new: Decimal) -> Self {
        if new > old {
            PriceTrend::Increased
        } else if new < old {
            PriceTrend::Decreased
        } else {
            PriceTrend::Unchanged
        }
    }

    /// Arrow glyph for listings.
    pub fn arrow(&self) -> &'static str {
        match self {
            PriceTrend::Increased => "↑",
            PriceTrend::Decreased => "↓",
            PriceTrend::Unchanged => "=",
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceTrend::Increased => "increased",
            PriceTrend::Decreased => "decreased",
            PriceTrend::Unchanged => "unchanged",
        };
        write!(f, "{}", s)
    }
}
