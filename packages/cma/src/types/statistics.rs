//! Aggregate market statistics over a set of scored comparables.

use serde::{Deserialize, Serialize};

/// Min/max/spread over the raw prices of a comparable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_cents: i64,
    pub max_cents: i64,
    pub spread_cents: i64,
}

/// Aggregates computed from a scored comparable list.
///
/// Every aggregate is `None` (never zero) when its input set was empty,
/// so callers can distinguish "zero dollars" from "insufficient data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub comparable_count: usize,

    pub average_price_cents: Option<i64>,
    pub median_price_cents: Option<i64>,
    pub average_adjusted_price_cents: Option<i64>,
    pub median_adjusted_price_cents: Option<i64>,

    /// Mean of each comparable's own price/area ratio, in minor units per
    /// area unit
    pub price_per_area_cents: Option<i64>,

    pub price_range: Option<PriceRange>,

    /// Sample standard deviation (N-1) over raw prices, requires >= 2
    /// data points
    pub price_std_deviation_cents: Option<i64>,

    /// Mean similarity score, one decimal
    pub average_similarity_score: Option<f64>,

    /// Adjusted average price-per-area times the subject's own area
    pub estimated_subject_value_cents: Option<i64>,

    /// ISO 4217 code, passed through from the report
    pub currency: String,
}

impl MarketStatistics {
    /// Statistics for an empty comparable set: count zero, everything
    /// else unavailable.
    pub fn empty(currency: impl Into<String>) -> Self {
        Self {
            comparable_count: 0,
            average_price_cents: None,
            median_price_cents: None,
            average_adjusted_price_cents: None,
            median_adjusted_price_cents: None,
            price_per_area_cents: None,
            price_range: None,
            price_std_deviation_cents: None,
            average_similarity_score: None,
            estimated_subject_value_cents: None,
            currency: currency.into(),
        }
    }
}
