//! Scored comparables and price adjustments.

use serde::{Deserialize, Serialize};

use super::property::ComparableCandidate;

/// The factor an adjustment corrects for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentCategory {
    Bedrooms,
    Bathrooms,
    Size,
    YearBuilt,
    Garages,
}

impl AdjustmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentCategory::Bedrooms => "bedrooms",
            AdjustmentCategory::Bathrooms => "bathrooms",
            AdjustmentCategory::Size => "size",
            AdjustmentCategory::YearBuilt => "year_built",
            AdjustmentCategory::Garages => "garages",
        }
    }
}

/// A signed price correction toward subject parity.
///
/// `difference` is always subject value minus candidate value, so a
/// positive amount raises the candidate's price toward what it would cost
/// if it matched a larger subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub category: AdjustmentCategory,
    pub difference: f64,
    pub amount_cents: i64,
}

impl Adjustment {
    pub fn new(category: AdjustmentCategory, difference: f64, amount_cents: i64) -> Self {
        Self {
            category,
            difference,
            amount_cents,
        }
    }
}

/// A candidate with its similarity score and price adjustments.
///
/// Created once per finder invocation and embedded into the report as a
/// snapshot; never persisted as its own entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComparable {
    pub candidate: ComparableCandidate,

    /// 0-100, one decimal place
    pub similarity_score: f64,

    /// Great-circle distance to the subject in km, when both have
    /// coordinates
    pub distance_km: Option<f64>,

    /// Ordered list of applied corrections
    pub adjustments: Vec<Adjustment>,

    /// Raw price plus the sum of adjustments; `None` when the raw price
    /// is missing or non-positive
    pub adjusted_price_cents: Option<i64>,
}

impl ScoredComparable {
    /// The candidate's raw listing price, if usable.
    pub fn price_cents(&self) -> Option<i64> {
        self.candidate.listing.price_cents()
    }

    /// Sum of all adjustment amounts.
    pub fn total_adjustment_cents(&self) -> i64 {
        self.adjustments.iter().map(|a| a.amount_cents).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::property::Listing;
    use uuid::Uuid;

    #[test]
    fn total_adjustment_sums_signed_amounts() {
        let comparable = ScoredComparable {
            candidate: ComparableCandidate::new(
                Uuid::new_v4(),
                Listing::Sale {
                    price_cents: Some(100_000),
                },
            ),
            similarity_score: 90.0,
            distance_km: None,
            adjustments: vec![
                Adjustment::new(AdjustmentCategory::Bedrooms, 1.0, 1_500_000),
                Adjustment::new(AdjustmentCategory::Size, -12.0, -180_000),
            ],
            adjusted_price_cents: Some(1_420_000),
        };
        assert_eq!(comparable.total_adjustment_cents(), 1_320_000);
    }
}
