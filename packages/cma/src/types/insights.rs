//! Narrative insights parsed from the text-generation service.

use serde::{Deserialize, Serialize};

/// How confident the narrative step is in its analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Lenient parse of model output; anything unrecognized degrades to
    /// `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => ConfidenceLevel::High,
            "low" => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Medium,
        }
    }
}

/// A suggested listing-price band in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPriceRange {
    pub low_cents: i64,
    pub high_cents: i64,
    pub currency: String,
}

/// Structured narrative output persisted onto the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeInsights {
    pub executive_summary: String,
    pub market_position: String,
    pub pricing_rationale: String,
    pub strengths: Vec<String>,
    pub considerations: Vec<String>,
    pub recommendation: String,
    pub time_to_sell_estimate: String,
    pub confidence_level: ConfidenceLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_parse_is_lenient() {
        assert_eq!(ConfidenceLevel::parse_lenient("High"), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::parse_lenient(" low "), ConfidenceLevel::Low);
        assert_eq!(
            ConfidenceLevel::parse_lenient("whatever"),
            ConfidenceLevel::Medium
        );
    }
}
