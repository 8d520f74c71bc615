//! Search options for the comparable finder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::property::SubjectProperty;

/// Options controlling the comparable search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Geographic search radius in kilometers. Default: 2.0.
    pub radius_km: f64,

    /// Listing-recency window echoed into the search criteria.
    ///
    /// Accepted and reported for UI transparency but not applied as a
    /// temporal filter; candidate pools carry no listing date in this
    /// pipeline. Default: 6.
    pub months_back: u32,

    /// Maximum comparables returned after ranking. Default: 10.
    pub max_comparables: usize,

    /// Minimum similarity score a candidate must reach. Default: 50.0.
    pub min_similarity_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            radius_km: 2.0,
            months_back: 6,
            max_comparables: 10,
            min_similarity_score: 50.0,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_months_back(mut self, months_back: u32) -> Self {
        self.months_back = months_back;
        self
    }

    pub fn with_max_comparables(mut self, max_comparables: usize) -> Self {
        self.max_comparables = max_comparables;
        self
    }

    pub fn with_min_similarity_score(mut self, min_similarity_score: f64) -> Self {
        self.min_similarity_score = min_similarity_score;
        self
    }

    /// The criteria map surfaced alongside finder results, in insertion
    /// order for stable serialization.
    pub fn search_criteria(&self, subject: &SubjectProperty) -> IndexMap<String, serde_json::Value> {
        let mut criteria = IndexMap::new();
        criteria.insert("radius_km".to_string(), json!(self.radius_km));
        criteria.insert("months_back".to_string(), json!(self.months_back));
        criteria.insert("max_comparables".to_string(), json!(self.max_comparables));
        criteria.insert(
            "min_similarity_score".to_string(),
            json!(self.min_similarity_score),
        );
        criteria.insert(
            "property_type".to_string(),
            json!(subject.attributes.property_type),
        );
        criteria.insert("listing_kind".to_string(), json!(subject.listing_kind));
        criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::property::ListingKind;
    use uuid::Uuid;

    #[test]
    fn defaults_match_finder_contract() {
        let options = SearchOptions::default();
        assert_eq!(options.radius_km, 2.0);
        assert_eq!(options.months_back, 6);
        assert_eq!(options.max_comparables, 10);
        assert_eq!(options.min_similarity_score, 50.0);
    }

    #[test]
    fn criteria_echo_options_and_subject_context() {
        let subject = SubjectProperty::new(Uuid::new_v4(), ListingKind::Sale);
        let criteria = SearchOptions::default()
            .with_radius_km(5.0)
            .search_criteria(&subject);
        assert_eq!(criteria["radius_km"], json!(5.0));
        assert_eq!(criteria["months_back"], json!(6));
        assert_eq!(criteria["listing_kind"], json!("sale"));
    }
}
