//! Comparable search: filter a candidate pool, score similarity, and
//! compute price adjustments toward subject parity.

use indexmap::IndexMap;
use tracing::debug;

use crate::pipeline::geo::{haversine_km, BoundingBox};
use crate::types::comparable::{Adjustment, AdjustmentCategory, ScoredComparable};
use crate::types::config::SearchOptions;
use crate::types::property::{ComparableCandidate, SubjectProperty};

// Penalty caps per scoring factor
const TYPE_MISMATCH_PENALTY: f64 = 20.0;
const BEDROOM_PENALTY_CAP: f64 = 15.0;
const BATHROOM_PENALTY_CAP: f64 = 10.0;
const SIZE_PENALTY_CAP: f64 = 20.0;
const DISTANCE_PENALTY_CAP: f64 = 20.0;
const YEAR_PENALTY_CAP: f64 = 10.0;

// Adjustment amounts in minor currency units
const BEDROOM_ADJUSTMENT_CENTS: i64 = 1_500_000;
const BATHROOM_ADJUSTMENT_CENTS: f64 = 1_000_000.0;
const AREA_UNIT_ADJUSTMENT_CENTS: f64 = 15_000.0;
const YEAR_ADJUSTMENT_CENTS: i64 = 100_000;
const GARAGE_ADJUSTMENT_CENTS: i64 = 800_000;

/// Result of one comparable search.
#[derive(Debug, Clone)]
pub struct FinderOutcome {
    /// Ranked best-first, capped at `max_comparables`
    pub comparables: Vec<ScoredComparable>,

    /// Candidates that passed the hard filters, before the similarity
    /// threshold and cap were applied
    pub total_found: usize,

    /// Echo of the effective criteria, for UI transparency
    pub search_criteria: IndexMap<String, serde_json::Value>,
}

/// Finds, scores, and ranks comparable properties for a subject.
///
/// Pure and synchronous; each candidate is scored independently against
/// the subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparablesFinder;

impl ComparablesFinder {
    pub fn new() -> Self {
        Self
    }

    /// Filter, score, and rank a candidate pool.
    ///
    /// An empty result is a valid outcome, not an error; the caller
    /// decides what it means for the report.
    pub fn find(
        &self,
        subject: &SubjectProperty,
        pool: &[ComparableCandidate],
        options: &SearchOptions,
    ) -> FinderOutcome {
        let bounding_box = subject
            .location
            .map(|center| BoundingBox::around(center, options.radius_km));

        let mut scored: Vec<ScoredComparable> = pool
            .iter()
            .filter(|candidate| passes_filters(subject, candidate, bounding_box.as_ref()))
            .map(|candidate| score_candidate(subject, candidate))
            .collect();
        let total_found = scored.len();

        scored.retain(|c| c.similarity_score >= options.min_similarity_score);
        scored.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(options.max_comparables);

        debug!(
            pool = pool.len(),
            total_found,
            returned = scored.len(),
            "comparable search finished"
        );

        FinderOutcome {
            comparables: scored,
            total_found,
            search_criteria: options.search_criteria(subject),
        }
    }
}

/// Hard filters; a candidate must pass all that apply.
fn passes_filters(
    subject: &SubjectProperty,
    candidate: &ComparableCandidate,
    bounding_box: Option<&BoundingBox>,
) -> bool {
    if candidate.id == subject.id || !candidate.visible {
        return false;
    }

    if candidate.listing.kind() != subject.listing_kind {
        return false;
    }

    if let Some(bbox) = bounding_box {
        match candidate.location {
            Some(point) if bbox.contains(point) => {}
            _ => return false,
        }
    }

    if let Some(subject_type) = subject.attributes.property_type.as_deref() {
        if candidate.attributes.property_type.as_deref() != Some(subject_type) {
            return false;
        }
    }

    let subject_area = subject.attributes.constructed_area;
    if subject_area > 0.0 {
        let area = candidate.attributes.constructed_area;
        if area < subject_area * 0.7 || area > subject_area * 1.3 {
            return false;
        }
    }

    let subject_bedrooms = subject.attributes.bedrooms;
    if subject_bedrooms > 0 {
        let bedrooms = candidate.attributes.bedrooms;
        if bedrooms < subject_bedrooms - 1 || bedrooms > subject_bedrooms + 1 {
            return false;
        }
    }

    true
}

fn score_candidate(subject: &SubjectProperty, candidate: &ComparableCandidate) -> ScoredComparable {
    let distance_km = match (subject.location, candidate.location) {
        (Some(a), Some(b)) => Some(haversine_km(a, b)),
        _ => None,
    };
    let similarity_score = similarity_score(subject, candidate, distance_km);
    let adjustments = compute_adjustments(subject, candidate);
    let total: i64 = adjustments.iter().map(|a| a.amount_cents).sum();
    let adjusted_price_cents = candidate.listing.price_cents().map(|price| price + total);

    ScoredComparable {
        candidate: candidate.clone(),
        similarity_score,
        distance_km,
        adjustments,
        adjusted_price_cents,
    }
}

/// Weighted similarity: start at 100, subtract capped penalties, clamp
/// at 0, one decimal place.
fn similarity_score(
    subject: &SubjectProperty,
    candidate: &ComparableCandidate,
    distance_km: Option<f64>,
) -> f64 {
    let s = &subject.attributes;
    let c = &candidate.attributes;
    let mut score = 100.0;

    if let (Some(subject_type), Some(candidate_type)) =
        (s.property_type.as_deref(), c.property_type.as_deref())
    {
        if subject_type != candidate_type {
            score -= TYPE_MISMATCH_PENALTY;
        }
    }

    let bedroom_delta = (s.bedrooms - c.bedrooms).abs() as f64;
    score -= (bedroom_delta * 3.0).min(BEDROOM_PENALTY_CAP);

    let bathroom_delta = (s.bathrooms - c.bathrooms).abs();
    score -= (bathroom_delta * 5.0).min(BATHROOM_PENALTY_CAP);

    if s.constructed_area > 0.0 && c.constructed_area > 0.0 {
        let pct_diff = (s.constructed_area - c.constructed_area).abs() / s.constructed_area;
        score -= (pct_diff * 100.0 / 5.0).min(SIZE_PENALTY_CAP);
    }

    if let Some(distance) = distance_km {
        score -= (distance * 4.0).min(DISTANCE_PENALTY_CAP);
    }

    if s.year_built > 0 && c.year_built > 0 {
        let year_delta = (s.year_built - c.year_built).abs() as f64;
        score -= (year_delta / 5.0).min(YEAR_PENALTY_CAP);
    }

    (score.max(0.0) * 10.0).round() / 10.0
}

/// Signed corrections toward subject parity, included only when the
/// underlying difference is non-trivial. Delta is always subject minus
/// candidate.
fn compute_adjustments(
    subject: &SubjectProperty,
    candidate: &ComparableCandidate,
) -> Vec<Adjustment> {
    let s = &subject.attributes;
    let c = &candidate.attributes;
    let mut adjustments = Vec::new();

    let bedroom_delta = s.bedrooms - c.bedrooms;
    if bedroom_delta != 0 {
        adjustments.push(Adjustment::new(
            AdjustmentCategory::Bedrooms,
            bedroom_delta as f64,
            bedroom_delta as i64 * BEDROOM_ADJUSTMENT_CENTS,
        ));
    }

    let bathroom_delta = s.bathrooms - c.bathrooms;
    if bathroom_delta.abs() >= 0.5 {
        adjustments.push(Adjustment::new(
            AdjustmentCategory::Bathrooms,
            bathroom_delta,
            (bathroom_delta * BATHROOM_ADJUSTMENT_CENTS).round() as i64,
        ));
    }

    let area_delta = s.constructed_area - c.constructed_area;
    if area_delta.abs() > 10.0 {
        adjustments.push(Adjustment::new(
            AdjustmentCategory::Size,
            area_delta,
            (area_delta * AREA_UNIT_ADJUSTMENT_CENTS).round() as i64,
        ));
    }

    if s.year_built > 0 && c.year_built > 0 {
        let year_delta = s.year_built - c.year_built;
        if year_delta.abs() > 5 {
            adjustments.push(Adjustment::new(
                AdjustmentCategory::YearBuilt,
                year_delta as f64,
                year_delta as i64 * YEAR_ADJUSTMENT_CENTS,
            ));
        }
    }

    let garage_delta = s.garages - c.garages;
    if garage_delta != 0 {
        adjustments.push(Adjustment::new(
            AdjustmentCategory::Garages,
            garage_delta as f64,
            garage_delta as i64 * GARAGE_ADJUSTMENT_CENTS,
        ));
    }

    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::property::{Listing, ListingKind, PropertyAttributes};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn subject() -> SubjectProperty {
        SubjectProperty::new(Uuid::new_v4(), ListingKind::Sale)
            .with_location(40.0, -3.0)
            .with_attributes(PropertyAttributes {
                property_type: Some("apartment".into()),
                bedrooms: 3,
                bathrooms: 2.0,
                constructed_area: 100.0,
                year_built: 2010,
                garages: 1,
            })
    }

    fn twin_candidate(price_cents: i64) -> ComparableCandidate {
        ComparableCandidate::new(
            Uuid::new_v4(),
            Listing::Sale {
                price_cents: Some(price_cents),
            },
        )
        .with_location(40.0, -3.0)
        .with_attributes(PropertyAttributes {
            property_type: Some("apartment".into()),
            bedrooms: 3,
            bathrooms: 2.0,
            constructed_area: 100.0,
            year_built: 2010,
            garages: 1,
        })
    }

    #[test]
    fn identical_candidate_scores_100_with_no_adjustments() {
        let subject = subject();
        let outcome =
            ComparablesFinder::new().find(&subject, &[twin_candidate(300_000)], &SearchOptions::default());

        assert_eq!(outcome.total_found, 1);
        assert_eq!(outcome.comparables.len(), 1);
        let comp = &outcome.comparables[0];
        assert_eq!(comp.similarity_score, 100.0);
        assert_eq!(comp.distance_km, Some(0.0));
        assert!(comp.adjustments.is_empty());
        assert_eq!(comp.adjusted_price_cents, Some(300_000));
    }

    #[test]
    fn bedroom_adjustment_is_positive_when_subject_is_larger() {
        let subject = subject();
        let mut candidate = twin_candidate(300_000);
        candidate.attributes.bedrooms = 2;

        let outcome = ComparablesFinder::new().find(&subject, &[candidate], &SearchOptions::default());
        let comp = &outcome.comparables[0];
        let bedroom = comp
            .adjustments
            .iter()
            .find(|a| a.category == AdjustmentCategory::Bedrooms)
            .unwrap();
        assert_eq!(bedroom.difference, 1.0);
        assert_eq!(bedroom.amount_cents, 1_500_000);
        assert_eq!(comp.adjusted_price_cents, Some(1_800_000));
    }

    #[test]
    fn trivial_differences_produce_no_adjustment() {
        let subject = subject();
        let mut candidate = twin_candidate(300_000);
        candidate.attributes.constructed_area = 95.0; // |delta| <= 10
        candidate.attributes.year_built = 2007; // |delta| <= 5
        candidate.attributes.bathrooms = 2.4; // |delta| < 0.5

        let outcome = ComparablesFinder::new().find(&subject, &[candidate], &SearchOptions::default());
        assert!(outcome.comparables[0].adjustments.is_empty());
    }

    #[test]
    fn missing_price_yields_no_adjusted_price() {
        let subject = subject();
        let candidate =
            ComparableCandidate::new(Uuid::new_v4(), Listing::Sale { price_cents: None })
                .with_location(40.0, -3.0)
                .with_attributes(twin_candidate(0).attributes.clone());

        let outcome = ComparablesFinder::new().find(&subject, &[candidate], &SearchOptions::default());
        assert_eq!(outcome.comparables[0].adjusted_price_cents, None);
    }

    #[test]
    fn cap_returns_highest_scored() {
        let subject = subject();
        let pool: Vec<ComparableCandidate> = (0..10)
            .map(|i| {
                let mut candidate = twin_candidate(300_000);
                // Increasing year gap degrades the score monotonically
                candidate.attributes.year_built = 2010 - i;
                candidate
            })
            .collect();

        let options = SearchOptions::default().with_max_comparables(3);
        let outcome = ComparablesFinder::new().find(&subject, &pool, &options);

        assert_eq!(outcome.total_found, 10);
        assert_eq!(outcome.comparables.len(), 3);
        let scores: Vec<f64> = outcome
            .comparables
            .iter()
            .map(|c| c.similarity_score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(scores[0], 100.0);
    }

    #[test]
    fn threshold_discards_low_scores_but_counts_them() {
        let subject = subject();
        let mut far = twin_candidate(300_000);
        // Inside the 2 km box but far enough to cost distance points
        far.location = Some(crate::types::property::GeoPoint::new(40.015, -3.0));

        let options = SearchOptions::default().with_min_similarity_score(99.0);
        let outcome = ComparablesFinder::new().find(&subject, &[twin_candidate(1), far], &options);

        assert_eq!(outcome.total_found, 2);
        assert_eq!(outcome.comparables.len(), 1);
    }

    #[test]
    fn hard_filters_exclude_unsuitable_candidates() {
        let subject = subject();

        let mut own_identity = twin_candidate(300_000);
        own_identity.id = subject.id;

        let hidden = twin_candidate(300_000).with_visible(false);

        let rental = ComparableCandidate::new(
            Uuid::new_v4(),
            Listing::Rental {
                price_cents: Some(120_000),
            },
        )
        .with_location(40.0, -3.0)
        .with_attributes(twin_candidate(0).attributes.clone());

        let mut too_small = twin_candidate(300_000);
        too_small.attributes.constructed_area = 50.0;

        let mut too_many_bedrooms = twin_candidate(300_000);
        too_many_bedrooms.attributes.bedrooms = 5;

        let mut wrong_type = twin_candidate(300_000);
        wrong_type.attributes.property_type = Some("villa".into());

        let mut outside_box = twin_candidate(300_000);
        outside_box.location = Some(crate::types::property::GeoPoint::new(41.0, -3.0));

        let pool = vec![
            own_identity,
            hidden,
            rental,
            too_small,
            too_many_bedrooms,
            wrong_type,
            outside_box,
            twin_candidate(300_000),
        ];
        let outcome = ComparablesFinder::new().find(&subject, &pool, &SearchOptions::default());
        assert_eq!(outcome.total_found, 1);
        assert_eq!(outcome.comparables.len(), 1);
    }

    #[test]
    fn criteria_are_reported() {
        let subject = subject();
        let outcome = ComparablesFinder::new().find(&subject, &[], &SearchOptions::default());
        assert_eq!(outcome.search_criteria["radius_km"], serde_json::json!(2.0));
        assert_eq!(outcome.search_criteria["months_back"], serde_json::json!(6));
    }

    proptest! {
        #[test]
        fn similarity_score_stays_in_bounds(
            bedrooms in 2i32..=4,
            bathrooms in 0.0f64..6.0,
            area in 70.0f64..130.0,
            year in 1900i32..2030,
            lat in 39.99f64..40.01,
            lon in -3.01f64..-2.99,
        ) {
            let subject = subject();
            let candidate = ComparableCandidate::new(
                Uuid::new_v4(),
                Listing::Sale { price_cents: Some(300_000) },
            )
            .with_location(lat, lon)
            .with_attributes(PropertyAttributes {
                property_type: Some("apartment".into()),
                bedrooms,
                bathrooms,
                constructed_area: area,
                year_built: year,
                garages: 0,
            });

            let options = SearchOptions::default().with_min_similarity_score(0.0);
            let outcome = ComparablesFinder::new().find(&subject, &[candidate], &options);
            for comp in &outcome.comparables {
                prop_assert!(comp.similarity_score >= 0.0);
                prop_assert!(comp.similarity_score <= 100.0);
            }
        }
    }
}
