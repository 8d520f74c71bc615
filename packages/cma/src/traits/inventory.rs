//! Candidate inventory trait: the read-only source of comparable
//! candidates.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::pipeline::geo::BoundingBox;
use crate::types::config::SearchOptions;
use crate::types::property::{ComparableCandidate, ListingKind, SubjectProperty};

/// Coarse pre-filter pushed down to the inventory backend.
///
/// The finder re-checks every condition exactly, so a backend is free to
/// apply these loosely (or not at all) and return a superset.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    /// Geographic bounding box, when the subject has coordinates
    pub bounding_box: Option<BoundingBox>,

    /// Exact property-type key, when the subject declares one
    pub property_type: Option<String>,

    pub listing_kind: ListingKind,

    /// [0.7x, 1.3x] of the subject's area, when positive
    pub area_band: Option<(f64, f64)>,

    /// Subject bedrooms +/- 1, when subject bedrooms > 0
    pub bedroom_band: Option<(i32, i32)>,

    /// The subject itself never qualifies as its own comparable
    pub exclude_id: Uuid,
}

impl CandidateQuery {
    /// Build the query for a subject and search options.
    pub fn for_subject(subject: &SubjectProperty, options: &SearchOptions) -> Self {
        let bounding_box = subject
            .location
            .map(|center| BoundingBox::around(center, options.radius_km));
        let area = subject.attributes.constructed_area;
        let area_band = (area > 0.0).then_some((area * 0.7, area * 1.3));
        let bedrooms = subject.attributes.bedrooms;
        let bedroom_band = (bedrooms > 0).then_some((bedrooms - 1, bedrooms + 1));
        Self {
            bounding_box,
            property_type: subject.attributes.property_type.clone(),
            listing_kind: subject.listing_kind,
            area_band,
            bedroom_band,
            exclude_id: subject.id,
        }
    }
}

/// Read-only access to a tenant's property inventory.
#[async_trait]
pub trait CandidateInventory: Send + Sync {
    /// Fetch candidate comparables for a website, pre-filtered by the
    /// query where the backend supports it.
    async fn candidates(
        &self,
        website_id: Uuid,
        query: &CandidateQuery,
    ) -> Result<Vec<ComparableCandidate>>;
}

#[async_trait]
impl<T: CandidateInventory + ?Sized> CandidateInventory for std::sync::Arc<T> {
    async fn candidates(
        &self,
        website_id: Uuid,
        query: &CandidateQuery,
    ) -> Result<Vec<ComparableCandidate>> {
        (**self).candidates(website_id, query).await
    }
}
