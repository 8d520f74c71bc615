//! The persisted CMA report entity and its status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comparable::ScoredComparable;
use super::insights::{NarrativeInsights, SuggestedPriceRange};
use super::property::{ListingKind, SubjectProperty};
use super::statistics::MarketStatistics;

/// Report lifecycle status.
///
/// `Draft` -> `Generating` -> `Completed`; any failure during generation
/// rolls back to `Draft` so a retry reuses the same report instead of
/// creating a duplicate. A report is never left in `Generating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Generating,
    Completed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Generating => "generating",
            ReportStatus::Completed => "completed",
        }
    }
}

/// Branding carried onto the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub agency_name: Option<String>,
    pub agent_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

/// Snapshot of the subject's attributes at generation time.
///
/// The report must stay meaningful even if the subject property is later
/// edited or deleted, so the relevant fields are copied rather than
/// referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub constructed_area: f64,
    pub year_built: i32,
    pub garages: i32,
    pub listing_kind: ListingKind,
}

impl SubjectSnapshot {
    pub fn of(subject: &SubjectProperty) -> Self {
        Self {
            street: subject.address.street.clone(),
            city: subject.address.city.clone(),
            region: subject.address.region.clone(),
            postal_code: subject.address.postal_code.clone(),
            country: subject.address.country.clone(),
            latitude: subject.location.map(|p| p.latitude),
            longitude: subject.location.map(|p| p.longitude),
            property_type: subject.attributes.property_type.clone(),
            bedrooms: subject.attributes.bedrooms,
            bathrooms: subject.attributes.bathrooms,
            constructed_area: subject.attributes.constructed_area,
            year_built: subject.attributes.year_built,
            garages: subject.attributes.garages,
            listing_kind: subject.listing_kind,
        }
    }
}

/// The persisted CMA report; the only persisted entity in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub website_id: Uuid,
    pub user_id: Option<Uuid>,
    pub subject_property_id: Uuid,

    /// Fixed to "cma" in this pipeline
    pub kind: String,

    pub title: String,
    pub status: ReportStatus,

    // Denormalized for query convenience
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,

    pub search_radius_km: f64,
    pub subject_snapshot: SubjectSnapshot,
    pub branding: Branding,

    pub comparable_properties: Vec<ScoredComparable>,
    pub market_statistics: Option<MarketStatistics>,
    pub ai_insights: Option<NarrativeInsights>,
    pub suggested_price: Option<SuggestedPriceRange>,
    pub currency: String,

    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create a fresh draft report for a subject.
    pub fn draft(
        subject: &SubjectProperty,
        website_id: Uuid,
        user_id: Option<Uuid>,
        search_radius_km: f64,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let address_line = subject.address.display_line();
        let title = if address_line.is_empty() {
            "Comparative Market Analysis".to_string()
        } else {
            format!("Comparative Market Analysis - {address_line}")
        };
        Self {
            id: Uuid::new_v4(),
            website_id,
            user_id,
            subject_property_id: subject.id,
            kind: "cma".to_string(),
            title,
            status: ReportStatus::Draft,
            city: subject.address.city.clone(),
            region: subject.address.region.clone(),
            postal_code: subject.address.postal_code.clone(),
            search_radius_km,
            subject_snapshot: SubjectSnapshot::of(subject),
            branding: Branding::default(),
            comparable_properties: Vec::new(),
            market_statistics: None,
            ai_insights: None,
            suggested_price: None,
            currency: currency.into(),
            generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Transition into `Generating` before comparable search starts.
    pub fn mark_generating(&mut self) {
        self.status = ReportStatus::Generating;
        self.updated_at = Utc::now();
    }

    /// Transition into `Completed` after results are persisted; records
    /// the generation timestamp.
    pub fn mark_completed(&mut self) {
        self.status = ReportStatus::Completed;
        let now = Utc::now();
        self.generated_at = Some(now);
        self.updated_at = now;
    }

    /// Roll back to `Draft` so the same report can be retried.
    pub fn reset_to_draft(&mut self) {
        self.status = ReportStatus::Draft;
        self.updated_at = Utc::now();
    }
}
