//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::inventory::{CandidateInventory, CandidateQuery};
use crate::traits::store::{AuditEntry, AuditSink, ReportStore};
use crate::types::property::ComparableCandidate;
use crate::types::report::Report;

/// In-memory reports, audit entries, and candidate inventory.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    reports: RwLock<HashMap<Uuid, Report>>,
    audits: RwLock<Vec<AuditEntry>>,
    candidates: RwLock<HashMap<Uuid, Vec<ComparableCandidate>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed inventory candidates for a website.
    pub fn seed_candidates(&self, website_id: Uuid, candidates: Vec<ComparableCandidate>) {
        self.candidates
            .write()
            .unwrap()
            .entry(website_id)
            .or_default()
            .extend(candidates);
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.reports.write().unwrap().clear();
        self.audits.write().unwrap().clear();
        self.candidates.write().unwrap().clear();
    }

    /// Get the number of stored reports.
    pub fn report_count(&self) -> usize {
        self.reports.read().unwrap().len()
    }

    /// Snapshot of all stored reports, in arbitrary order.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.read().unwrap().values().cloned().collect()
    }

    /// Snapshot of all recorded audit entries, in insertion order.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audits.read().unwrap().clone()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert_report(&self, report: &Report) -> Result<()> {
        self.reports
            .write()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    async fn update_report(&self, report: &Report) -> Result<()> {
        self.reports
            .write()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.read().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl AuditSink for MemoryStore {
    async fn record_audit(&self, entry: &AuditEntry) -> Result<()> {
        self.audits.write().unwrap().push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl CandidateInventory for MemoryStore {
    async fn candidates(
        &self,
        website_id: Uuid,
        query: &CandidateQuery,
    ) -> Result<Vec<ComparableCandidate>> {
        let store = self.candidates.read().unwrap();
        let pool = store.get(&website_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(pool
            .iter()
            .filter(|candidate| matches_query(candidate, query))
            .cloned()
            .collect())
    }
}

/// Coarse pre-filter matching the pushed-down query; the finder
/// re-checks everything exactly.
fn matches_query(candidate: &ComparableCandidate, query: &CandidateQuery) -> bool {
    if candidate.id == query.exclude_id || !candidate.visible {
        return false;
    }
    if candidate.listing.kind() != query.listing_kind {
        return false;
    }
    if let Some(bbox) = &query.bounding_box {
        match candidate.location {
            Some(point) if bbox.contains(point) => {}
            _ => return false,
        }
    }
    if let Some(property_type) = query.property_type.as_deref() {
        if candidate.attributes.property_type.as_deref() != Some(property_type) {
            return false;
        }
    }
    if let Some((min_area, max_area)) = query.area_band {
        let area = candidate.attributes.constructed_area;
        if area < min_area || area > max_area {
            return false;
        }
    }
    if let Some((min_bedrooms, max_bedrooms)) = query.bedroom_band {
        let bedrooms = candidate.attributes.bedrooms;
        if bedrooms < min_bedrooms || bedrooms > max_bedrooms {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::SearchOptions;
    use crate::types::property::{Listing, ListingKind, PropertyAttributes, SubjectProperty};

    fn sale_candidate(bedrooms: i32) -> ComparableCandidate {
        ComparableCandidate::new(
            Uuid::new_v4(),
            Listing::Sale {
                price_cents: Some(250_000),
            },
        )
        .with_location(40.0, -3.0)
        .with_attributes(PropertyAttributes {
            bedrooms,
            constructed_area: 100.0,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn report_round_trip() {
        let store = MemoryStore::new();
        let subject = SubjectProperty::new(Uuid::new_v4(), ListingKind::Sale);
        let report = Report::draft(&subject, Uuid::new_v4(), None, 2.0, "EUR");

        store.insert_report(&report).await.unwrap();
        assert_eq!(store.report_count(), 1);

        let mut updated = report.clone();
        updated.mark_generating();
        store.update_report(&updated).await.unwrap();

        let fetched = store.get_report(report.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, updated.status);
    }

    #[tokio::test]
    async fn inventory_filters_by_query_and_website() {
        let store = MemoryStore::new();
        let website = Uuid::new_v4();
        let other_website = Uuid::new_v4();
        store.seed_candidates(website, vec![sale_candidate(3), sale_candidate(6)]);
        store.seed_candidates(other_website, vec![sale_candidate(3)]);

        let subject = SubjectProperty::new(Uuid::new_v4(), ListingKind::Sale)
            .with_location(40.0, -3.0)
            .with_attributes(PropertyAttributes {
                bedrooms: 3,
                constructed_area: 100.0,
                ..Default::default()
            });
        let query = CandidateQuery::for_subject(&subject, &SearchOptions::default());

        let results = store.candidates(website, &query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].attributes.bedrooms, 3);

        let empty = store
            .candidates(Uuid::new_v4(), &query)
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
