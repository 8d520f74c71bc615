//! Comparative Market Analysis (CMA) Generation Pipeline
//!
//! Given a subject property, this library locates comparable properties,
//! scores their similarity, computes price adjustments and market
//! statistics, invokes an external narrative-generation step, and drives
//! a persisted report through a small failure-tolerant state machine.
//!
//! # Design Philosophy
//!
//! - Fixed, interpretable scoring heuristics - no learned weights
//! - Comparables are read-only snapshots, never persisted as entities
//! - A narrative failure degrades the report, it never discards the
//!   already-computed comparables and statistics
//! - External collaborators (inventory, text generation, rendering,
//!   storage) stay behind traits; the library handles the pipeline, the
//!   app handles transport and persistence engines
//!
//! # Usage
//!
//! ```rust,ignore
//! use cma::{MemoryStore, ReportOrchestrator, SearchOptions};
//! use cma::testing::{MockRenderer, MockTextGenerator};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.seed_candidates(website_id, candidates);
//!
//! let orchestrator = ReportOrchestrator::new(
//!     store.clone(),
//!     store.clone(),
//!     MockTextGenerator::new().with_response(insights_json),
//!     MockRenderer::new(),
//! );
//!
//! let outcome = orchestrator
//!     .generate(&subject, website_id, None, &SearchOptions::default())
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (inventory, text generation, storage, rendering)
//! - [`types`] - Properties, comparables, statistics, insights, reports
//! - [`pipeline`] - Finder, statistics, narrative, and orchestration
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{CmaError, Result, TextGenError};
pub use traits::{
    inventory::{CandidateInventory, CandidateQuery},
    renderer::DocumentRenderer,
    store::{AuditEntry, AuditSink, AuditStatus, ReportStore},
    textgen::{Completion, TextGenerator, TokenUsage},
};
pub use types::{
    comparable::{Adjustment, AdjustmentCategory, ScoredComparable},
    config::SearchOptions,
    insights::{ConfidenceLevel, NarrativeInsights, SuggestedPriceRange},
    property::{
        Address, ComparableCandidate, GeoPoint, Listing, ListingKind, PropertyAttributes,
        SubjectProperty,
    },
    report::{Branding, Report, ReportStatus, SubjectSnapshot},
    statistics::{MarketStatistics, PriceRange},
};

// Re-export pipeline components
pub use pipeline::{
    geo::{haversine_km, BoundingBox},
    ComparablesFinder, FinderOutcome, GenerationOutcome, NarrativeGenerator, NarrativeOutcome,
    ReportOrchestrator, StatisticsCalculator,
};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "openai")]
pub use ai::OpenAiTextGenerator;
