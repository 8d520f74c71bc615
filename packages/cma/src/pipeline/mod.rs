//! The CMA generation pipeline.
//!
//! Data flows strictly downstream: subject -> comparables -> statistics
//! -> narrative -> report.
//!
//! - [`geo`] - great-circle distance and bounding boxes
//! - [`finder`] - comparable filtering, scoring, and adjustments
//! - [`stats`] - market statistics
//! - [`prompts`] - narrative prompt construction
//! - [`narrative`] - text-generation invocation and response parsing
//! - [`orchestrator`] - report lifecycle and failure policy

pub mod finder;
pub mod geo;
pub mod narrative;
pub mod orchestrator;
pub mod prompts;
pub mod stats;

pub use finder::{ComparablesFinder, FinderOutcome};
pub use narrative::{extract_json_block, AiInsightsResponse, NarrativeGenerator, NarrativeOutcome};
pub use orchestrator::{GenerationOutcome, ReportOrchestrator};
pub use prompts::{format_insights_prompt, price_anchors, prompt_hash, CMA_INSIGHTS_PROMPT};
pub use stats::StatisticsCalculator;
