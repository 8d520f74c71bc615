//! Report orchestration: drives a report through comparable search,
//! statistics, and narrative generation with partial-failure tolerance.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::pipeline::finder::ComparablesFinder;
use crate::pipeline::narrative::{NarrativeGenerator, NarrativeOutcome};
use crate::pipeline::stats::StatisticsCalculator;
use crate::traits::inventory::{CandidateInventory, CandidateQuery};
use crate::traits::renderer::DocumentRenderer;
use crate::traits::store::{AuditSink, ReportStore};
use crate::traits::textgen::TextGenerator;
use crate::types::comparable::ScoredComparable;
use crate::types::config::SearchOptions;
use crate::types::insights::NarrativeInsights;
use crate::types::property::SubjectProperty;
use crate::types::report::Report;
use crate::types::statistics::MarketStatistics;

const EMPTY_RESULT_MESSAGE: &str =
    "No comparable properties were found for the given search criteria";

/// Result of one generation attempt.
///
/// `success: false` with a completed report means the narrative step
/// failed but the computed comparables and statistics were kept.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub success: bool,
    pub report: Report,
    pub comparables: Vec<ScoredComparable>,
    pub statistics: Option<MarketStatistics>,
    pub insights: Option<NarrativeInsights>,

    /// Informational note for valid-but-empty outcomes
    pub message: Option<String>,

    pub error: Option<String>,
}

impl GenerationOutcome {
    fn failure(report: Report, error: String) -> Self {
        Self {
            success: false,
            report,
            comparables: Vec::new(),
            statistics: None,
            insights: None,
            message: None,
            error: Some(error),
        }
    }
}

/// Owns the report lifecycle end to end.
///
/// Each invocation creates its own report and drives it `draft` ->
/// `generating` -> `completed`; any failure inside the guarded region
/// rolls the report back to `draft` so a retry reuses it. A report is
/// never left in `generating`.
pub struct ReportOrchestrator<I, S, G, R>
where
    I: CandidateInventory,
    S: ReportStore + AuditSink + Clone,
    G: TextGenerator,
    R: DocumentRenderer,
{
    inventory: I,
    store: S,
    narrative: NarrativeGenerator<G, S>,
    renderer: R,
    finder: ComparablesFinder,
    statistics: StatisticsCalculator,
    currency: String,
}

impl<I, S, G, R> ReportOrchestrator<I, S, G, R>
where
    I: CandidateInventory,
    S: ReportStore + AuditSink + Clone,
    G: TextGenerator,
    R: DocumentRenderer,
{
    pub fn new(inventory: I, store: S, textgen: G, renderer: R) -> Self {
        let narrative = NarrativeGenerator::new(textgen, store.clone());
        Self {
            inventory,
            store,
            narrative,
            renderer,
            finder: ComparablesFinder::new(),
            statistics: StatisticsCalculator::new(),
            currency: "EUR".to_string(),
        }
    }

    /// Set the report currency (ISO 4217). Default: EUR.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the text-generation model for the narrative step.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.narrative = self.narrative.with_model(model);
        self
    }

    /// Generate a CMA report for a subject.
    ///
    /// Systemic narrative errors (missing credentials, rate limits)
    /// propagate as `Err` after the report is rolled back to draft, so
    /// the caller can retry. All other failures return a structured
    /// outcome.
    pub async fn generate(
        &self,
        subject: &SubjectProperty,
        website_id: Uuid,
        user_id: Option<Uuid>,
        options: &SearchOptions,
    ) -> Result<GenerationOutcome> {
        let mut report = Report::draft(
            subject,
            website_id,
            user_id,
            options.radius_km,
            &self.currency,
        );
        self.store.insert_report(&report).await?;

        report.mark_generating();
        self.store.update_report(&report).await?;
        info!(report_id = %report.id, subject_id = %subject.id, "report generation started");

        match self
            .run_pipeline(&mut report, subject, website_id, options)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                report.reset_to_draft();
                if let Err(store_err) = self.store.update_report(&report).await {
                    warn!(report_id = %report.id, error = %store_err, "rollback persistence failed");
                }
                if err.is_systemic() {
                    warn!(report_id = %report.id, error = %err, "systemic failure, report reset for retry");
                    Err(err)
                } else {
                    error!(report_id = %report.id, error = %err, "report generation failed");
                    Ok(GenerationOutcome::failure(report, err.to_string()))
                }
            }
        }
    }

    /// Steps 3-6 of the generation algorithm; the guarded region.
    async fn run_pipeline(
        &self,
        report: &mut Report,
        subject: &SubjectProperty,
        website_id: Uuid,
        options: &SearchOptions,
    ) -> Result<GenerationOutcome> {
        let query = CandidateQuery::for_subject(subject, options);
        let pool = self.inventory.candidates(website_id, &query).await?;
        let found = self.finder.find(subject, &pool, options);

        if found.comparables.is_empty() {
            // A valid terminal outcome, not a failure
            report.mark_completed();
            self.store.update_report(report).await?;
            info!(report_id = %report.id, pool = pool.len(), "completed with no comparables");
            return Ok(GenerationOutcome {
                success: true,
                report: report.clone(),
                comparables: Vec::new(),
                statistics: None,
                insights: None,
                message: Some(EMPTY_RESULT_MESSAGE.to_string()),
                error: None,
            });
        }

        let statistics =
            self.statistics
                .calculate(&found.comparables, subject, &self.currency);

        let narrative = self
            .narrative
            .generate(report, &found.comparables, &statistics)
            .await?;

        report.comparable_properties = found.comparables.clone();
        report.market_statistics = Some(statistics.clone());

        let (success, insights, narrative_error) = match narrative {
            NarrativeOutcome::Generated {
                insights,
                suggested_price,
            } => {
                report.ai_insights = Some(insights.clone());
                report.suggested_price = Some(suggested_price);
                (true, Some(insights), None)
            }
            // Degraded but usable: comparables and statistics are kept
            NarrativeOutcome::Failed { error } => (false, None, Some(error)),
        };

        report.mark_completed();
        self.store.update_report(report).await?;

        if let Err(err) = self
            .renderer
            .enqueue_render(report.id, report.website_id)
            .await
        {
            warn!(report_id = %report.id, error = %err, "render enqueue failed, report unaffected");
        }

        info!(
            report_id = %report.id,
            comparables = found.comparables.len(),
            total_found = found.total_found,
            success,
            "report generation finished"
        );

        Ok(GenerationOutcome {
            success,
            report: report.clone(),
            comparables: found.comparables,
            statistics: Some(statistics),
            insights,
            message: None,
            error: narrative_error,
        })
    }
}
