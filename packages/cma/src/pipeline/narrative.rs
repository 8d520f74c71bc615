//! Narrative-insights generation: prompt the external text-generation
//! service and parse its JSON response into typed insights.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::prompts::{format_insights_prompt, price_anchors, prompt_hash};
use crate::traits::store::{AuditEntry, AuditSink};
use crate::traits::textgen::TextGenerator;
use crate::types::comparable::ScoredComparable;
use crate::types::insights::{ConfidenceLevel, NarrativeInsights, SuggestedPriceRange};
use crate::types::report::Report;
use crate::types::statistics::MarketStatistics;

const DEFAULT_MODEL: &str = "gpt-4o";
const AUDIT_KIND: &str = "cma_insights";

/// Outcome of one narrative attempt.
///
/// Parse and generic provider failures land in `Failed` so the report
/// can still complete without a narrative; config and rate-limit errors
/// are raised instead (see [`NarrativeGenerator::generate`]).
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Generated {
        insights: NarrativeInsights,
        suggested_price: SuggestedPriceRange,
    },
    Failed {
        error: String,
    },
}

/// Raw JSON shape expected from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsightsResponse {
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub market_position: String,
    #[serde(default)]
    pub pricing_rationale: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub considerations: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub time_to_sell_estimate: String,
    #[serde(default)]
    pub suggested_price_low_cents: i64,
    #[serde(default)]
    pub suggested_price_high_cents: i64,
    #[serde(default)]
    pub confidence_level: String,
}

/// Generates narrative insights for a report.
pub struct NarrativeGenerator<G: TextGenerator, A: AuditSink> {
    textgen: G,
    audit: A,
    model: String,
}

impl<G: TextGenerator, A: AuditSink> NarrativeGenerator<G, A> {
    pub fn new(textgen: G, audit: A) -> Self {
        Self {
            textgen,
            audit,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prompt the text-generation service and parse the response.
    ///
    /// Every attempt records an audit entry, successful or not. Config
    /// and rate-limit errors propagate as `Err` because they are
    /// systemic; malformed responses and other provider failures return
    /// `Ok(NarrativeOutcome::Failed)`.
    pub async fn generate(
        &self,
        report: &Report,
        comparables: &[ScoredComparable],
        statistics: &MarketStatistics,
    ) -> Result<NarrativeOutcome> {
        let prompt = format_insights_prompt(report, comparables, statistics);
        let (anchor_low, anchor_high) = price_anchors(statistics);
        let entry = AuditEntry::new(
            AUDIT_KIND,
            report.id,
            report.website_id,
            prompt_hash(&prompt),
            json!({
                "subject_property_id": report.subject_property_id,
                "comparable_count": comparables.len(),
                "anchor_low_cents": anchor_low,
                "anchor_high_cents": anchor_high,
                "currency": report.currency,
                "model": self.model,
            }),
        );

        let completion = match self.textgen.send(&prompt, &self.model).await {
            Ok(completion) => completion,
            Err(err) if err.is_systemic() => {
                self.record(entry.failed(err.to_string())).await;
                return Err(err.into());
            }
            Err(err) => {
                warn!(report_id = %report.id, error = %err, "narrative generation failed");
                let message = err.to_string();
                self.record(entry.failed(message.clone())).await;
                return Ok(NarrativeOutcome::Failed { error: message });
            }
        };

        let parsed = extract_json_block(&completion.content)
            .ok_or_else(|| "no JSON object found in model response".to_string())
            .and_then(|block| {
                serde_json::from_str::<AiInsightsResponse>(block).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(response) => {
                info!(report_id = %report.id, "narrative insights generated");
                self.record(entry.succeeded(completion.usage)).await;
                Ok(self.build_outcome(response, report, anchor_low, anchor_high))
            }
            Err(message) => {
                warn!(report_id = %report.id, error = %message, "narrative response unparseable");
                self.record(entry.failed(message.clone())).await;
                Ok(NarrativeOutcome::Failed { error: message })
            }
        }
    }

    fn build_outcome(
        &self,
        response: AiInsightsResponse,
        report: &Report,
        anchor_low: i64,
        anchor_high: i64,
    ) -> NarrativeOutcome {
        // The model may omit or zero out prices; the statistical anchors
        // remain the floor for the suggestion.
        let low = if response.suggested_price_low_cents > 0 {
            response.suggested_price_low_cents
        } else {
            anchor_low
        };
        let high = if response.suggested_price_high_cents > 0 {
            response.suggested_price_high_cents
        } else {
            anchor_high
        };

        let insights = NarrativeInsights {
            executive_summary: response.executive_summary,
            market_position: response.market_position,
            pricing_rationale: response.pricing_rationale,
            strengths: response.strengths,
            considerations: response.considerations,
            recommendation: response.recommendation,
            time_to_sell_estimate: response.time_to_sell_estimate,
            confidence_level: ConfidenceLevel::parse_lenient(&response.confidence_level),
        };
        NarrativeOutcome::Generated {
            insights,
            suggested_price: SuggestedPriceRange {
                low_cents: low,
                high_cents: high,
                currency: report.currency.clone(),
            },
        }
    }

    /// Audit recording must never mask the primary outcome.
    async fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.record_audit(&entry).await {
            warn!(error = %err, "failed to record generation audit entry");
        }
    }
}

/// Extract the first balanced `{...}` block from raw model output.
///
/// The model is not guaranteed to return only JSON; prose before or
/// after the object is tolerated. Braces inside JSON strings are
/// ignored.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
