//! Prompt construction for the narrative-insights step.

use sha2::{Digest, Sha256};

use crate::types::comparable::ScoredComparable;
use crate::types::report::{Report, SubjectSnapshot};
use crate::types::statistics::MarketStatistics;

/// Prompt for CMA narrative insights.
///
/// The anchor band is computed from the statistics before the call so the
/// model's numeric output stays consistent with the statistical baseline.
pub const CMA_INSIGHTS_PROMPT: &str = r#"You are a senior real-estate analyst writing a Comparative Market Analysis.

Subject property:
{subject}

Comparable properties:
{comparables}

Market statistics:
{statistics}

A statistical baseline suggests a listing price between {anchor_low} and {anchor_high} {currency} (minor currency units). Keep your suggested prices consistent with this baseline unless the comparables clearly justify otherwise.

Output a single JSON object:
{
    "executive_summary": "2-3 sentence overview of the subject's market position",
    "market_position": "where the subject sits relative to the comparables",
    "pricing_rationale": "how the comparables and adjustments support the price",
    "strengths": ["selling points of the subject"],
    "considerations": ["factors that may slow the sale or lower the price"],
    "recommendation": "recommended listing strategy",
    "time_to_sell_estimate": "e.g. '4-8 weeks'",
    "suggested_price_low_cents": integer,
    "suggested_price_high_cents": integer,
    "confidence_level": "high" | "medium" | "low"
}"#;

/// Deterministic price band anchoring the model's numeric output:
/// adjusted median +/- 5%, falling back to the raw median, else zero.
pub fn price_anchors(statistics: &MarketStatistics) -> (i64, i64) {
    let median = statistics
        .median_adjusted_price_cents
        .or(statistics.median_price_cents);
    match median {
        Some(median) => {
            let low = (median as f64 * 0.95).round() as i64;
            let high = (median as f64 * 1.05).round() as i64;
            (low, high)
        }
        None => (0, 0),
    }
}

/// Assemble the full insights prompt for a report.
pub fn format_insights_prompt(
    report: &Report,
    comparables: &[ScoredComparable],
    statistics: &MarketStatistics,
) -> String {
    let (anchor_low, anchor_high) = price_anchors(statistics);
    CMA_INSIGHTS_PROMPT
        .replace("{subject}", &format_subject(&report.subject_snapshot))
        .replace("{comparables}", &format_comparables(comparables))
        .replace("{statistics}", &format_statistics(statistics))
        .replace("{anchor_low}", &anchor_low.to_string())
        .replace("{anchor_high}", &anchor_high.to_string())
        .replace("{currency}", &report.currency)
}

/// Short hex digest of a prompt, recorded on audit entries.
pub fn prompt_hash(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

fn format_subject(snapshot: &SubjectSnapshot) -> String {
    let mut lines = Vec::new();
    let address: Vec<&str> = [
        snapshot.street.as_deref(),
        snapshot.city.as_deref(),
        snapshot.region.as_deref(),
        snapshot.postal_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !address.is_empty() {
        lines.push(format!("- Address: {}", address.join(", ")));
    }
    if let Some(property_type) = &snapshot.property_type {
        lines.push(format!("- Type: {property_type}"));
    }
    lines.push(format!(
        "- {} bedrooms, {} bathrooms, {} garage(s)",
        snapshot.bedrooms, snapshot.bathrooms, snapshot.garages
    ));
    if snapshot.constructed_area > 0.0 {
        lines.push(format!("- Constructed area: {}", snapshot.constructed_area));
    }
    if snapshot.year_built > 0 {
        lines.push(format!("- Year built: {}", snapshot.year_built));
    }
    lines.join("\n")
}

fn format_comparables(comparables: &[ScoredComparable]) -> String {
    comparables
        .iter()
        .enumerate()
        .map(|(i, comp)| {
            let c = &comp.candidate;
            let mut lines = vec![format!(
                "{}. {} (similarity {:.1})",
                i + 1,
                c.address.display_line(),
                comp.similarity_score
            )];
            if let Some(price) = comp.price_cents() {
                lines.push(format!("   Price: {price} cents"));
            }
            lines.push(format!(
                "   {} bed / {} bath, area {}, built {}",
                c.attributes.bedrooms,
                c.attributes.bathrooms,
                c.attributes.constructed_area,
                c.attributes.year_built
            ));
            if let Some(distance) = comp.distance_km {
                lines.push(format!("   Distance: {distance} km"));
            }
            for adjustment in &comp.adjustments {
                lines.push(format!(
                    "   Adjustment {}: {:+} cents (difference {})",
                    adjustment.category.as_str(),
                    adjustment.amount_cents,
                    adjustment.difference
                ));
            }
            if let Some(adjusted) = comp.adjusted_price_cents {
                lines.push(format!("   Adjusted price: {adjusted} cents"));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_statistics(statistics: &MarketStatistics) -> String {
    let mut lines = vec![format!(
        "- Comparables analyzed: {}",
        statistics.comparable_count
    )];
    let mut push = |label: &str, value: Option<i64>| {
        if let Some(v) = value {
            lines.push(format!("- {label}: {v} cents"));
        }
    };
    push("Average price", statistics.average_price_cents);
    push("Median price", statistics.median_price_cents);
    push(
        "Average adjusted price",
        statistics.average_adjusted_price_cents,
    );
    push(
        "Median adjusted price",
        statistics.median_adjusted_price_cents,
    );
    push("Price per area unit", statistics.price_per_area_cents);
    push(
        "Estimated subject value",
        statistics.estimated_subject_value_cents,
    );
    if let Some(range) = statistics.price_range {
        lines.push(format!(
            "- Price range: {} to {} cents",
            range.min_cents, range.max_cents
        ));
    }
    if let Some(score) = statistics.average_similarity_score {
        lines.push(format!("- Average similarity: {score:.1}"));
    }
    lines.join("\n")
}
