//! Market statistics over a scored comparable set.

use tracing::debug;

use crate::types::comparable::ScoredComparable;
use crate::types::property::SubjectProperty;
use crate::types::statistics::{MarketStatistics, PriceRange};

/// Computes aggregate statistics for the comparables found by the
/// finder.
///
/// Raw and adjusted prices are extracted independently; a comparable
/// missing one does not disqualify the other. Every aggregate is `None`
/// when its input set is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        comparables: &[ScoredComparable],
        subject: &SubjectProperty,
        currency: &str,
    ) -> MarketStatistics {
        let raw_prices: Vec<i64> = comparables.iter().filter_map(|c| c.price_cents()).collect();
        let adjusted_prices: Vec<i64> = comparables
            .iter()
            .filter_map(|c| c.adjusted_price_cents.filter(|p| *p > 0))
            .collect();

        let price_per_area_cents = mean_ratio(comparables.iter().filter_map(|c| {
            let price = c.price_cents()?;
            let area = positive_area(c)?;
            Some(price as f64 / area)
        }))
        .map(|r| r.round() as i64);

        let price_range = match (raw_prices.iter().min(), raw_prices.iter().max()) {
            (Some(&min), Some(&max)) => Some(PriceRange {
                min_cents: min,
                max_cents: max,
                spread_cents: max - min,
            }),
            _ => None,
        };

        let average_similarity_score = if comparables.is_empty() {
            None
        } else {
            let sum: f64 = comparables.iter().map(|c| c.similarity_score).sum();
            Some((sum / comparables.len() as f64 * 10.0).round() / 10.0)
        };

        let estimated_subject_value_cents =
            estimate_subject_value(comparables, subject.attributes.constructed_area);

        let statistics = MarketStatistics {
            comparable_count: comparables.len(),
            average_price_cents: mean(&raw_prices),
            median_price_cents: median(&raw_prices),
            average_adjusted_price_cents: mean(&adjusted_prices),
            median_adjusted_price_cents: median(&adjusted_prices),
            price_per_area_cents,
            price_range,
            price_std_deviation_cents: std_deviation(&raw_prices),
            average_similarity_score,
            estimated_subject_value_cents,
            currency: currency.to_string(),
        };

        debug!(
            comparables = statistics.comparable_count,
            raw_prices = raw_prices.len(),
            adjusted_prices = adjusted_prices.len(),
            "market statistics computed"
        );

        statistics
    }
}

fn positive_area(comparable: &ScoredComparable) -> Option<f64> {
    let area = comparable.candidate.attributes.constructed_area;
    (area > 0.0).then_some(area)
}

fn mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some((sum as f64 / values.len() as f64).round() as i64)
}

/// Sorted middle element, or the rounded average of the two middle
/// elements for even-sized lists.
fn median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(((sorted[mid - 1] + sorted[mid]) as f64 / 2.0).round() as i64)
    }
}

/// Mean of a ratio stream.
fn mean_ratio(ratios: impl Iterator<Item = f64>) -> Option<f64> {
    let ratios: Vec<f64> = ratios.collect();
    if ratios.is_empty() {
        return None;
    }
    let sum: f64 = ratios.iter().sum();
    Some(sum / ratios.len() as f64)
}

/// Sample standard deviation (N-1 divisor); needs at least two points.
fn std_deviation(values: &[i64]) -> Option<i64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<i64>() as f64 / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    Some(variance.sqrt().round() as i64)
}

/// Adjusted average price-per-area times the subject's own area.
///
/// Requires at least one comparable with both a positive adjusted price
/// and a positive area, and a positive subject area.
fn estimate_subject_value(comparables: &[ScoredComparable], subject_area: f64) -> Option<i64> {
    if subject_area <= 0.0 {
        return None;
    }
    let per_area = mean_ratio(comparables.iter().filter_map(|c| {
        let adjusted = c.adjusted_price_cents.filter(|p| *p > 0)?;
        let area = positive_area(c)?;
        Some(adjusted as f64 / area)
    }))?;
    Some((per_area * subject_area).round() as i64)
}
