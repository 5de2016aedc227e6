//! Aggregation of raw grade counts into summary statistics.

use crate::domain::{DistributionSummary, GradeCounts};

/// Cohorts this small are not published as a distribution by the source.
pub const MIN_REPORTED_TOTAL: u64 = 4;

/// Build a summary, or `None` when the cohort is empty or too small (total <= 3).
pub fn summarize(counts: GradeCounts) -> Option<DistributionSummary> {
    let total = counts.total();
    if total < MIN_REPORTED_TOTAL {
        return None;
    }

    let n = total as f64;
    let points: i64 = counts
        .iter()
        .map(|(grade, count)| i64::from(grade.points()) * i64::from(count))
        .sum();
    let passed: u64 = counts
        .iter()
        .filter(|(grade, _)| grade.is_passing())
        .map(|(_, count)| u64::from(count))
        .sum();

    Some(DistributionSummary {
        counts,
        total,
        average: points as f64 / n,
        pass_rate: 100.0 * passed as f64 / n,
    })
}
