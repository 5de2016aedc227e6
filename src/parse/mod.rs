//! Grade distribution extraction from a fetched statistics page.
//!
//! Pages are not consistent: some carry a well-formed table, some ship broken
//! markup, and some say outright that there is nothing to show. Extraction is
//! therefore layered:
//!
//! 1. negative markers ("no data", "not shown") short-circuit to `None`
//! 2. strategies are tried in order (`TreeStrategy`, then `ScanStrategy`);
//!    the first one that finds any grade count wins
//! 3. the counts go through `stats::summarize`, which suppresses tiny cohorts

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{DistributionSummary, Grade, GradeCounts};
use crate::stats::summarize;

pub mod scan;
pub mod tree;

pub use scan::ScanStrategy;
pub use tree::TreeStrategy;

static NEGATIVE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bno\s+data\b|\bingen\s+data\b|\bnot\s+(?:be\s+)?(?:shown|published)\b|\bvises\s+ikke\b",
    )
    .expect("negative marker pattern compiles")
});

/// Strategies in the order they are tried.
pub const STRATEGIES: &[&dyn ParseStrategy] = &[&TreeStrategy, &ScanStrategy];

/// One way of turning a document into table rows of cell text.
pub trait ParseStrategy: Sync {
    fn name(&self) -> &'static str;

    /// Cell texts per table row, in document order.
    fn rows(&self, document: &str) -> Vec<Vec<String>>;

    /// Grade counts across all rows; later rows overwrite earlier ones.
    fn counts(&self, document: &str) -> GradeCounts {
        self.rows(document)
            .iter()
            .flat_map(|cells| row_observations(cells))
            .collect()
    }
}

/// Parse one page into a summary.
///
/// Returns `None` when the page carries a negative marker, when no strategy
/// finds a count, or when the cohort is too small to be reported.
pub fn parse_distribution(document: &str) -> Option<DistributionSummary> {
    if has_negative_marker(document) {
        debug!("page carries a no-data marker");
        return None;
    }
    summarize(extract_counts(document))
}

/// Counts from the first strategy that finds anything (all zero if none do).
pub fn extract_counts(document: &str) -> GradeCounts {
    for strategy in STRATEGIES {
        let counts = strategy.counts(document);
        if !counts.is_empty() {
            return counts;
        }
        debug!(strategy = strategy.name(), "strategy found no grade counts");
    }
    GradeCounts::default()
}

pub fn has_negative_marker(document: &str) -> bool {
    NEGATIVE_MARKER_RE.is_match(document)
}

/// `(grade, count)` pairs found in one row.
///
/// Each cell that is exactly a grade symbol takes its count from the first
/// later cell in the row that contains digits.
pub fn row_observations(cells: &[String]) -> Vec<(Grade, u32)> {
    cells
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| {
            let grade = Grade::from_symbol(cell)?;
            let count = cells[idx + 1..].iter().find_map(|c| extract_count(c))?;
            Some((grade, count))
        })
        .collect()
}

/// Integer in a cell after dropping everything but digits and a leading minus.
///
/// Negative values clamp to 0; values too large for `u32` are treated as not a
/// number so the scan moves on.
pub fn extract_count(cell: &str) -> Option<u32> {
    let kept: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    let negative = kept.starts_with('-');
    let digits: String = kept
        .trim_start_matches('-')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    digits.parse().ok()
}
