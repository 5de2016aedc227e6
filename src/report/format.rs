//! Formatted terminal output.
//!
//! We keep formatting code in one place so the search and parsing code stays
//! free of presentation concerns.

use crate::domain::{DistributionSummary, Grade, SemesterLabel};
use crate::service::{AccessResponse, GradesResponse};

const BAR_WIDTH: usize = 30;

/// Render a grades response as a per-term report.
pub fn format_grades(course: &str, response: &GradesResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== gradestat - {} ===\n", course.trim()));

    if let Some(code) = response.error {
        out.push_str(&format!("No distribution found ({code}).\n"));
        return out;
    }

    out.push_str(&format!("Terms with data: {}\n", response.iterations.len()));
    for it in &response.iterations {
        out.push('\n');
        out.push_str(&format!("{} ({})\n", it.semester, it.course_id));
        out.push_str(&format_summary(&it.data));
    }
    out
}

/// Summary line plus one bar per grade.
pub fn format_summary(summary: &DistributionSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  n={} | average={:.2} | pass rate={:.1}%\n",
        summary.total, summary.average, summary.pass_rate
    ));

    let max = summary.counts.iter().map(|(_, c)| c).max().unwrap_or(0);
    for grade in Grade::ALL {
        let count = summary.counts.get(grade);
        out.push_str(&format!("  {:>3} {:>5} {}\n", grade.symbol(), count, bar(count, max)));
    }
    out
}

pub fn format_semesters(labels: &[SemesterLabel]) -> String {
    labels.iter().map(|l| format!("{l}\n")).collect()
}

pub fn format_access(url: &str, response: &AccessResponse) -> String {
    match response.error {
        Some(code) => format!("{url}: check failed ({code})\n"),
        None if response.online_access => format!("{url}: online access available\n"),
        None => format!("{url}: no online access\n"),
    }
}

fn bar(count: u32, max: u32) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count as usize * BAR_WIDTH).div_ceil(max as usize);
    "#".repeat(width)
}
