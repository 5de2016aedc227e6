//! Shared domain types.
//!
//! Everything here is a value object: built once per request, never mutated
//! afterwards, and serializable so the service layer can hand it straight to
//! JSON.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One step on the 7-point grading scale.
///
/// `02` and `00` are distinct symbols; a plain `2` or `0` is not a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    Twelve,
    Ten,
    Seven,
    Four,
    Two,
    Zero,
    MinusThree,
}

impl Grade {
    /// Scale order, highest grade first.
    pub const ALL: [Grade; 7] = [
        Grade::Twelve,
        Grade::Ten,
        Grade::Seven,
        Grade::Four,
        Grade::Two,
        Grade::Zero,
        Grade::MinusThree,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Grade::Twelve => "12",
            Grade::Ten => "10",
            Grade::Seven => "7",
            Grade::Four => "4",
            Grade::Two => "02",
            Grade::Zero => "00",
            Grade::MinusThree => "-3",
        }
    }

    /// Point value used for the weighted average.
    pub fn points(self) -> i32 {
        match self {
            Grade::Twelve => 12,
            Grade::Ten => 10,
            Grade::Seven => 7,
            Grade::Four => 4,
            Grade::Two => 2,
            Grade::Zero => 0,
            Grade::MinusThree => -3,
        }
    }

    /// Only strictly positive point values count as passed; `00` does not.
    pub fn is_passing(self) -> bool {
        self.points() > 0
    }

    /// Exact symbol match after removing all whitespace.
    pub fn from_symbol(text: &str) -> Option<Grade> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        Grade::ALL.into_iter().find(|g| g.symbol() == compact)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Student count per grade. All seven grades are always present (default 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradeCounts {
    counts: [u32; 7],
}

impl GradeCounts {
    pub fn get(&self, grade: Grade) -> u32 {
        self.counts[grade.index()]
    }

    /// Widened so that large counts cannot overflow the sum.
    pub fn total(&self) -> u64 {
        self.counts.iter().copied().map(u64::from).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(grade, count)` pairs in scale order.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, u32)> + '_ {
        Grade::ALL.into_iter().map(|g| (g, self.get(g)))
    }
}

/// Folds observations in order; a later observation of the same grade replaces
/// the earlier one.
impl FromIterator<(Grade, u32)> for GradeCounts {
    fn from_iter<I: IntoIterator<Item = (Grade, u32)>>(iter: I) -> Self {
        let mut counts = [0u32; 7];
        for (grade, count) in iter {
            counts[grade.index()] = count;
        }
        Self { counts }
    }
}

impl Serialize for GradeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Grade::ALL.len()))?;
        for (grade, count) in self.iter() {
            map.serialize_entry(grade.symbol(), &count)?;
        }
        map.end()
    }
}

/// Aggregated statistics for one course offering in one term.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub counts: GradeCounts,
    pub total: u64,
    /// Weighted grade-point average (unrounded).
    pub average: f64,
    /// Percentage (0-100) of students with a passing grade.
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Summer => "Summer",
        }
    }
}

/// Term label such as `Winter-2024`.
///
/// Caller-supplied labels are kept verbatim; only generated labels are
/// guaranteed to follow the `<Season>-<Year>` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemesterLabel(String);

impl SemesterLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn from_parts(season: Season, year: i32) -> Self {
        Self(format!("{}-{year}", season.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SemesterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One successfully parsed term.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    pub semester: SemesterLabel,
    /// The identifier spelling that produced the data.
    pub course_id: String,
    pub data: DistributionSummary,
}

/// Final result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    NoData,
    /// Non-empty, in discovery order (most recent term first for generated lists).
    Found(Vec<Iteration>),
}

impl FetchOutcome {
    pub fn from_iterations(iterations: Vec<Iteration>) -> Self {
        if iterations.is_empty() {
            FetchOutcome::NoData
        } else {
            FetchOutcome::Found(iterations)
        }
    }

    pub fn iterations(&self) -> &[Iteration] {
        match self {
            FetchOutcome::NoData => &[],
            FetchOutcome::Found(iterations) => iterations,
        }
    }

    /// The first discovered iteration.
    pub fn latest(&self) -> Option<&Iteration> {
        self.iterations().first()
    }
}

/// Structured failure tags reported to callers instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidCourse,
    InvalidUrl,
    NoData,
    FetchFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidCourse => "invalid_course",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::NoData => "no_data",
            ErrorCode::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_keeps_padded_grades_distinct() {
        assert_eq!(Grade::from_symbol("02"), Some(Grade::Two));
        assert_eq!(Grade::from_symbol(" 0 0 "), Some(Grade::Zero));
        assert_eq!(Grade::from_symbol("-3"), Some(Grade::MinusThree));
        assert_eq!(Grade::from_symbol("2"), None);
        assert_eq!(Grade::from_symbol("0"), None);
        assert_eq!(Grade::from_symbol("12%"), None);
    }

    #[test]
    fn zero_grade_is_not_passing() {
        assert!(Grade::Two.is_passing());
        assert!(!Grade::Zero.is_passing());
        assert!(!Grade::MinusThree.is_passing());
    }

    #[test]
    fn counts_fold_last_write_wins() {
        let counts: GradeCounts = vec![(Grade::Seven, 3), (Grade::Twelve, 1), (Grade::Seven, 5)]
            .into_iter()
            .collect();
        assert_eq!(counts.get(Grade::Seven), 5);
        assert_eq!(counts.get(Grade::Twelve), 1);
        assert_eq!(counts.get(Grade::Four), 0);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn counts_serialize_in_scale_order() {
        let counts: GradeCounts = vec![(Grade::Two, 2)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(
            json,
            r#"{"12":0,"10":0,"7":0,"4":0,"02":2,"00":0,"-3":0}"#
        );
    }

    #[test]
    fn outcome_from_empty_is_no_data() {
        assert_eq!(FetchOutcome::from_iterations(Vec::new()), FetchOutcome::NoData);
        assert!(FetchOutcome::NoData.latest().is_none());
    }
}
