//! Search across terms and identifier spellings until enough terms have data.
//!
//! Terms are visited in order; inside a term the spellings are tried in order
//! and the first one whose page parses wins. The search stops as soon as
//! `wanted` terms have produced data.

use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::StatsSource;
use crate::domain::{FetchOutcome, Iteration, SemesterLabel};
use crate::parse::parse_distribution;

use super::semesters::default_semesters;
use super::variants::variants;

/// Terms collected when the caller does not say otherwise.
pub const DEFAULT_WANTED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One request at a time, in term-major, spelling-minor order.
    Sequential,
    /// All spellings of a window of terms in parallel on a dedicated pool.
    Pooled { workers: usize },
}

impl FetchMode {
    pub fn from_workers(workers: usize) -> Self {
        if workers <= 1 {
            FetchMode::Sequential
        } else {
            FetchMode::Pooled { workers }
        }
    }
}

pub struct IterationFetcher<'a, S: StatsSource + ?Sized> {
    source: &'a S,
    mode: FetchMode,
    reference_date: NaiveDate,
}

impl<'a, S: StatsSource + ?Sized> IterationFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            mode: FetchMode::Sequential,
            reference_date: Local::now().date_naive(),
        }
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Date used to derive the default term list.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    /// Collect up to `wanted` terms with a parseable distribution.
    ///
    /// `semesters` is used verbatim when non-empty; otherwise the default
    /// 14-term list for the reference date is searched. Per-request failures
    /// are skipped silently; only a search that finds nothing is `NoData`.
    pub fn fetch_latest_iterations(
        &self,
        identifier: &str,
        semesters: &[SemesterLabel],
        wanted: usize,
    ) -> FetchOutcome {
        let wanted = wanted.max(1);
        let defaults;
        let semesters = if semesters.is_empty() {
            defaults = default_semesters(self.reference_date);
            &defaults[..]
        } else {
            semesters
        };
        let variants = variants(identifier);
        if variants.is_empty() {
            return FetchOutcome::NoData;
        }

        info!(
            course = identifier,
            semesters = semesters.len(),
            variants = variants.len(),
            wanted,
            "searching grade distributions"
        );

        let iterations = match self.mode {
            FetchMode::Sequential => self.search_sequential(&variants, semesters, wanted),
            FetchMode::Pooled { workers } => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(|| self.search_pooled(&variants, semesters, wanted)),
                Err(e) => {
                    warn!("worker pool unavailable, searching sequentially: {e}");
                    self.search_sequential(&variants, semesters, wanted)
                }
            },
        };

        info!(course = identifier, found = iterations.len(), "search finished");
        FetchOutcome::from_iterations(iterations)
    }

    fn search_sequential(&self, variants: &[String], semesters: &[SemesterLabel], wanted: usize) -> Vec<Iteration> {
        // `take` stops pulling terms once `wanted` have produced data.
        semesters
            .iter()
            .filter_map(|semester| variants.iter().find_map(|v| self.try_candidate(semester, v)))
            .take(wanted)
            .collect()
    }

    /// Windows of terms sized to what is still missing, so the result is the
    /// same as the sequential search; only the request count can differ.
    fn search_pooled(&self, variants: &[String], semesters: &[SemesterLabel], wanted: usize) -> Vec<Iteration> {
        let mut found = Vec::new();
        let mut rest = semesters;

        while found.len() < wanted && !rest.is_empty() {
            let (window, tail) = rest.split_at((wanted - found.len()).min(rest.len()));
            rest = tail;

            let hits: Vec<Option<Iteration>> = window
                .par_iter()
                .map(|semester| {
                    let attempts: Vec<Option<Iteration>> = variants
                        .par_iter()
                        .map(|v| self.try_candidate(semester, v))
                        .collect();
                    attempts.into_iter().flatten().next()
                })
                .collect();
            found.extend(hits.into_iter().flatten());
        }

        found
    }

    fn try_candidate(&self, semester: &SemesterLabel, course_id: &str) -> Option<Iteration> {
        let document = match self.source.fetch_document(course_id, semester) {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!(%semester, course_id, "no page");
                return None;
            }
            Err(e) => {
                debug!(%semester, course_id, error = %e, "fetch failed");
                return None;
            }
        };

        let Some(data) = parse_distribution(&document) else {
            debug!(%semester, course_id, "page has no usable distribution");
            return None;
        };

        debug!(%semester, course_id, total = data.total, "distribution found");
        Some(Iteration {
            semester: semester.clone(),
            course_id: course_id.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;

    /// In-memory source keyed by `(course_id, semester)`; records every request.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<(String, String), Result<Option<String>, AppError>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeSource {
        fn page(mut self, course: &str, semester: &str, body: &str) -> Self {
            self.pages
                .insert((course.into(), semester.into()), Ok(Some(body.to_string())));
            self
        }

        fn status(mut self, course: &str, semester: &str) -> Self {
            self.pages.insert((course.into(), semester.into()), Ok(None));
            self
        }

        fn broken(mut self, course: &str, semester: &str) -> Self {
            self.pages
                .insert((course.into(), semester.into()), Err(AppError::fetch("connection reset")));
            self
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StatsSource for FakeSource {
        fn fetch_document(&self, course_id: &str, semester: &SemesterLabel) -> Result<Option<String>, AppError> {
            let key = (course_id.to_string(), semester.as_str().to_string());
            self.calls.lock().unwrap().push(key.clone());
            self.pages.get(&key).cloned().unwrap_or(Ok(None))
        }
    }

    fn table(twelves: u32, sevens: u32) -> String {
        format!(
            "<table><tr><td>12</td><td>{twelves}</td></tr><tr><td>7</td><td>{sevens}</td></tr></table>"
        )
    }

    fn labels(values: &[&str]) -> Vec<SemesterLabel> {
        values.iter().map(|s| SemesterLabel::new(*s)).collect()
    }

    fn call(course: &str, semester: &str) -> (String, String) {
        (course.to_string(), semester.to_string())
    }

    fn scenario() -> FakeSource {
        // S1: nothing parses. S2: only the second spelling parses. S3: first spelling parses.
        FakeSource::default()
            .status("01005", "S1")
            .page("01005-1", "S1", "<p>No data</p>")
            .broken("01005", "S2")
            .page("01005-1", "S2", &table(5, 5))
            .page("01005", "S3", &table(10, 2))
            .page("01005-1", "S3", &table(1, 1))
            .page("01005", "S4", &table(9, 9))
    }

    #[test]
    fn stops_once_wanted_terms_are_found() {
        let source = scenario();
        let fetcher = IterationFetcher::new(&source);
        let outcome = fetcher.fetch_latest_iterations("01005", &labels(&["S1", "S2", "S3", "S4"]), 2);

        let iterations = outcome.iterations();
        assert_eq!(iterations.len(), 2);
        assert_eq!(iterations[0].semester.as_str(), "S2");
        assert_eq!(iterations[0].course_id, "01005-1");
        assert_eq!(iterations[1].semester.as_str(), "S3");
        assert_eq!(iterations[1].course_id, "01005");
        assert_eq!(iterations[1].data.total, 12);
        assert_eq!(outcome.latest().unwrap().semester.as_str(), "S2");

        // S3's second spelling and all of S4 are never requested.
        assert_eq!(
            source.calls(),
            vec![
                call("01005", "S1"),
                call("01005-1", "S1"),
                call("01005", "S2"),
                call("01005-1", "S2"),
                call("01005", "S3"),
            ]
        );
    }

    #[test]
    fn exhaustion_is_no_data() {
        let source = FakeSource::default().broken("X1", "S1").status("X1-1", "S2");
        let fetcher = IterationFetcher::new(&source);
        let outcome = fetcher.fetch_latest_iterations("X1", &labels(&["S1", "S2"]), 3);
        assert_eq!(outcome, FetchOutcome::NoData);
        assert_eq!(source.calls().len(), 4);
    }

    #[test]
    fn fewer_hits_than_wanted_returns_what_was_found() {
        let source = scenario();
        let fetcher = IterationFetcher::new(&source);
        let outcome = fetcher.fetch_latest_iterations("01005", &labels(&["S1", "S2"]), 3);
        assert_eq!(outcome.iterations().len(), 1);
    }

    #[test]
    fn suffixed_identifier_tries_base_second() {
        let source = FakeSource::default().page("01005", "S1", &table(4, 4));
        let fetcher = IterationFetcher::new(&source);
        let outcome = fetcher.fetch_latest_iterations("01005-3", &labels(&["S1"]), 1);
        assert_eq!(outcome.latest().unwrap().course_id, "01005");
        assert_eq!(source.calls(), vec![call("01005-3", "S1"), call("01005", "S1")]);
    }

    #[test]
    fn blank_identifier_makes_no_requests() {
        let source = FakeSource::default();
        let fetcher = IterationFetcher::new(&source);
        assert_eq!(fetcher.fetch_latest_iterations("  ", &[], 3), FetchOutcome::NoData);
        assert!(source.calls().is_empty());
    }

    #[test]
    fn default_terms_follow_reference_date() {
        let source = FakeSource::default().page("A1", "Summer-2018", &table(3, 3));
        let fetcher = IterationFetcher::new(&source)
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        let outcome = fetcher.fetch_latest_iterations("A1", &[], 3);

        assert_eq!(outcome.latest().unwrap().semester.as_str(), "Summer-2018");
        let calls = source.calls();
        assert_eq!(calls.len(), 27);
        assert_eq!(calls[0], call("A1", "Winter-2024"));
        assert_eq!(calls[1], call("A1-1", "Winter-2024"));
    }

    #[test]
    fn pooled_search_matches_sequential_result() {
        let terms = labels(&["S1", "S2", "S3", "S4"]);
        let sequential = {
            let source = scenario();
            IterationFetcher::new(&source).fetch_latest_iterations("01005", &terms, 2)
        };
        let source = scenario();
        let pooled = IterationFetcher::new(&source)
            .with_mode(FetchMode::Pooled { workers: 4 })
            .fetch_latest_iterations("01005", &terms, 2);

        assert_eq!(pooled, sequential);
        // Windows never reach past what is still missing, so S4 is untouched.
        assert!(source.calls().iter().all(|(_, s)| s != "S4"));
    }

    #[test]
    fn pooled_keeps_first_spelling_when_both_parse() {
        let source = scenario();
        let outcome = IterationFetcher::new(&source)
            .with_mode(FetchMode::Pooled { workers: 2 })
            .fetch_latest_iterations("01005", &labels(&["S3"]), 1);
        let hit = outcome.latest().unwrap();
        assert_eq!(hit.course_id, "01005");
        assert_eq!(hit.data.total, 12);
    }

    #[test]
    fn zero_wanted_is_treated_as_one() {
        let source = scenario();
        let outcome = IterationFetcher::new(&source).fetch_latest_iterations("01005", &labels(&["S2", "S3"]), 0);
        assert_eq!(outcome.iterations().len(), 1);
    }

    #[test]
    fn mode_from_workers() {
        assert_eq!(FetchMode::from_workers(0), FetchMode::Sequential);
        assert_eq!(FetchMode::from_workers(1), FetchMode::Sequential);
        assert_eq!(FetchMode::from_workers(8), FetchMode::Pooled { workers: 8 });
    }
}
