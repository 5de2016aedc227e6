//! Request/response boundary.
//!
//! Requests are validated here, before anything touches the network, and every
//! expected failure comes back as a structured response rather than an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{CatalogClient, StatsSource};
use crate::domain::{DistributionSummary, ErrorCode, FetchOutcome, Iteration, SemesterLabel};
use crate::search::{DEFAULT_WANTED, IterationFetcher, validate_course_code};

/// Upper bound on `maxIterations`.
pub const MAX_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradesRequest {
    pub course_code: String,
    #[serde(default)]
    pub semesters: Option<Vec<String>>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl GradesRequest {
    pub fn new(course_code: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            ..Self::default()
        }
    }

    /// `maxIterations` with the default applied, clamped to `1..=MAX_ITERATIONS`.
    pub fn wanted(&self) -> usize {
        self.max_iterations
            .unwrap_or(DEFAULT_WANTED)
            .clamp(1, MAX_ITERATIONS)
    }

    /// Explicit terms, verbatim; empty means "use the defaults".
    pub fn semester_labels(&self) -> Vec<SemesterLabel> {
        self.semesters
            .iter()
            .flatten()
            .map(|s| SemesterLabel::new(s.as_str()))
            .collect()
    }
}

/// `{ ok: false, error }` or `{ ok: true, iterations, semester, data }`.
///
/// `semester` and `data` repeat the first iteration for older callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradesResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub iterations: Vec<Iteration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<SemesterLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DistributionSummary>,
}

impl GradesResponse {
    pub fn failure(code: ErrorCode) -> Self {
        Self {
            ok: false,
            error: Some(code),
            iterations: Vec::new(),
            semester: None,
            data: None,
        }
    }

    pub fn from_outcome(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::NoData => Self::failure(ErrorCode::NoData),
            FetchOutcome::Found(iterations) => {
                let first = iterations.first().cloned();
                Self {
                    ok: true,
                    error: None,
                    semester: first.as_ref().map(|it| it.semester.clone()),
                    data: first.map(|it| it.data),
                    iterations,
                }
            }
        }
    }
}

pub fn handle_grades<S: StatsSource + ?Sized>(
    fetcher: &IterationFetcher<'_, S>,
    request: &GradesRequest,
) -> GradesResponse {
    let course = match validate_course_code(&request.course_code) {
        Ok(course) => course,
        Err(code) => {
            debug!(course = %request.course_code, "rejected course code");
            return GradesResponse::failure(code);
        }
    };
    let outcome = fetcher.fetch_latest_iterations(course, &request.semester_labels(), request.wanted());
    GradesResponse::from_outcome(outcome)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub ok: bool,
    pub online_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl From<Result<bool, ErrorCode>> for AccessResponse {
    fn from(result: Result<bool, ErrorCode>) -> Self {
        match result {
            Ok(online_access) => Self {
                ok: true,
                online_access,
                error: None,
            },
            Err(code) => Self {
                ok: false,
                online_access: false,
                error: Some(code),
            },
        }
    }
}

pub fn handle_access(client: &CatalogClient, request: &AccessRequest) -> AccessResponse {
    client.check_online_access(&request.url).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wanted_is_defaulted_and_clamped() {
        let mut req = GradesRequest::new("01005");
        assert_eq!(req.wanted(), 3);
        req.max_iterations = Some(0);
        assert_eq!(req.wanted(), 1);
        req.max_iterations = Some(500);
        assert_eq!(req.wanted(), MAX_ITERATIONS);
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let req: GradesRequest = serde_json::from_str(
            r#"{"courseCode":"01005","semesters":["Winter-2023","weird label"],"maxIterations":2}"#,
        )
        .unwrap();
        assert_eq!(req.course_code, "01005");
        assert_eq!(req.wanted(), 2);
        let labels = req.semester_labels();
        assert_eq!(labels[1].as_str(), "weird label");

        let bare: GradesRequest = serde_json::from_str(r#"{"courseCode":"01005"}"#).unwrap();
        assert!(bare.semester_labels().is_empty());
    }

    #[test]
    fn access_response_shapes() {
        let ok = serde_json::to_value(AccessResponse::from(Ok(true))).unwrap();
        assert_eq!(ok, serde_json::json!({"ok": true, "onlineAccess": true}));

        let err = serde_json::to_value(AccessResponse::from(Err(ErrorCode::InvalidUrl))).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"ok": false, "onlineAccess": false, "error": "invalid_url"})
        );
    }
}
