//! Grade statistics endpoint integration.

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::Config;
use crate::domain::SemesterLabel;
use crate::error::AppError;

use super::build_client;

/// Source of per-course-and-term statistics pages.
pub trait StatsSource: Sync {
    /// Fetch the page for one (identifier, term) pair.
    ///
    /// `Ok(None)` means the endpoint answered with a non-success status;
    /// `Err` means the request itself failed.
    fn fetch_document(&self, course_id: &str, semester: &SemesterLabel) -> Result<Option<String>, AppError>;
}

pub struct HttpStatsSource {
    client: Client,
    base_url: Url,
}

impl HttpStatsSource {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::invalid(format!("Invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::invalid(format!(
                "Base URL '{}' cannot carry a path.",
                config.base_url
            )));
        }
        Ok(Self {
            client: build_client(config)?,
            base_url,
        })
    }

    /// `<base>/<course_id>/<semester>`, each segment percent-encoded.
    pub fn document_url(&self, course_id: &str, semester: &SemesterLabel) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(course_id).push(semester.as_str());
        }
        url
    }
}

impl StatsSource for HttpStatsSource {
    fn fetch_document(&self, course_id: &str, semester: &SemesterLabel) -> Result<Option<String>, AppError> {
        let url = self.document_url(course_id, semester);

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AppError::fetch(format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            debug!(%url, status = %resp.status(), "statistics request not successful");
            return Ok(None);
        }

        let body = resp
            .text()
            .map_err(|e| AppError::fetch(format!("Failed to read body from {url}: {e}")))?;
        Ok(Some(body))
    }
}
