//! Library catalog availability check.
//!
//! Only URLs on the configured catalog origin with a record path are fetched;
//! everything else is rejected before any request is made.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::Config;
use crate::domain::ErrorCode;
use crate::error::AppError;

use super::build_client;

static RECORD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:en/)?catalog/[A-Za-z0-9]+/?$").expect("record path pattern compiles")
});

static ONLINE_ACCESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)online\s+access|online\s+adgang|full[\s-]?text").expect("online access pattern compiles")
});

pub struct CatalogClient {
    client: Client,
    origin: Url,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let origin = Url::parse(&config.catalog_origin).map_err(|e| {
            AppError::invalid(format!("Invalid catalog origin '{}': {e}", config.catalog_origin))
        })?;
        Ok(Self {
            client: build_client(config)?,
            origin,
        })
    }

    /// Whether the catalog record at `raw_url` offers online access.
    pub fn check_online_access(&self, raw_url: &str) -> Result<bool, ErrorCode> {
        let url = validate_record_url(raw_url, &self.origin)?;

        let resp = self.client.get(url.clone()).send().map_err(|e| {
            debug!(%url, error = %e, "catalog request failed");
            ErrorCode::FetchFailed
        })?;
        if !resp.status().is_success() {
            debug!(%url, status = %resp.status(), "catalog request not successful");
            return Err(ErrorCode::FetchFailed);
        }
        let text = resp.text().map_err(|e| {
            debug!(%url, error = %e, "catalog body unreadable");
            ErrorCode::FetchFailed
        })?;

        Ok(mentions_online_access(&text))
    }
}

/// Parse `raw` and accept it only if it is a record page on `origin`.
pub fn validate_record_url(raw: &str, origin: &Url) -> Result<Url, ErrorCode> {
    let mut url = Url::parse(raw.trim()).map_err(|_| ErrorCode::InvalidUrl)?;
    if url.origin() != origin.origin() {
        return Err(ErrorCode::InvalidUrl);
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ErrorCode::InvalidUrl);
    }
    if !RECORD_PATH_RE.is_match(url.path()) {
        return Err(ErrorCode::InvalidUrl);
    }
    url.set_fragment(None);
    Ok(url)
}

pub fn mentions_online_access(text: &str) -> bool {
    ONLINE_ACCESS_RE.is_match(text)
}
