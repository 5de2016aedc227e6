//! Network-facing sources: grade statistics pages and catalog records.

use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

use crate::config::Config;
use crate::error::AppError;

pub mod catalog;
pub mod grades;

pub use catalog::CatalogClient;
pub use grades::{HttpStatsSource, StatsSource};

/// Blocking client shared by both sources: no cookie store, caching disabled.
fn build_client(config: &Config) -> Result<Client, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::invalid(format!("Failed to build HTTP client: {e}")))
}
