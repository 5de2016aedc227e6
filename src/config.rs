//! Runtime configuration from the environment (and an optional `.env`).

use std::time::Duration;

use tracing::debug;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://karakterer.dtu.dk/Histogram/1";
pub const DEFAULT_CATALOG_ORIGIN: &str = "https://findit.dtu.dk";

const ENV_BASE_URL: &str = "GRADESTAT_BASE_URL";
const ENV_CATALOG_ORIGIN: &str = "GRADESTAT_CATALOG_ORIGIN";
const ENV_TIMEOUT_SECS: &str = "GRADESTAT_TIMEOUT_SECS";
const ENV_WORKERS: &str = "GRADESTAT_WORKERS";
const ENV_USER_AGENT: &str = "GRADESTAT_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the per-course-and-term statistics pages.
    pub base_url: String,
    /// The only origin the availability check will contact.
    pub catalog_origin: String,
    /// Per-request timeout; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
    /// Pooled fetch workers; 0 or 1 means sequential.
    pub workers: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_origin: DEFAULT_CATALOG_ORIGIN.to_string(),
            timeout: None,
            workers: 0,
            user_agent: format!("gradestat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        if dotenvy::dotenv().is_ok() {
            debug!("loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(origin) = get(ENV_CATALOG_ORIGIN) {
            config.catalog_origin = origin;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_TIMEOUT_SECS, &raw)?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = get(ENV_WORKERS) {
            config.workers = parse_number(ENV_WORKERS, &raw)?;
        }
        if let Some(agent) = get(ENV_USER_AGENT) {
            config.user_agent = agent;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid(format!("{key} must be a non-negative integer, got '{raw}'.")))
}
