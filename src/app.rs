//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - loads configuration (environment, `.env`, then CLI overrides)
//! - dispatches to the service layer and prints the result

use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{AccessArgs, Cli, Command, GradesArgs, SemestersArgs};
use crate::config::Config;
use crate::data::{CatalogClient, HttpStatsSource};
use crate::domain::ErrorCode;
use crate::error::{AppError, EXIT_FETCH, EXIT_INVALID, EXIT_NO_DATA};
use crate::search::{FetchMode, IterationFetcher, default_semesters, default_semesters_today};
use crate::service::{self, AccessRequest, GradesRequest};

/// Entry point for the `gradestat` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Grades(args) => handle_grades(args),
        Command::Semesters(args) => handle_semesters(args),
        Command::Access(args) => handle_access(args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_grades(args: GradesArgs) -> Result<(), AppError> {
    let config = apply_overrides(Config::from_env()?, &args);
    let source = HttpStatsSource::new(&config)?;
    let fetcher = IterationFetcher::new(&source).with_mode(FetchMode::from_workers(config.workers));

    let request = GradesRequest {
        course_code: args.course.clone(),
        semesters: Some(args.semesters.clone()),
        max_iterations: Some(args.max),
    };
    let response = service::handle_grades(&fetcher, &request);

    if args.json {
        println!("{}", to_json(&response)?);
    } else {
        print!("{}", crate::report::format_grades(&args.course, &response));
    }

    match response.error {
        None => Ok(()),
        Some(code) => Err(error_for(code, &args.course)),
    }
}

fn handle_semesters(args: SemestersArgs) -> Result<(), AppError> {
    let labels = args.date.map_or_else(default_semesters_today, default_semesters);
    print!("{}", crate::report::format_semesters(&labels));
    Ok(())
}

fn handle_access(args: AccessArgs) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let client = CatalogClient::new(&config)?;
    let response = service::handle_access(&client, &AccessRequest { url: args.url.clone() });

    if args.json {
        println!("{}", to_json(&response)?);
    } else {
        print!("{}", crate::report::format_access(&args.url, &response));
    }

    match response.error {
        None => Ok(()),
        Some(code) => Err(error_for(code, &args.url)),
    }
}

/// CLI flags win over the environment.
pub fn apply_overrides(mut config: Config, args: &GradesArgs) -> Config {
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(secs) = args.timeout {
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    config
}

fn error_for(code: ErrorCode, subject: &str) -> AppError {
    match code {
        ErrorCode::InvalidCourse => AppError::new(EXIT_INVALID, format!("Invalid course code '{subject}'.")),
        ErrorCode::InvalidUrl => AppError::new(EXIT_INVALID, format!("URL not allowed: {subject}")),
        ErrorCode::NoData => AppError::new(EXIT_NO_DATA, format!("No grade data found for '{subject}'.")),
        ErrorCode::FetchFailed => AppError::new(EXIT_FETCH, format!("Fetching {subject} failed.")),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(EXIT_FETCH, format!("Failed to serialize response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades_args(workers: Option<usize>, timeout: Option<u64>) -> GradesArgs {
        GradesArgs {
            course: "01005".to_string(),
            semesters: Vec::new(),
            max: 3,
            json: false,
            workers,
            timeout,
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let base = Config {
            workers: 2,
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        };
        let config = apply_overrides(base.clone(), &grades_args(Some(8), Some(0)));
        assert_eq!(config.workers, 8);
        assert_eq!(config.timeout, None);

        let untouched = apply_overrides(base.clone(), &grades_args(None, None));
        assert_eq!(untouched, base);
    }

    #[test]
    fn error_codes_map_to_exit_codes() {
        assert_eq!(error_for(ErrorCode::InvalidCourse, "x").exit_code(), EXIT_INVALID);
        assert_eq!(error_for(ErrorCode::InvalidUrl, "x").exit_code(), EXIT_INVALID);
        assert_eq!(error_for(ErrorCode::NoData, "x").exit_code(), EXIT_NO_DATA);
        assert_eq!(error_for(ErrorCode::FetchFailed, "x").exit_code(), EXIT_FETCH);
    }
}
