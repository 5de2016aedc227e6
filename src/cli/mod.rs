//! Command-line parsing for the grade statistics tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search and parsing code.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gradestat", version, about = "Exam grade distributions per course and term")]
pub struct Cli {
    /// Log each request and parse decision to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the most recent grade distributions for a course.
    Grades(GradesArgs),
    /// Print the default term list searched when none is given.
    Semesters(SemestersArgs),
    /// Check whether a library catalog record offers online access.
    Access(AccessArgs),
}

#[derive(Debug, Args, Clone)]
pub struct GradesArgs {
    /// Course identifier, with or without an offering suffix (e.g. 01005 or 01005-1).
    pub course: String,

    /// Term to search (repeatable, searched in the given order), e.g. Winter-2024.
    #[arg(short = 's', long = "semester", value_name = "LABEL")]
    pub semesters: Vec<String>,

    /// Number of terms with data to collect.
    #[arg(short = 'n', long = "max", default_value_t = crate::search::DEFAULT_WANTED)]
    pub max: usize,

    /// Print the JSON response instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Parallel fetch workers (overrides GRADESTAT_WORKERS; 0 or 1 = sequential).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (overrides GRADESTAT_TIMEOUT_SECS; 0 = none).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct SemestersArgs {
    /// Reference date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct AccessArgs {
    /// Catalog record URL.
    pub url: String,

    /// Print the JSON response instead of a text line.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grades_with_repeated_semesters() {
        let cli = Cli::parse_from([
            "gradestat", "grades", "01005", "-s", "Winter-2024", "-s", "Summer-2024", "-n", "2", "-v",
        ]);
        assert!(cli.verbose);
        let Command::Grades(args) = cli.command else {
            panic!("expected grades subcommand");
        };
        assert_eq!(args.course, "01005");
        assert_eq!(args.semesters, vec!["Winter-2024", "Summer-2024"]);
        assert_eq!(args.max, 2);
        assert!(args.workers.is_none());
    }

    #[test]
    fn parses_semesters_date() {
        let cli = Cli::parse_from(["gradestat", "semesters", "--date", "2025-03-01"]);
        let Command::Semesters(args) = cli.command else {
            panic!("expected semesters subcommand");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
