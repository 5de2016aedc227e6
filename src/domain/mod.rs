//! Domain types used throughout the search.
//!
//! This module defines:
//!
//! - the grading scale and per-grade counts (`Grade`, `GradeCounts`)
//! - aggregated statistics (`DistributionSummary`)
//! - term labels and search results (`SemesterLabel`, `Iteration`, `FetchOutcome`)

pub mod types;

pub use types::*;
