//! `gradestat` library crate.
//!
//! The binary (`gradestat`) is a thin wrapper around this library so that:
//!
//! - the search, parsing, and aggregation logic is testable without a network
//! - the request/response boundary (`service`) can be embedded elsewhere

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod parse;
pub mod report;
pub mod search;
pub mod service;
pub mod stats;
