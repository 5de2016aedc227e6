//! Course identifier spellings.
//!
//! The statistics source indexes some courses by bare code and others by code
//! plus offering number, so every search tries both spellings.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ErrorCode;

/// Longest identifier accepted at the request boundary.
pub const MAX_COURSE_CODE_LEN: usize = 32;

/// Offering suffix appended when the identifier carries none.
pub const DEFAULT_OFFERING_SUFFIX: &str = "-1";

static OFFERING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)-([0-9]+)$").expect("offering pattern compiles"));

static ALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("allow-list pattern compiles"));

/// Candidate spellings for `raw`, in the order they should be tried.
///
/// Returns an empty list for blank input. Otherwise the trimmed input comes
/// first, followed by either the identifier without its `-<digits>` suffix or
/// the identifier with the default suffix appended.
pub fn variants(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let alternate = match OFFERING_RE.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => format!("{trimmed}{DEFAULT_OFFERING_SUFFIX}"),
    };

    let mut out = vec![trimmed.to_string()];
    if !out.contains(&alternate) {
        out.push(alternate);
    }
    out
}

/// Check a caller-supplied identifier against the character allow-list.
///
/// Returns the trimmed identifier on success.
pub fn validate_course_code(raw: &str) -> Result<&str, ErrorCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_COURSE_CODE_LEN || !ALLOWED_RE.is_match(trimmed) {
        return Err(ErrorCode::InvalidCourse);
    }
    Ok(trimmed)
}
