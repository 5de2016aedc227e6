//! The search space: identifier spellings x terms, and the loop that walks it.

pub mod fetcher;
pub mod semesters;
pub mod variants;

pub use fetcher::{DEFAULT_WANTED, FetchMode, IterationFetcher};
pub use semesters::{default_semesters, default_semesters_today};
pub use variants::{validate_course_code, variants};
