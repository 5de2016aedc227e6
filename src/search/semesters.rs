//! Default term enumeration.

use chrono::{Datelike, Local, NaiveDate};

use crate::domain::{Season, SemesterLabel};

/// Academic years covered by the default search.
pub const DEFAULT_YEARS: i32 = 7;

/// Calendar year in which the most recent academic year started.
///
/// An academic year runs from Winter of year Y into Summer of year Y+1, so a
/// date in January-June still belongs to the year that started last autumn.
pub fn academic_start_year(reference: NaiveDate) -> i32 {
    if reference.month() <= 6 {
        reference.year() - 1
    } else {
        reference.year()
    }
}

/// The 14 default term labels, most recent first.
pub fn default_semesters(reference: NaiveDate) -> Vec<SemesterLabel> {
    let start = academic_start_year(reference);
    (0..DEFAULT_YEARS)
        .map(|offset| start - offset)
        .flat_map(|year| {
            [
                SemesterLabel::from_parts(Season::Winter, year),
                SemesterLabel::from_parts(Season::Summer, year),
            ]
        })
        .collect()
}

pub fn default_semesters_today() -> Vec<SemesterLabel> {
    default_semesters(Local::now().date_naive())
}
