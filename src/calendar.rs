//! Calendar utilities: day-of-year arithmetic, weekend/ISO-week classification.

use chrono::{Datelike, NaiveDate};

use crate::error::RosterError;

/// Returns the calendar date for the given day-of-year in `year`.
///
/// `day_of_year` is 1-based. Fails with `InvalidDay` when it falls outside
/// the year's length (365 or 366 for leap years).
pub fn date_of(year: i32, day_of_year: i64) -> Result<NaiveDate, RosterError> {
    if day_of_year < 1 {
        return Err(RosterError::InvalidDay {
            year,
            day: day_of_year,
        });
    }
    NaiveDate::from_yo_opt(year, day_of_year as u32).ok_or(RosterError::InvalidDay {
        year,
        day: day_of_year,
    })
}

/// True for Saturday/Sunday (ISO weekday 6 or 7).
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().number_from_monday() >= 6
}

/// The ISO (year, week) a date belongs to, handling week-53 years and the
/// Jan/Dec boundary correctly via `chrono`'s ISO week calendar.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}
