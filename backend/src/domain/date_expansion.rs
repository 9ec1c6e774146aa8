//! Date-range expansion for bulk shift assignment.
//!
//! Turns a shift, an employee and an inclusive date range into the list of
//! candidate assignment rows, applying the weekday override, weekend and
//! explicit-date exclusion rules. Collisions with stored rows are not
//! checked here.
//!
//! Every date that is turned into a string goes through [`format_date`],
//! which writes the calendar date as it is in its own timezone. Never
//! derive a calendar date from a UTC-converted timestamp.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use std::collections::BTreeSet;

use crate::domain::models::{is_weekend, NewShiftAssignment, ShiftDefinition, WeekdaySet};
use crate::error::ShiftError;

/// Wire and storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest range, in days including both ends, a single expansion may cover
pub const MAX_RANGE_DAYS: i64 = 366 * 2;

/// Filter options for a bulk expansion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionOptions {
    pub exclude_weekends: bool,
    /// When non-empty, replaces the shift's own recurrence entirely
    pub selected_days: Option<WeekdaySet>,
    pub exclude_dates: BTreeSet<NaiveDate>,
}

impl ExpansionOptions {
    /// The override set, if it selects at least one day
    fn weekday_override(&self) -> Option<WeekdaySet> {
        self.selected_days.filter(|days| !days.is_empty())
    }
}

/// Zero-padded `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format the calendar date of a timestamp as seen in its own timezone
pub fn format_local_date<Tz: TimeZone>(moment: &DateTime<Tz>) -> String {
    format_date(moment.date_naive())
}

/// Today's date in the server's local timezone
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ShiftError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ShiftError::validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            value
        ))
    })
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), ShiftError> {
    if start > end {
        return Err(ShiftError::validation(format!(
            "Start date {} is after end date {}",
            format_date(start),
            format_date(end)
        )));
    }
    Ok(())
}

/// Like [`validate_range`], also rejecting ranges longer than [`MAX_RANGE_DAYS`]
pub fn validate_expansion_range(start: NaiveDate, end: NaiveDate) -> Result<(), ShiftError> {
    validate_range(start, end)?;

    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(ShiftError::validation(format!(
            "Date range {} to {} covers {} days, at most {} are allowed",
            format_date(start),
            format_date(end),
            days,
            MAX_RANGE_DAYS
        )));
    }
    Ok(())
}

/// Whether an assignment for `shift` should be created on `date`
pub fn applies_on(shift: &ShiftDefinition, date: NaiveDate, options: &ExpansionOptions) -> bool {
    let weekday = date.weekday();

    let applicable = match options.weekday_override() {
        Some(days) => days.contains(weekday),
        None => shift.recurs_on(weekday),
    };

    if !applicable {
        return false;
    }
    if options.exclude_weekends && is_weekend(weekday) {
        return false;
    }
    !options.exclude_dates.contains(&date)
}

/// Expand `start..=end` into candidate rows for one employee on one shift
pub fn expand_date_range(
    shift: &ShiftDefinition,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    options: &ExpansionOptions,
) -> Result<Vec<NewShiftAssignment>, ShiftError> {
    validate_expansion_range(start, end)?;

    let candidates = start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| applies_on(shift, *date, options))
        .map(|date| NewShiftAssignment {
            employee_id,
            shift_id: shift.id,
            date,
        })
        .collect();

    Ok(candidates)
}
