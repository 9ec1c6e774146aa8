//! Shift calendar domain logic.
//!
//! Builds the month grid shown on the scheduling screen: Monday-first weeks,
//! padding cells before the first day of the month, and for every day the
//! shifts of a center that run on it together with who is assigned and
//! whether the head count meets the shift's staffing bounds. The UI only
//! renders what this module returns.

use chrono::{Datelike, NaiveDate};
use shared::{CalendarDayType, ShiftCalendarDay, ShiftCalendarMonth, ShiftDayCoverage};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::commands::assignments::AssignmentListQuery;
use crate::domain::models::{ShiftAssignment, ShiftDefinition};
use crate::error::ShiftError;
use crate::storage::{AssignmentStorage, ShiftStorage};

/// Calendar service that handles all shift calendar business logic
#[derive(Clone)]
pub struct ShiftCalendarService {
    shift_repository: Arc<dyn ShiftStorage>,
    assignment_repository: Arc<dyn AssignmentStorage>,
}

impl ShiftCalendarService {
    pub fn new(
        shift_repository: Arc<dyn ShiftStorage>,
        assignment_repository: Arc<dyn AssignmentStorage>,
    ) -> Self {
        Self {
            shift_repository,
            assignment_repository,
        }
    }

    /// Load a center's shifts and assignments and build its month grid
    pub async fn get_calendar_month(
        &self,
        center_id: i64,
        month: u32,
        year: i32,
    ) -> Result<ShiftCalendarMonth, ShiftError> {
        let (first, last) = month_bounds(month, year)?;

        let shifts = self.shift_repository.list_shifts(Some(center_id)).await?;
        let assignments = self
            .assignment_repository
            .list_assignments(&AssignmentListQuery {
                start_date: Some(first),
                end_date: Some(last),
                center_id: Some(center_id),
                ..Default::default()
            })
            .await?;

        info!(
            "Generating shift calendar for center {} {}/{}: {} shifts, {} assignments",
            center_id,
            month,
            year,
            shifts.len(),
            assignments.len()
        );

        generate_calendar_month(center_id, month, year, &shifts, &assignments)
    }
}

/// Build the month grid from already loaded data
///
/// `shifts` should be ordered as they are to appear within a day.
/// Assignments outside the month or for shifts not in `shifts` are ignored.
pub fn generate_calendar_month(
    center_id: i64,
    month: u32,
    year: i32,
    shifts: &[ShiftDefinition],
    assignments: &[ShiftAssignment],
) -> Result<ShiftCalendarMonth, ShiftError> {
    let (first, last) = month_bounds(month, year)?;
    let first_day = first_day_of_month(first);

    // (day, shift) -> assigned employees
    let mut staffed: BTreeMap<(u32, i64), Vec<i64>> = BTreeMap::new();
    for assignment in assignments {
        if assignment.date < first || assignment.date > last {
            continue;
        }
        staffed
            .entry((assignment.date.day(), assignment.shift_id))
            .or_default()
            .push(assignment.employee_id);
    }

    let mut days = Vec::with_capacity((first_day + last.day()) as usize);

    for _ in 0..first_day {
        days.push(ShiftCalendarDay {
            day: 0,
            day_type: CalendarDayType::PaddingBefore,
            shifts: Vec::new(),
        });
    }

    for date in first.iter_days().take_while(|date| *date <= last) {
        let mut coverage = Vec::new();

        for shift in shifts {
            let mut employee_ids = staffed
                .get(&(date.day(), shift.id))
                .cloned()
                .unwrap_or_default();

            // A shift shows up on its own weekdays, or wherever someone was put on it
            if !shift.recurs_on(date.weekday()) && employee_ids.is_empty() {
                continue;
            }

            employee_ids.sort_unstable();
            employee_ids.dedup();

            coverage.push(ShiftDayCoverage {
                shift_id: shift.id,
                shift_name: shift.name.clone(),
                staffing: shift.staffing_status(employee_ids.len()),
                employee_ids,
            });
        }

        days.push(ShiftCalendarDay {
            day: date.day(),
            day_type: CalendarDayType::MonthDay,
            shifts: coverage,
        });
    }

    debug!(
        "Calendar {}/{}: {} padding days, {} cells",
        month,
        year,
        first_day,
        days.len()
    );

    Ok(ShiftCalendarMonth {
        center_id,
        month,
        year,
        first_day_of_week: first_day,
        days,
    })
}

/// Get the number of days in a given month and year
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Weekday of `first` with Monday = 0
fn first_day_of_month(first: NaiveDate) -> u32 {
    first.weekday().num_days_from_monday()
}

/// First and last date of a month
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), ShiftError> {
    let invalid = || ShiftError::validation(format!("Invalid month {}/{}", month, year));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(month, year)).ok_or_else(invalid)?;
    Ok((first, last))
}
