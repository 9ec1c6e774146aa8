//! Domain model for a shift assignment.
use chrono::NaiveDate;

/// One employee working one shift on one calendar date.
///
/// `(employee_id, shift_id, date)` is unique across all stored assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftAssignment {
    pub id: i64,
    pub employee_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
}

/// An assignment row that has not been stored yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NewShiftAssignment {
    pub employee_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
}
