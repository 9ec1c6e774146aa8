use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-weekday flags as they travel over the wire (`monday` .. `sunday`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayFlags {
    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
}

impl WeekdayFlags {
    /// Flags in Monday..Sunday order
    pub fn as_array(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }

    pub fn from_array(days: [bool; 7]) -> Self {
        Self {
            monday: days[0],
            tuesday: days[1],
            wednesday: days[2],
            thursday: days[3],
            friday: days[4],
            saturday: days[5],
            sunday: days[6],
        }
    }
}

/// A recurring work shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub id: i64,
    pub name: String,
    /// Time of day the shift starts (HH:MM)
    pub start_time: String,
    /// Time of day the shift ends (HH:MM)
    pub end_time: String,
    /// Weekdays the shift recurs on
    #[serde(flatten)]
    pub days: WeekdayFlags,
    pub min_staff: u32,
    pub max_staff: u32,
    pub center_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShiftRequest {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(flatten)]
    pub days: WeekdayFlags,
    pub min_staff: u32,
    pub max_staff: u32,
    pub center_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftResponse {
    pub shift: ShiftDefinition,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftListResponse {
    pub shifts: Vec<ShiftDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub center_id: i64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub center_id: i64,
    /// Defaults to active when omitted
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEmployeeActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub employee: Employee,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<Employee>,
}

/// One employee working one shift on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: i64,
    pub employee_id: i64,
    pub shift_id: i64,
    /// Local calendar date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<ShiftAssignment>,
}

/// Request to assign one employee to one shift over a date range
///
/// Selections are optional on the wire so that a missing shift, employee or
/// date can be reported as a validation error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkAssignRequest {
    pub shift_id: Option<i64>,
    pub employee_id: Option<i64>,
    /// First date of the range, inclusive (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last date of the range, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    #[serde(default)]
    pub exclude_weekends: bool,
    /// When any day is set, only these weekdays are used and the shift's own recurrence is ignored
    #[serde(default)]
    pub selected_days: Option<WeekdayFlags>,
    /// Dates skipped regardless of the weekday rules (YYYY-MM-DD)
    #[serde(default)]
    pub exclude_dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAssignResponse {
    pub created: usize,
    pub skipped_duplicates: usize,
    pub created_dates: Vec<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAssignPreviewResponse {
    /// Dates that survive the weekday and exclusion rules
    pub candidate_dates: Vec<String>,
    /// Candidate dates that already hold this assignment
    pub duplicate_dates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickAssignRequest {
    pub shift_id: Option<i64>,
    #[serde(default)]
    pub employee_ids: Vec<i64>,
    /// Date to assign (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAssignResponse {
    pub created: usize,
    pub skipped_duplicates: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAssignmentsRequest {
    pub assignment_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAssignmentsResponse {
    pub deleted_count: usize,
    pub not_found_ids: Vec<i64>,
    pub success_message: String,
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding day before the start of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
}

/// How a day's assignments compare to a shift's staffing bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StaffingStatus {
    Understaffed,
    Staffed,
    Overstaffed,
}

impl fmt::Display for StaffingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffingStatus::Understaffed => write!(f, "understaffed"),
            StaffingStatus::Staffed => write!(f, "staffed"),
            StaffingStatus::Overstaffed => write!(f, "overstaffed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDayCoverage {
    pub shift_id: i64,
    pub shift_name: String,
    pub employee_ids: Vec<i64>,
    pub staffing: StaffingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCalendarDay {
    /// Day of month, 0 for padding days
    pub day: u32,
    pub day_type: CalendarDayType,
    pub shifts: Vec<ShiftDayCoverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCalendarMonth {
    pub center_id: i64,
    pub month: u32,
    pub year: i32,
    /// 0 = Monday, 1 = Tuesday, ..., 6 = Sunday
    pub first_day_of_week: u32,
    pub days: Vec<ShiftCalendarDay>,
}

/// Body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
