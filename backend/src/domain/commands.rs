//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod shifts {
    /// Query parameters for listing shifts.
    #[derive(Debug, Clone, Default)]
    pub struct ShiftListQuery {
        pub center_id: Option<i64>,
    }
}

pub mod employees {
    /// Query parameters for listing employees.
    #[derive(Debug, Clone, Default)]
    pub struct EmployeeListQuery {
        pub center_id: Option<i64>,
        pub active_only: bool,
    }
}

pub mod assignments {
    use crate::domain::date_expansion::ExpansionOptions;
    use crate::domain::models::ShiftAssignment;
    use chrono::NaiveDate;

    /// Input for assigning one employee to a shift over a date range.
    #[derive(Debug, Clone, Default)]
    pub struct BulkAssignCommand {
        pub shift_id: Option<i64>,
        pub employee_id: Option<i64>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub options: ExpansionOptions,
    }

    /// What a bulk assignment would do, without writing anything.
    #[derive(Debug, Clone)]
    pub struct BulkAssignPreview {
        pub candidate_dates: Vec<NaiveDate>,
        pub duplicate_dates: Vec<NaiveDate>,
    }

    /// Result of a bulk assignment.
    #[derive(Debug, Clone)]
    pub struct BulkAssignResult {
        pub created: Vec<ShiftAssignment>,
        pub skipped_duplicates: usize,
    }

    /// Input for assigning several employees to one shift on one date.
    #[derive(Debug, Clone)]
    pub struct QuickAssignCommand {
        pub shift_id: Option<i64>,
        pub employee_ids: Vec<i64>,
        pub date: NaiveDate,
    }

    /// Result of a single-day assignment.
    #[derive(Debug, Clone)]
    pub struct QuickAssignResult {
        pub created: Vec<ShiftAssignment>,
        pub skipped_duplicates: usize,
    }

    /// Query parameters for listing assignments.
    #[derive(Debug, Clone, Default)]
    pub struct AssignmentListQuery {
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub shift_id: Option<i64>,
        pub employee_id: Option<i64>,
        /// Matches through the owning center of the assignment's shift
        pub center_id: Option<i64>,
    }

    /// Command for deleting multiple assignments.
    #[derive(Debug, Clone)]
    pub struct DeleteAssignmentsCommand {
        pub assignment_ids: Vec<i64>,
    }

    /// Result of deleting assignments.
    #[derive(Debug, Clone)]
    pub struct DeleteAssignmentsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<i64>,
    }
}
