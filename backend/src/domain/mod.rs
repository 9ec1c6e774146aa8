//! # Domain Module
//!
//! Contains all business logic for shift scheduling.
//!
//! This module encapsulates the rules for how shifts recur, how employees are
//! assigned to them and how a month of coverage is presented. It operates
//! independently of the HTTP layer and of any specific storage backend: every
//! service receives its repositories as trait objects.
//!
//! ## Module Organization
//!
//! - **models**: Shift definitions, employees and assignments
//! - **commands**: Internal command/query/result types used by services
//! - **date_expansion**: Date-range expansion with weekday and exclusion filters
//! - **shift_service**: Shift definition CRUD and validation
//! - **employee_service**: Employee CRUD and the active flag
//! - **shift_assignment_service**: Bulk, preview and single-day assignment, listing and deletion
//! - **calendar**: Month grid with per-day shift coverage
//!
//! ## Business Rules
//!
//! - At most one assignment per employee, shift and date
//! - A non-empty weekday override replaces a shift's own recurrence
//! - Calendar dates are always taken from the local calendar, never from UTC

pub mod calendar;
pub mod commands;
pub mod date_expansion;
pub mod employee_service;
pub mod models;
pub mod shift_assignment_service;
pub mod shift_service;

pub use calendar::ShiftCalendarService;
pub use employee_service::EmployeeService;
pub use shift_assignment_service::ShiftAssignmentService;
pub use shift_service::ShiftService;
