//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::commands::assignments::AssignmentListQuery;
use crate::domain::commands::employees::EmployeeListQuery;
use crate::domain::models::{
    Employee, NewEmployee, NewShiftAssignment, NewShiftDefinition, ShiftAssignment,
    ShiftDefinition,
};
use crate::error::StorageResult;

/// Trait defining the interface for shift definition storage operations
#[async_trait]
pub trait ShiftStorage: Send + Sync {
    /// Store a new shift and return it with its assigned ID
    async fn store_shift(&self, shift: &NewShiftDefinition) -> StorageResult<ShiftDefinition>;

    async fn get_shift(&self, shift_id: i64) -> StorageResult<Option<ShiftDefinition>>;

    /// List shifts ordered by start time, optionally for one center
    async fn list_shifts(&self, center_id: Option<i64>) -> StorageResult<Vec<ShiftDefinition>>;

    /// Delete a shift and its assignments
    /// Returns true if the shift was found and deleted
    async fn delete_shift(&self, shift_id: i64) -> StorageResult<bool>;
}

/// Trait defining the interface for employee storage operations
#[async_trait]
pub trait EmployeeStorage: Send + Sync {
    async fn store_employee(&self, employee: &NewEmployee) -> StorageResult<Employee>;

    async fn get_employee(&self, employee_id: i64) -> StorageResult<Option<Employee>>;

    /// List employees ordered by name
    async fn list_employees(&self, query: &EmployeeListQuery) -> StorageResult<Vec<Employee>>;

    /// Returns false if the employee does not exist
    async fn set_employee_active(&self, employee_id: i64, active: bool) -> StorageResult<bool>;
}

/// Trait defining the interface for shift assignment storage operations
///
/// Implementations must enforce uniqueness of `(employee_id, shift_id, date)`.
/// Inserting an existing key is not an error: the row is skipped.
#[async_trait]
pub trait AssignmentStorage: Send + Sync {
    /// Of `dates`, return those already assigned to this employee on this shift
    async fn find_existing_dates(
        &self,
        employee_id: i64,
        shift_id: i64,
        dates: &[NaiveDate],
    ) -> StorageResult<Vec<NaiveDate>>;

    /// Insert every batch, in order, as one atomic unit
    ///
    /// Either all batches are committed or none are. Returns the rows that
    /// were actually inserted; rows colliding with an existing key are skipped.
    async fn insert_assignment_batches(
        &self,
        batches: &[&[NewShiftAssignment]],
    ) -> StorageResult<Vec<ShiftAssignment>>;

    /// Insert one row, returning `None` when the key already exists
    async fn insert_assignment(
        &self,
        assignment: &NewShiftAssignment,
    ) -> StorageResult<Option<ShiftAssignment>>;

    /// List assignments ordered by date, shift and employee
    async fn list_assignments(
        &self,
        query: &AssignmentListQuery,
    ) -> StorageResult<Vec<ShiftAssignment>>;

    /// Returns true if the assignment was found and deleted
    async fn delete_assignment(&self, assignment_id: i64) -> StorageResult<bool>;

    /// Delete several assignments, returning the IDs actually deleted
    async fn delete_assignments(&self, assignment_ids: &[i64]) -> StorageResult<Vec<i64>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the application state can be
/// assembled without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    type ShiftRepository: ShiftStorage + 'static;
    type EmployeeRepository: EmployeeStorage + 'static;
    type AssignmentRepository: AssignmentStorage + 'static;

    fn create_shift_repository(&self) -> Self::ShiftRepository;

    fn create_employee_repository(&self) -> Self::EmployeeRepository;

    fn create_assignment_repository(&self) -> Self::AssignmentRepository;
}
