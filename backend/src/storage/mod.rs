//! # Storage Module
//!
//! Handles all data persistence for shifts, employees and shift assignments.
//!
//! The domain layer only talks to the traits in [`traits`]; the SQLite
//! implementation lives in [`repositories`] and shares one [`DbConnection`]
//! pool, created once at startup and handed to every repository.
//!
//! ## Guarantees
//!
//! - `(employee_id, shift_id, date)` is unique in `shift_assignments`; an
//!   insert that collides is skipped and reported, never an error
//! - Bulk inserts run inside one transaction
//! - Failures are returned as [`StorageError`](crate::error::StorageError),
//!   never swallowed into empty results

pub mod connection;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{AssignmentRepository, EmployeeRepository, ShiftRepository};
pub use traits::{AssignmentStorage, Connection, EmployeeStorage, ShiftStorage};
