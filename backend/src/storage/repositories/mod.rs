// Repository modules
pub mod assignment_repository;
pub mod employee_repository;
pub mod shift_repository;

// Re-export repository types
pub use assignment_repository::AssignmentRepository;
pub use employee_repository::EmployeeRepository;
pub use shift_repository::ShiftRepository;
