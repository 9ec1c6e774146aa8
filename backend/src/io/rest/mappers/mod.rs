pub mod assignment_mapper;
pub mod employee_mapper;
pub mod shift_mapper;

pub use assignment_mapper::AssignmentMapper;
pub use employee_mapper::EmployeeMapper;
pub use shift_mapper::ShiftMapper;
