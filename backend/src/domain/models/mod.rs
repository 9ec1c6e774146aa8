pub mod assignment;
pub mod employee;
pub mod shift;

pub use assignment::{NewShiftAssignment, ShiftAssignment};
pub use employee::{Employee, NewEmployee};
pub use shift::{is_weekend, NewShiftDefinition, ShiftDefinition, WeekdaySet};
