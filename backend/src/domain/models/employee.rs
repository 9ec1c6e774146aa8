//! Domain model for an employee.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub center_id: i64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub center_id: i64,
    pub active: bool,
}

impl NewEmployee {
    pub fn with_id(self, id: i64) -> Employee {
        Employee {
            id,
            name: self.name,
            center_id: self.center_id,
            active: self.active,
        }
    }
}
