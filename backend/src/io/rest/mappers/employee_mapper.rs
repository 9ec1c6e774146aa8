use shared::{CreateEmployeeRequest, Employee as SharedEmployee, EmployeeListResponse, EmployeeResponse};

use crate::domain::models::{Employee as DomainEmployee, NewEmployee};

/// Mapper to convert between shared employee DTOs and domain employee models.
pub struct EmployeeMapper;

impl EmployeeMapper {
    pub fn to_new_domain(request: CreateEmployeeRequest) -> NewEmployee {
        NewEmployee {
            name: request.name,
            center_id: request.center_id,
            active: request.active.unwrap_or(true),
        }
    }

    pub fn to_dto(domain: DomainEmployee) -> SharedEmployee {
        SharedEmployee {
            id: domain.id,
            name: domain.name,
            center_id: domain.center_id,
            active: domain.active,
        }
    }

    pub fn to_employee_response_dto(domain: DomainEmployee, message: &str) -> EmployeeResponse {
        EmployeeResponse {
            employee: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_employee_list_dto(employees: Vec<DomainEmployee>) -> EmployeeListResponse {
        EmployeeListResponse {
            employees: employees.into_iter().map(Self::to_dto).collect(),
        }
    }
}
