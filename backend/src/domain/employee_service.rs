use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::employees::EmployeeListQuery;
use crate::domain::models::{Employee, NewEmployee};
use crate::error::ShiftError;
use crate::storage::EmployeeStorage;

/// Service for managing employees
#[derive(Clone)]
pub struct EmployeeService {
    employee_repository: Arc<dyn EmployeeStorage>,
}

impl EmployeeService {
    pub fn new(employee_repository: Arc<dyn EmployeeStorage>) -> Self {
        Self { employee_repository }
    }

    /// Create a new employee
    pub async fn create_employee(&self, mut employee: NewEmployee) -> Result<Employee, ShiftError> {
        info!("Creating employee: name={}, center={}", employee.name, employee.center_id);

        employee.name = employee.name.trim().to_string();
        if employee.name.is_empty() {
            return Err(ShiftError::validation("Employee name cannot be empty"));
        }
        if employee.name.chars().count() > 100 {
            return Err(ShiftError::validation("Employee name cannot exceed 100 characters"));
        }

        let stored = self.employee_repository.store_employee(&employee).await?;

        info!("Created employee: {} with ID: {}", stored.name, stored.id);
        Ok(stored)
    }

    /// Get an employee by ID
    pub async fn get_employee(&self, employee_id: i64) -> Result<Employee, ShiftError> {
        self.employee_repository
            .get_employee(employee_id)
            .await?
            .ok_or_else(|| {
                warn!("Employee not found: {}", employee_id);
                ShiftError::not_found("Employee", employee_id)
            })
    }

    /// List employees
    pub async fn list_employees(&self, query: EmployeeListQuery) -> Result<Vec<Employee>, ShiftError> {
        let employees = self.employee_repository.list_employees(&query).await?;
        info!("Found {} employees", employees.len());
        Ok(employees)
    }

    /// Activate or deactivate an employee
    pub async fn set_active(&self, employee_id: i64, active: bool) -> Result<Employee, ShiftError> {
        info!("Setting employee {} active={}", employee_id, active);

        if !self.employee_repository.set_employee_active(employee_id, active).await? {
            return Err(ShiftError::not_found("Employee", employee_id));
        }

        self.get_employee(employee_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, EmployeeRepository};

    async fn setup_test() -> EmployeeService {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        EmployeeService::new(Arc::new(EmployeeRepository::new(db)))
    }

    #[tokio::test]
    async fn test_create_employee_trims_name() {
        let service = setup_test().await;

        let created = service
            .create_employee(NewEmployee {
                name: " Lucía Pérez ".to_string(),
                center_id: 3,
                active: true,
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Lucía Pérez");
        assert_eq!(service.get_employee(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_employee_rejects_blank_name() {
        let service = setup_test().await;
        let result = service
            .create_employee(NewEmployee {
                name: "".to_string(),
                center_id: 3,
                active: true,
            })
            .await;
        assert!(matches!(result, Err(ShiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_active() {
        let service = setup_test().await;
        let created = service
            .create_employee(NewEmployee {
                name: "Pablo".to_string(),
                center_id: 1,
                active: true,
            })
            .await
            .unwrap();

        let updated = service.set_active(created.id, false).await.unwrap();
        assert!(!updated.active);

        let active_only = service
            .list_employees(EmployeeListQuery {
                center_id: Some(1),
                active_only: true,
            })
            .await
            .unwrap();
        assert!(active_only.is_empty());

        assert!(matches!(
            service.set_active(created.id + 5, true).await,
            Err(ShiftError::NotFound { .. })
        ));
    }
}
