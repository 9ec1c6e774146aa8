use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::domain::commands::employees::EmployeeListQuery;
use crate::domain::models::{Employee, NewEmployee};
use crate::error::StorageResult;
use crate::storage::connection::DbConnection;
use crate::storage::traits::EmployeeStorage;

/// Repository for employee operations
#[derive(Clone)]
pub struct EmployeeRepository {
    db: DbConnection,
}

impl EmployeeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn employee_from_row(row: &SqliteRow) -> StorageResult<Employee> {
        Ok(Employee {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            center_id: row.try_get("center_id")?,
            active: row.try_get("active")?,
        })
    }
}

#[async_trait]
impl EmployeeStorage for EmployeeRepository {
    async fn store_employee(&self, employee: &NewEmployee) -> StorageResult<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, center_id, active)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&employee.name)
        .bind(employee.center_id)
        .bind(employee.active)
        .execute(self.db.pool())
        .await?;

        Ok(employee.clone().with_id(result.last_insert_rowid()))
    }

    async fn get_employee(&self, employee_id: i64) -> StorageResult<Option<Employee>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, center_id, active
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::employee_from_row).transpose()
    }

    async fn list_employees(&self, query: &EmployeeListQuery) -> StorageResult<Vec<Employee>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, center_id, active FROM employees WHERE 1 = 1");

        if let Some(center_id) = query.center_id {
            builder.push(" AND center_id = ").push_bind(center_id);
        }
        if query.active_only {
            builder.push(" AND active = TRUE");
        }
        builder.push(" ORDER BY name ASC, id ASC");

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::employee_from_row).collect()
    }

    async fn set_employee_active(&self, employee_id: i64, active: bool) -> StorageResult<bool> {
        let result = sqlx::query("UPDATE employees SET active = ? WHERE id = ?")
            .bind(active)
            .bind(employee_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
