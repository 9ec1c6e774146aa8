use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::error::StorageResult;
use crate::storage::repositories::{AssignmentRepository, EmployeeRepository, ShiftRepository};
use crate::storage::traits::Connection;

/// DbConnection manages the database pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> StorageResult<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Private in-memory database, used by tests and throwaway runs
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // One connection that never expires, so the database lives as long as the pool
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> StorageResult<()> {
        // Create shifts table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS shifts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                monday BOOLEAN NOT NULL DEFAULT FALSE,
                tuesday BOOLEAN NOT NULL DEFAULT FALSE,
                wednesday BOOLEAN NOT NULL DEFAULT FALSE,
                thursday BOOLEAN NOT NULL DEFAULT FALSE,
                friday BOOLEAN NOT NULL DEFAULT FALSE,
                saturday BOOLEAN NOT NULL DEFAULT FALSE,
                sunday BOOLEAN NOT NULL DEFAULT FALSE,
                min_staff INTEGER NOT NULL DEFAULT 0 CHECK (min_staff >= 0),
                max_staff INTEGER NOT NULL DEFAULT 0 CHECK (max_staff >= min_staff),
                center_id INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for center filtering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_shifts_center_id
            ON shifts(center_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create employees table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                center_id INTEGER NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_employees_center_id
            ON employees(center_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Create shift_assignments table; the UNIQUE key is the duplicate signal
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS shift_assignments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                employee_id INTEGER NOT NULL,
                shift_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (employee_id, shift_id, date),
                FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE,
                FOREIGN KEY (shift_id) REFERENCES shifts (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Create index for date range queries
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_shift_assignments_date
            ON shift_assignments(date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_shift_assignments_shift_id
            ON shift_assignments(shift_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type ShiftRepository = ShiftRepository;
    type EmployeeRepository = EmployeeRepository;
    type AssignmentRepository = AssignmentRepository;

    fn create_shift_repository(&self) -> ShiftRepository {
        ShiftRepository::new(self.clone())
    }

    fn create_employee_repository(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.clone())
    }

    fn create_assignment_repository(&self) -> AssignmentRepository {
        AssignmentRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");

        // Running the schema twice must not fail
        DbConnection::setup_schema(db.pool()).await.expect("Schema setup should be idempotent");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        assert!(tables.contains(&"shifts".to_string()));
        assert!(tables.contains(&"employees".to_string()));
        assert!(tables.contains(&"shift_assignments".to_string()));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = DbConnection::in_memory().await.unwrap();
        let second = DbConnection::in_memory().await.unwrap();

        sqlx::query("INSERT INTO employees (name, center_id) VALUES ('Ana', 1)")
            .execute(first.pool())
            .await
            .unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM employees")
            .fetch_one(second.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }
}
