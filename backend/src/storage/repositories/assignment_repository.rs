use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::domain::commands::assignments::AssignmentListQuery;
use crate::domain::date_expansion::{format_date, DATE_FORMAT};
use crate::domain::models::{NewShiftAssignment, ShiftAssignment};
use crate::error::{StorageError, StorageResult};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AssignmentStorage;

/// Maximum number of IDs bound into one DELETE statement
const DELETE_BATCH_SIZE: usize = 200;

const CONFLICT_CLAUSE: &str = " ON CONFLICT (employee_id, shift_id, date) DO NOTHING \
     RETURNING id, employee_id, shift_id, date";

/// Repository for shift assignment operations
#[derive(Clone)]
pub struct AssignmentRepository {
    db: DbConnection,
}

impl AssignmentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn parse_date(value: &str) -> StorageResult<NaiveDate> {
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| StorageError::Corrupt {
            table: "shift_assignments",
            reason: format!("bad date '{}': {}", value, e),
        })
    }

    fn assignment_from_row(row: &SqliteRow) -> StorageResult<ShiftAssignment> {
        let date: String = row.try_get("date")?;
        Ok(ShiftAssignment {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            shift_id: row.try_get("shift_id")?,
            date: Self::parse_date(&date)?,
        })
    }
}

#[async_trait]
impl AssignmentStorage for AssignmentRepository {
    async fn find_existing_dates(
        &self,
        employee_id: i64,
        shift_id: i64,
        dates: &[NaiveDate],
    ) -> StorageResult<Vec<NaiveDate>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT date FROM shift_assignments WHERE employee_id = ");
        builder
            .push_bind(employee_id)
            .push(" AND shift_id = ")
            .push_bind(shift_id)
            .push(" AND date IN (");
        let mut separated = builder.separated(", ");
        for date in dates {
            separated.push_bind(format_date(*date));
        }
        separated.push_unseparated(")");

        let rows = builder.build().fetch_all(self.db.pool()).await?;

        rows.iter()
            .map(|row| {
                let date: String = row.try_get("date")?;
                Self::parse_date(&date)
            })
            .collect()
    }

    async fn insert_assignment_batches(
        &self,
        batches: &[&[NewShiftAssignment]],
    ) -> StorageResult<Vec<ShiftAssignment>> {
        let mut tx = self.db.pool().begin().await?;
        let mut created = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            if batch.is_empty() {
                continue;
            }

            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO shift_assignments (employee_id, shift_id, date) ");
            builder.push_values(batch.iter(), |mut values, assignment| {
                values
                    .push_bind(assignment.employee_id)
                    .push_bind(assignment.shift_id)
                    .push_bind(format_date(assignment.date));
            });
            builder.push(CONFLICT_CLAUSE);

            // An error here drops `tx`, rolling back every earlier batch
            let rows = builder.build().fetch_all(&mut *tx).await?;
            debug!(
                "Insert batch {} of {}: {} rows sent, {} inserted",
                index + 1,
                batches.len(),
                batch.len(),
                rows.len()
            );

            for row in &rows {
                created.push(Self::assignment_from_row(row)?);
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn insert_assignment(
        &self,
        assignment: &NewShiftAssignment,
    ) -> StorageResult<Option<ShiftAssignment>> {
        let row = sqlx::query(&format!(
            "INSERT INTO shift_assignments (employee_id, shift_id, date) VALUES (?, ?, ?){}",
            CONFLICT_CLAUSE
        ))
        .bind(assignment.employee_id)
        .bind(assignment.shift_id)
        .bind(format_date(assignment.date))
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::assignment_from_row).transpose()
    }

    async fn list_assignments(
        &self,
        query: &AssignmentListQuery,
    ) -> StorageResult<Vec<ShiftAssignment>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT a.id, a.employee_id, a.shift_id, a.date \
             FROM shift_assignments a JOIN shifts s ON s.id = a.shift_id WHERE 1 = 1",
        );

        // Dates are zero-padded, so text comparison is chronological
        if let Some(start) = query.start_date {
            builder.push(" AND a.date >= ").push_bind(format_date(start));
        }
        if let Some(end) = query.end_date {
            builder.push(" AND a.date <= ").push_bind(format_date(end));
        }
        if let Some(shift_id) = query.shift_id {
            builder.push(" AND a.shift_id = ").push_bind(shift_id);
        }
        if let Some(employee_id) = query.employee_id {
            builder.push(" AND a.employee_id = ").push_bind(employee_id);
        }
        if let Some(center_id) = query.center_id {
            builder.push(" AND s.center_id = ").push_bind(center_id);
        }
        builder.push(" ORDER BY a.date ASC, s.start_time ASC, a.shift_id ASC, a.employee_id ASC");

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::assignment_from_row).collect()
    }

    async fn delete_assignment(&self, assignment_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM shift_assignments WHERE id = ?")
            .bind(assignment_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_assignments(&self, assignment_ids: &[i64]) -> StorageResult<Vec<i64>> {
        let mut tx = self.db.pool().begin().await?;
        let mut deleted = Vec::new();

        for chunk in assignment_ids.chunks(DELETE_BATCH_SIZE) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("DELETE FROM shift_assignments WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") RETURNING id");

            let rows = builder.build().fetch_all(&mut *tx).await?;
            for row in &rows {
                deleted.push(row.try_get::<i64, _>("id")?);
            }
        }

        tx.commit().await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{NewEmployee, NewShiftDefinition, WeekdaySet};
    use crate::storage::traits::{EmployeeStorage, ShiftStorage};
    use crate::storage::{EmployeeRepository, ShiftRepository};
    use chrono::NaiveTime;

    struct Fixture {
        repo: AssignmentRepository,
        shift_id: i64,
        other_shift_id: i64,
        employee_id: i64,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let shifts = ShiftRepository::new(db.clone());
        let employees = EmployeeRepository::new(db.clone());

        let mut shift_ids = Vec::new();
        for (name, center_id) in [("Morning", 1), ("Night", 2)] {
            let shift = shifts
                .store_shift(&NewShiftDefinition {
                    name: name.to_string(),
                    start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                    recurrence: WeekdaySet::every_day(),
                    min_staff: 1,
                    max_staff: 3,
                    center_id,
                })
                .await
                .unwrap();
            shift_ids.push(shift.id);
        }

        let employee = employees
            .store_employee(&NewEmployee {
                name: "Pablo".to_string(),
                center_id: 1,
                active: true,
            })
            .await
            .unwrap();

        Fixture {
            repo: AssignmentRepository::new(db),
            shift_id: shift_ids[0],
            other_shift_id: shift_ids[1],
            employee_id: employee.id,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn row(fixture: &Fixture, shift_id: i64, d: u32) -> NewShiftAssignment {
        NewShiftAssignment {
            employee_id: fixture.employee_id,
            shift_id,
            date: day(d),
        }
    }

    #[tokio::test]
    async fn test_insert_single_and_duplicate() {
        let f = setup_test().await;
        let new_row = row(&f, f.shift_id, 3);

        let first = f.repo.insert_assignment(&new_row).await.unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().date, day(3));

        // The unique key turns a second insert into a skip, not an error
        let second = f.repo.insert_assignment(&new_row).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_find_existing_dates() {
        let f = setup_test().await;
        f.repo.insert_assignment(&row(&f, f.shift_id, 3)).await.unwrap();
        f.repo.insert_assignment(&row(&f, f.shift_id, 5)).await.unwrap();
        f.repo.insert_assignment(&row(&f, f.other_shift_id, 4)).await.unwrap();

        let mut existing = f
            .repo
            .find_existing_dates(f.employee_id, f.shift_id, &[day(3), day(4), day(5), day(6)])
            .await
            .unwrap();
        existing.sort();

        assert_eq!(existing, vec![day(3), day(5)]);
        assert!(f
            .repo
            .find_existing_dates(f.employee_id, f.shift_id, &[])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_batches_skip_existing_rows() {
        let f = setup_test().await;
        f.repo.insert_assignment(&row(&f, f.shift_id, 4)).await.unwrap();

        let first_batch = [row(&f, f.shift_id, 3), row(&f, f.shift_id, 4)];
        let second_batch = [row(&f, f.shift_id, 5)];
        let created = f
            .repo
            .insert_assignment_batches(&[&first_batch, &second_batch])
            .await
            .unwrap();

        let mut dates: Vec<NaiveDate> = created.iter().map(|a| a.date).collect();
        dates.sort();
        assert_eq!(dates, vec![day(3), day(5)]);
    }

    #[tokio::test]
    async fn test_failing_batch_rolls_back_earlier_batches() {
        let f = setup_test().await;

        let good_batch = [row(&f, f.shift_id, 3), row(&f, f.shift_id, 4)];
        // Unknown employee violates the foreign key
        let bad_batch = [NewShiftAssignment {
            employee_id: f.employee_id + 1000,
            shift_id: f.shift_id,
            date: day(5),
        }];

        let result = f
            .repo
            .insert_assignment_batches(&[&good_batch, &bad_batch])
            .await;
        assert!(result.is_err());

        let stored = f
            .repo
            .list_assignments(&AssignmentListQuery::default())
            .await
            .unwrap();
        assert!(stored.is_empty(), "No row of a failed bulk insert may persist");
    }

    #[tokio::test]
    async fn test_list_assignments_filters() {
        let f = setup_test().await;
        for d in [3, 4, 5, 6] {
            f.repo.insert_assignment(&row(&f, f.shift_id, d)).await.unwrap();
        }
        f.repo.insert_assignment(&row(&f, f.other_shift_id, 4)).await.unwrap();

        let in_range = f
            .repo
            .list_assignments(&AssignmentListQuery {
                start_date: Some(day(4)),
                end_date: Some(day(5)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_range.len(), 3);
        assert!(in_range.windows(2).all(|w| w[0].date <= w[1].date));

        let center_two = f
            .repo
            .list_assignments(&AssignmentListQuery {
                center_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(center_two.len(), 1);
        assert_eq!(center_two[0].shift_id, f.other_shift_id);
    }

    #[tokio::test]
    async fn test_delete_assignments() {
        let f = setup_test().await;
        let a = f.repo.insert_assignment(&row(&f, f.shift_id, 3)).await.unwrap().unwrap();
        let b = f.repo.insert_assignment(&row(&f, f.shift_id, 4)).await.unwrap().unwrap();
        let c = f.repo.insert_assignment(&row(&f, f.shift_id, 5)).await.unwrap().unwrap();

        assert!(f.repo.delete_assignment(a.id).await.unwrap());
        assert!(!f.repo.delete_assignment(a.id).await.unwrap());

        let mut deleted = f.repo.delete_assignments(&[b.id, c.id, 9999]).await.unwrap();
        deleted.sort();
        assert_eq!(deleted, vec![b.id, c.id]);
    }
}
