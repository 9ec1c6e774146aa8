use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{NewShiftDefinition, ShiftDefinition, WeekdaySet};
use crate::error::{StorageError, StorageResult};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ShiftStorage;

/// Wire and storage format for times of day
pub const TIME_FORMAT: &str = "%H:%M";

const SHIFT_COLUMNS: &str = "id, name, start_time, end_time, monday, tuesday, wednesday, \
     thursday, friday, saturday, sunday, min_staff, max_staff, center_id";

/// Repository for shift definition operations
#[derive(Clone)]
pub struct ShiftRepository {
    db: DbConnection,
}

impl ShiftRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn parse_time(value: &str) -> StorageResult<NaiveTime> {
        NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| StorageError::Corrupt {
            table: "shifts",
            reason: format!("bad time '{}': {}", value, e),
        })
    }

    fn parse_staff(value: i64) -> StorageResult<u32> {
        u32::try_from(value).map_err(|_| StorageError::Corrupt {
            table: "shifts",
            reason: format!("bad staffing count {}", value),
        })
    }

    fn shift_from_row(row: &SqliteRow) -> StorageResult<ShiftDefinition> {
        let start_time: String = row.try_get("start_time")?;
        let end_time: String = row.try_get("end_time")?;

        let recurrence = WeekdaySet::from_flags([
            row.try_get("monday")?,
            row.try_get("tuesday")?,
            row.try_get("wednesday")?,
            row.try_get("thursday")?,
            row.try_get("friday")?,
            row.try_get("saturday")?,
            row.try_get("sunday")?,
        ]);

        Ok(ShiftDefinition {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            start_time: Self::parse_time(&start_time)?,
            end_time: Self::parse_time(&end_time)?,
            recurrence,
            min_staff: Self::parse_staff(row.try_get("min_staff")?)?,
            max_staff: Self::parse_staff(row.try_get("max_staff")?)?,
            center_id: row.try_get("center_id")?,
        })
    }
}

#[async_trait]
impl ShiftStorage for ShiftRepository {
    async fn store_shift(&self, shift: &NewShiftDefinition) -> StorageResult<ShiftDefinition> {
        let days = shift.recurrence.flags();

        let result = sqlx::query(
            r#"
            INSERT INTO shifts (name, start_time, end_time, monday, tuesday, wednesday,
                                thursday, friday, saturday, sunday, min_staff, max_staff, center_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&shift.name)
        .bind(shift.start_time.format(TIME_FORMAT).to_string())
        .bind(shift.end_time.format(TIME_FORMAT).to_string())
        .bind(days[0])
        .bind(days[1])
        .bind(days[2])
        .bind(days[3])
        .bind(days[4])
        .bind(days[5])
        .bind(days[6])
        .bind(i64::from(shift.min_staff))
        .bind(i64::from(shift.max_staff))
        .bind(shift.center_id)
        .execute(self.db.pool())
        .await?;

        Ok(shift.clone().with_id(result.last_insert_rowid()))
    }

    async fn get_shift(&self, shift_id: i64) -> StorageResult<Option<ShiftDefinition>> {
        let row = sqlx::query(&format!("SELECT {} FROM shifts WHERE id = ?", SHIFT_COLUMNS))
            .bind(shift_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::shift_from_row).transpose()
    }

    async fn list_shifts(&self, center_id: Option<i64>) -> StorageResult<Vec<ShiftDefinition>> {
        let rows = match center_id {
            Some(center_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM shifts WHERE center_id = ? ORDER BY start_time ASC, id ASC",
                    SHIFT_COLUMNS
                ))
                .bind(center_id)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM shifts ORDER BY start_time ASC, id ASC",
                    SHIFT_COLUMNS
                ))
                .fetch_all(self.db.pool())
                .await?
            }
        };

        rows.iter().map(Self::shift_from_row).collect()
    }

    async fn delete_shift(&self, shift_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = ?")
            .bind(shift_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
