//! Shift assignment domain logic.
//!
//! Bulk assignment runs in three steps:
//!
//! 1. expand the date range into candidate rows ([`expand_date_range`]);
//! 2. drop candidates that already exist, checking storage
//!    [`DUPLICATE_CHECK_BATCH_SIZE`] dates at a time;
//! 3. insert the survivors in batches of [`INSERT_BATCH_SIZE`], all inside
//!    one storage transaction.
//!
//! Step 2 only feeds the report. The storage unique key on
//! `(employee_id, shift_id, date)` is what actually prevents duplicates, so a
//! concurrent writer that wins the race shows up as a skipped row rather than
//! a second copy.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::assignments::{
    AssignmentListQuery, BulkAssignCommand, BulkAssignPreview, BulkAssignResult,
    DeleteAssignmentsCommand, DeleteAssignmentsResult, QuickAssignCommand, QuickAssignResult,
};
use crate::domain::date_expansion::{
    expand_date_range, format_date, validate_expansion_range, validate_range,
};
use crate::domain::models::{NewShiftAssignment, ShiftAssignment, ShiftDefinition};
use crate::error::ShiftError;
use crate::storage::{AssignmentStorage, EmployeeStorage, ShiftStorage};

/// Maximum number of dates sent in one existing-row lookup
pub const DUPLICATE_CHECK_BATCH_SIZE: usize = 200;

/// Maximum number of rows sent in one insert statement
pub const INSERT_BATCH_SIZE: usize = 50;

/// Candidates for one bulk run, split by whether they already exist
struct BulkPlan {
    shift: ShiftDefinition,
    employee_id: i64,
    fresh: Vec<NewShiftAssignment>,
    duplicates: Vec<NaiveDate>,
}

/// Service for creating, listing and removing shift assignments
#[derive(Clone)]
pub struct ShiftAssignmentService {
    shift_repository: Arc<dyn ShiftStorage>,
    employee_repository: Arc<dyn EmployeeStorage>,
    assignment_repository: Arc<dyn AssignmentStorage>,
}

impl ShiftAssignmentService {
    pub fn new(
        shift_repository: Arc<dyn ShiftStorage>,
        employee_repository: Arc<dyn EmployeeStorage>,
        assignment_repository: Arc<dyn AssignmentStorage>,
    ) -> Self {
        Self {
            shift_repository,
            employee_repository,
            assignment_repository,
        }
    }

    /// Report what [`Self::bulk_assign`] would do without writing anything
    pub async fn preview_bulk_assign(
        &self,
        command: BulkAssignCommand,
    ) -> Result<BulkAssignPreview, ShiftError> {
        let plan = self.plan_bulk_assign(&command).await?;

        let mut candidate_dates: Vec<NaiveDate> = plan.fresh.iter().map(|c| c.date).collect();
        candidate_dates.extend(plan.duplicates.iter().copied());
        candidate_dates.sort();

        Ok(BulkAssignPreview {
            candidate_dates,
            duplicate_dates: plan.duplicates,
        })
    }

    /// Assign one employee to a shift on every applicable date of a range
    ///
    /// The insert is atomic: if any batch fails, nothing from this call is
    /// persisted and the error is returned.
    pub async fn bulk_assign(&self, command: BulkAssignCommand) -> Result<BulkAssignResult, ShiftError> {
        let plan = self.plan_bulk_assign(&command).await?;

        let batches: Vec<&[NewShiftAssignment]> = plan.fresh.chunks(INSERT_BATCH_SIZE).collect();
        let created = if batches.is_empty() {
            Vec::new()
        } else {
            self.assignment_repository
                .insert_assignment_batches(&batches)
                .await?
        };

        // Rows the unique key rejected were written by someone else after the check
        let lost_races = plan.fresh.len() - created.len();
        if lost_races > 0 {
            warn!(
                "{} assignments for employee {} on shift {} appeared after the duplicate check",
                lost_races, plan.employee_id, plan.shift.id
            );
        }

        let skipped_duplicates = plan.duplicates.len() + lost_races;
        info!(
            "Bulk assignment for employee {} on shift '{}': {} created, {} skipped",
            plan.employee_id,
            plan.shift.name,
            created.len(),
            skipped_duplicates
        );

        Ok(BulkAssignResult {
            created,
            skipped_duplicates,
        })
    }

    /// Assign several employees to one shift on one date
    ///
    /// Rows are inserted one by one. The first failure stops the loop;
    /// rows created before it stay.
    pub async fn quick_assign(&self, command: QuickAssignCommand) -> Result<QuickAssignResult, ShiftError> {
        let shift_id = command
            .shift_id
            .ok_or_else(|| ShiftError::validation("A shift must be selected"))?;
        if command.employee_ids.is_empty() {
            return Err(ShiftError::validation("At least one employee must be selected"));
        }

        let shift = self.load_shift(shift_id).await?;
        info!(
            "Quick assigning {} employees to shift '{}' on {}",
            command.employee_ids.len(),
            shift.name,
            format_date(command.date)
        );

        let mut created = Vec::new();
        let mut skipped_duplicates = 0;

        for employee_id in command.employee_ids {
            let row = NewShiftAssignment {
                employee_id,
                shift_id,
                date: command.date,
            };

            match self.assignment_repository.insert_assignment(&row).await {
                Ok(Some(assignment)) => created.push(assignment),
                Ok(None) => skipped_duplicates += 1,
                Err(source) => {
                    warn!("Quick assignment failed for employee {}: {}", employee_id, source);
                    return Err(ShiftError::QuickAssignFailed {
                        employee_id,
                        created: created.len(),
                        source,
                    });
                }
            }
        }

        Ok(QuickAssignResult {
            created,
            skipped_duplicates,
        })
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListQuery,
    ) -> Result<Vec<ShiftAssignment>, ShiftError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            validate_range(start, end)?;
        }

        let assignments = self.assignment_repository.list_assignments(&query).await?;
        info!("Found {} assignments", assignments.len());
        Ok(assignments)
    }

    pub async fn delete_assignment(&self, assignment_id: i64) -> Result<(), ShiftError> {
        info!("Deleting assignment: {}", assignment_id);

        if !self.assignment_repository.delete_assignment(assignment_id).await? {
            warn!("Assignment not found for deletion: {}", assignment_id);
            return Err(ShiftError::not_found("Assignment", assignment_id));
        }
        Ok(())
    }

    /// Delete several assignments, reporting the IDs that did not exist
    pub async fn delete_assignments(
        &self,
        command: DeleteAssignmentsCommand,
    ) -> Result<DeleteAssignmentsResult, ShiftError> {
        if command.assignment_ids.is_empty() {
            return Err(ShiftError::validation("No assignment IDs provided"));
        }

        let requested: BTreeSet<i64> = command.assignment_ids.into_iter().collect();
        let ids: Vec<i64> = requested.iter().copied().collect();
        let deleted: BTreeSet<i64> = self
            .assignment_repository
            .delete_assignments(&ids)
            .await?
            .into_iter()
            .collect();

        let not_found_ids: Vec<i64> = requested.difference(&deleted).copied().collect();
        info!(
            "Deleted {} assignments, {} not found",
            deleted.len(),
            not_found_ids.len()
        );

        Ok(DeleteAssignmentsResult {
            deleted_count: deleted.len(),
            not_found_ids,
        })
    }

    /// Validate the command, expand the range and split off stored duplicates
    async fn plan_bulk_assign(&self, command: &BulkAssignCommand) -> Result<BulkPlan, ShiftError> {
        let shift_id = command
            .shift_id
            .ok_or_else(|| ShiftError::validation("A shift must be selected"))?;
        let employee_id = command
            .employee_id
            .ok_or_else(|| ShiftError::validation("An employee must be selected"))?;
        let start = command
            .start_date
            .ok_or_else(|| ShiftError::validation("A start date is required"))?;
        let end = command
            .end_date
            .ok_or_else(|| ShiftError::validation("An end date is required"))?;

        // Reject a reversed or overlong range before touching storage
        validate_expansion_range(start, end)?;

        let shift = self.load_shift(shift_id).await?;
        if self
            .employee_repository
            .get_employee(employee_id)
            .await?
            .is_none()
        {
            return Err(ShiftError::not_found("Employee", employee_id));
        }

        let candidates = expand_date_range(&shift, employee_id, start, end, &command.options)?;
        let existing = self
            .find_existing(employee_id, shift.id, &candidates)
            .await?;

        let (duplicates, fresh): (Vec<NewShiftAssignment>, Vec<NewShiftAssignment>) = candidates
            .into_iter()
            .partition(|candidate| existing.contains(&candidate.date));

        info!(
            "Planned bulk assignment for employee {} on shift {} from {} to {}: {} new, {} existing",
            employee_id,
            shift.id,
            format_date(start),
            format_date(end),
            fresh.len(),
            duplicates.len()
        );

        Ok(BulkPlan {
            shift,
            employee_id,
            fresh,
            duplicates: duplicates.into_iter().map(|d| d.date).collect(),
        })
    }

    async fn find_existing(
        &self,
        employee_id: i64,
        shift_id: i64,
        candidates: &[NewShiftAssignment],
    ) -> Result<BTreeSet<NaiveDate>, ShiftError> {
        let dates: Vec<NaiveDate> = candidates.iter().map(|c| c.date).collect();
        let mut existing = BTreeSet::new();

        for batch in dates.chunks(DUPLICATE_CHECK_BATCH_SIZE) {
            let found = self
                .assignment_repository
                .find_existing_dates(employee_id, shift_id, batch)
                .await?;
            existing.extend(found);
        }

        Ok(existing)
    }

    async fn load_shift(&self, shift_id: i64) -> Result<ShiftDefinition, ShiftError> {
        self.shift_repository
            .get_shift(shift_id)
            .await?
            .ok_or_else(|| ShiftError::not_found("Shift", shift_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_expansion::{parse_date, ExpansionOptions};
    use crate::domain::models::{NewEmployee, NewShiftDefinition, WeekdaySet};
    use crate::error::StorageResult;
    use crate::storage::{AssignmentRepository, DbConnection, EmployeeRepository, ShiftRepository};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime};
    use std::sync::Mutex;

    /// Wraps the SQLite repository and records how storage was called
    struct RecordingAssignments {
        inner: AssignmentRepository,
        existing_lookups: Mutex<Vec<usize>>,
        insert_batches: Mutex<Vec<usize>>,
    }

    impl RecordingAssignments {
        fn new(inner: AssignmentRepository) -> Self {
            Self {
                inner,
                existing_lookups: Mutex::new(Vec::new()),
                insert_batches: Mutex::new(Vec::new()),
            }
        }

        fn existing_lookups(&self) -> Vec<usize> {
            self.existing_lookups.lock().unwrap().clone()
        }

        fn insert_batches(&self) -> Vec<usize> {
            self.insert_batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssignmentStorage for RecordingAssignments {
        async fn find_existing_dates(
            &self,
            employee_id: i64,
            shift_id: i64,
            dates: &[NaiveDate],
        ) -> StorageResult<Vec<NaiveDate>> {
            self.existing_lookups.lock().unwrap().push(dates.len());
            self.inner.find_existing_dates(employee_id, shift_id, dates).await
        }

        async fn insert_assignment_batches(
            &self,
            batches: &[&[NewShiftAssignment]],
        ) -> StorageResult<Vec<ShiftAssignment>> {
            self.insert_batches
                .lock()
                .unwrap()
                .extend(batches.iter().map(|b| b.len()));
            self.inner.insert_assignment_batches(batches).await
        }

        async fn insert_assignment(
            &self,
            assignment: &NewShiftAssignment,
        ) -> StorageResult<Option<ShiftAssignment>> {
            self.inner.insert_assignment(assignment).await
        }

        async fn list_assignments(
            &self,
            query: &AssignmentListQuery,
        ) -> StorageResult<Vec<ShiftAssignment>> {
            self.inner.list_assignments(query).await
        }

        async fn delete_assignment(&self, assignment_id: i64) -> StorageResult<bool> {
            self.inner.delete_assignment(assignment_id).await
        }

        async fn delete_assignments(&self, assignment_ids: &[i64]) -> StorageResult<Vec<i64>> {
            self.inner.delete_assignments(assignment_ids).await
        }
    }

    struct TestContext {
        service: ShiftAssignmentService,
        recorder: Arc<RecordingAssignments>,
        every_day_shift: i64,
        morning_shift: i64,
        employee_id: i64,
        other_employee_id: i64,
    }

    async fn setup_test() -> TestContext {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        let shifts = Arc::new(ShiftRepository::new(db.clone()));
        let employees = Arc::new(EmployeeRepository::new(db.clone()));
        let recorder = Arc::new(RecordingAssignments::new(AssignmentRepository::new(db)));

        let every_day_shift = shifts
            .store_shift(&NewShiftDefinition {
                name: "Opening".to_string(),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                recurrence: WeekdaySet::every_day(),
                min_staff: 1,
                max_staff: 3,
                center_id: 1,
            })
            .await
            .unwrap()
            .id;
        let morning_shift = shifts
            .store_shift(&NewShiftDefinition {
                name: "Morning".to_string(),
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                recurrence: WeekdaySet::weekdays(),
                min_staff: 2,
                max_staff: 4,
                center_id: 1,
            })
            .await
            .unwrap()
            .id;

        let mut employee_ids = Vec::new();
        for name in ["Lucía", "Pablo"] {
            let employee = employees
                .store_employee(&NewEmployee {
                    name: name.to_string(),
                    center_id: 1,
                    active: true,
                })
                .await
                .unwrap();
            employee_ids.push(employee.id);
        }

        let service = ShiftAssignmentService::new(shifts, employees, recorder.clone());

        TestContext {
            service,
            recorder,
            every_day_shift,
            morning_shift,
            employee_id: employee_ids[0],
            other_employee_id: employee_ids[1],
        }
    }

    fn date(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn bulk(shift_id: i64, employee_id: i64, start: NaiveDate, end: NaiveDate) -> BulkAssignCommand {
        BulkAssignCommand {
            shift_id: Some(shift_id),
            employee_id: Some(employee_id),
            start_date: Some(start),
            end_date: Some(end),
            options: ExpansionOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_morning_shift_week_end_to_end() {
        let ctx = setup_test().await;

        let result = ctx
            .service
            .bulk_assign(bulk(ctx.morning_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-09")))
            .await
            .unwrap();

        let dates: Vec<String> = result.created.iter().map(|a| format_date(a.date)).collect();
        assert_eq!(
            dates,
            vec!["2025-11-03", "2025-11-04", "2025-11-05", "2025-11-06", "2025-11-07"]
        );
        assert_eq!(result.skipped_duplicates, 0);
    }

    #[tokio::test]
    async fn test_bulk_assign_is_idempotent() {
        let ctx = setup_test().await;
        let command = bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-01"), date("2025-11-30"));

        let first = ctx.service.bulk_assign(command.clone()).await.unwrap();
        assert_eq!(first.created.len(), 30);
        assert_eq!(first.skipped_duplicates, 0);

        let second = ctx.service.bulk_assign(command).await.unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.skipped_duplicates, 30);
        // Nothing left to insert on the second run
        assert_eq!(ctx.recorder.insert_batches(), vec![30]);
    }

    #[tokio::test]
    async fn test_reversed_range_makes_no_storage_calls() {
        let ctx = setup_test().await;

        let result = ctx
            .service
            .bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-09"), date("2025-11-03")))
            .await;

        assert!(matches!(result, Err(ShiftError::Validation(_))));
        assert!(ctx.recorder.existing_lookups().is_empty());
        assert!(ctx.recorder.insert_batches().is_empty());
    }

    #[tokio::test]
    async fn test_missing_end_date_makes_no_storage_calls() {
        let ctx = setup_test().await;
        let command = BulkAssignCommand {
            end_date: None,
            ..bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-03"))
        };

        let result = ctx.service.bulk_assign(command).await;

        assert!(matches!(result, Err(ShiftError::Validation(msg)) if msg.contains("end date")));
        assert!(ctx.recorder.existing_lookups().is_empty());
        assert!(ctx.recorder.insert_batches().is_empty());
        assert!(ctx
            .service
            .list_assignments(AssignmentListQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_overlong_range_makes_no_storage_calls() {
        let ctx = setup_test().await;

        let result = ctx
            .service
            .preview_bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, date("0001-01-01"), date("9999-12-31")))
            .await;

        assert!(matches!(result, Err(ShiftError::Validation(_))));
        assert!(ctx.recorder.existing_lookups().is_empty());
    }

    #[tokio::test]
    async fn test_missing_selection_is_rejected() {
        let ctx = setup_test().await;

        let no_shift = BulkAssignCommand {
            shift_id: None,
            ..bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-04"))
        };
        assert!(matches!(
            ctx.service.bulk_assign(no_shift).await,
            Err(ShiftError::Validation(_))
        ));

        let no_employee = BulkAssignCommand {
            employee_id: None,
            ..bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-04"))
        };
        assert!(matches!(
            ctx.service.bulk_assign(no_employee).await,
            Err(ShiftError::Validation(_))
        ));

        let unknown_shift = bulk(999, ctx.employee_id, date("2025-11-03"), date("2025-11-04"));
        assert!(matches!(
            ctx.service.bulk_assign(unknown_shift).await,
            Err(ShiftError::NotFound { entity: "Shift", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_check_batches_of_200() {
        let ctx = setup_test().await;
        let start = date("2025-01-01");
        let end = start + Duration::days(200);

        let preview = ctx
            .service
            .preview_bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, start, end))
            .await
            .unwrap();

        assert_eq!(preview.candidate_dates.len(), 201);
        assert_eq!(ctx.recorder.existing_lookups(), vec![200, 1]);
        assert!(ctx.recorder.insert_batches().is_empty(), "Preview never writes");
    }

    #[tokio::test]
    async fn test_insert_batches_of_50() {
        let ctx = setup_test().await;
        let start = date("2025-01-01");

        ctx.service
            .bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, start, start + Duration::days(49)))
            .await
            .unwrap();
        assert_eq!(ctx.recorder.insert_batches(), vec![50]);

        let result = ctx
            .service
            .bulk_assign(bulk(ctx.every_day_shift, ctx.other_employee_id, start, start + Duration::days(50)))
            .await
            .unwrap();
        assert_eq!(result.created.len(), 51);
        assert_eq!(ctx.recorder.insert_batches(), vec![50, 50, 1]);
    }

    #[tokio::test]
    async fn test_preview_reports_existing_dates() {
        let ctx = setup_test().await;
        ctx.service
            .bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-04"), date("2025-11-05")))
            .await
            .unwrap();

        let preview = ctx
            .service
            .preview_bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-06")))
            .await
            .unwrap();

        assert_eq!(preview.candidate_dates.len(), 4);
        assert_eq!(preview.duplicate_dates, vec![date("2025-11-04"), date("2025-11-05")]);
    }

    #[tokio::test]
    async fn test_quick_assign_skips_existing_rows() {
        let ctx = setup_test().await;
        let day = date("2025-11-05");

        let first = ctx
            .service
            .quick_assign(QuickAssignCommand {
                shift_id: Some(ctx.morning_shift),
                employee_ids: vec![ctx.employee_id],
                date: day,
            })
            .await
            .unwrap();
        assert_eq!(first.created.len(), 1);

        let second = ctx
            .service
            .quick_assign(QuickAssignCommand {
                shift_id: Some(ctx.morning_shift),
                employee_ids: vec![ctx.employee_id, ctx.other_employee_id],
                date: day,
            })
            .await
            .unwrap();
        assert_eq!(second.created.len(), 1);
        assert_eq!(second.created[0].employee_id, ctx.other_employee_id);
        assert_eq!(second.skipped_duplicates, 1);
    }

    #[tokio::test]
    async fn test_quick_assign_validation() {
        let ctx = setup_test().await;

        let no_shift = ctx
            .service
            .quick_assign(QuickAssignCommand {
                shift_id: None,
                employee_ids: vec![ctx.employee_id],
                date: date("2025-11-05"),
            })
            .await;
        assert!(matches!(no_shift, Err(ShiftError::Validation(_))));

        let nobody = ctx
            .service
            .quick_assign(QuickAssignCommand {
                shift_id: Some(ctx.morning_shift),
                employee_ids: Vec::new(),
                date: date("2025-11-05"),
            })
            .await;
        assert!(matches!(nobody, Err(ShiftError::Validation(_))));
    }

    #[tokio::test]
    async fn test_quick_assign_failure_names_employee_and_keeps_earlier_rows() {
        let ctx = setup_test().await;
        let unknown_employee = ctx.other_employee_id + 500;

        let result = ctx
            .service
            .quick_assign(QuickAssignCommand {
                shift_id: Some(ctx.morning_shift),
                employee_ids: vec![ctx.employee_id, unknown_employee, ctx.other_employee_id],
                date: date("2025-11-05"),
            })
            .await;

        match result {
            Err(ShiftError::QuickAssignFailed {
                employee_id,
                created,
                ..
            }) => {
                assert_eq!(employee_id, unknown_employee);
                assert_eq!(created, 1);
            }
            other => panic!("Expected QuickAssignFailed, got {:?}", other),
        }

        let stored = ctx
            .service
            .list_assignments(AssignmentListQuery::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].employee_id, ctx.employee_id);
    }

    #[tokio::test]
    async fn test_delete_assignments_reports_missing_ids() {
        let ctx = setup_test().await;
        let created = ctx
            .service
            .bulk_assign(bulk(ctx.every_day_shift, ctx.employee_id, date("2025-11-03"), date("2025-11-04")))
            .await
            .unwrap()
            .created;

        let result = ctx
            .service
            .delete_assignments(DeleteAssignmentsCommand {
                assignment_ids: vec![created[0].id, created[1].id, 4040],
            })
            .await
            .unwrap();

        assert_eq!(result.deleted_count, 2);
        assert_eq!(result.not_found_ids, vec![4040]);
        assert!(matches!(
            ctx.service.delete_assignment(created[0].id).await,
            Err(ShiftError::NotFound { .. })
        ));
    }
}
