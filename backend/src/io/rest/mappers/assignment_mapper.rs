//! Conversions for assignment requests and responses.
//!
//! Every date string crossing the boundary is parsed here, so the services
//! only ever see `NaiveDate` values.

use chrono::NaiveDate;
use shared::{
    AssignmentListResponse, BulkAssignPreviewResponse, BulkAssignRequest, BulkAssignResponse,
    DeleteAssignmentsRequest, DeleteAssignmentsResponse, QuickAssignRequest, QuickAssignResponse,
    ShiftAssignment as SharedAssignment,
};
use std::collections::BTreeSet;

use crate::domain::commands::assignments::{
    BulkAssignCommand, BulkAssignPreview, BulkAssignResult, DeleteAssignmentsCommand,
    DeleteAssignmentsResult, QuickAssignCommand, QuickAssignResult,
};
use crate::domain::date_expansion::{format_date, parse_date, ExpansionOptions};
use crate::domain::models::{ShiftAssignment as DomainAssignment, WeekdaySet};
use crate::error::ShiftError;

/// Mapper to convert between shared assignment DTOs and domain commands.
pub struct AssignmentMapper;

impl AssignmentMapper {
    pub fn to_bulk_command(request: BulkAssignRequest) -> Result<BulkAssignCommand, ShiftError> {
        let start_date = request.start_date.as_deref().map(parse_date).transpose()?;
        let end_date = request.end_date.as_deref().map(parse_date).transpose()?;
        let exclude_dates: BTreeSet<NaiveDate> = request
            .exclude_dates
            .iter()
            .map(|d| parse_date(d))
            .collect::<Result<_, ShiftError>>()?;

        Ok(BulkAssignCommand {
            shift_id: request.shift_id,
            employee_id: request.employee_id,
            start_date,
            end_date,
            options: ExpansionOptions {
                exclude_weekends: request.exclude_weekends,
                selected_days: request
                    .selected_days
                    .map(|days| WeekdaySet::from_flags(days.as_array())),
                exclude_dates,
            },
        })
    }

    pub fn to_quick_command(request: QuickAssignRequest) -> Result<QuickAssignCommand, ShiftError> {
        Ok(QuickAssignCommand {
            shift_id: request.shift_id,
            employee_ids: request.employee_ids,
            date: parse_date(&request.date)?,
        })
    }

    pub fn to_delete_command(request: DeleteAssignmentsRequest) -> DeleteAssignmentsCommand {
        DeleteAssignmentsCommand {
            assignment_ids: request.assignment_ids,
        }
    }

    pub fn to_dto(domain: DomainAssignment) -> SharedAssignment {
        SharedAssignment {
            id: domain.id,
            employee_id: domain.employee_id,
            shift_id: domain.shift_id,
            date: format_date(domain.date),
        }
    }

    pub fn to_assignment_list_dto(assignments: Vec<DomainAssignment>) -> AssignmentListResponse {
        AssignmentListResponse {
            assignments: assignments.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_bulk_response_dto(result: BulkAssignResult) -> BulkAssignResponse {
        let created = result.created.len();
        BulkAssignResponse {
            created,
            skipped_duplicates: result.skipped_duplicates,
            created_dates: result.created.into_iter().map(|a| format_date(a.date)).collect(),
            success_message: format!(
                "{} assignments created, {} duplicates skipped",
                created, result.skipped_duplicates
            ),
        }
    }

    pub fn to_preview_dto(preview: BulkAssignPreview) -> BulkAssignPreviewResponse {
        BulkAssignPreviewResponse {
            candidate_dates: preview.candidate_dates.into_iter().map(format_date).collect(),
            duplicate_dates: preview.duplicate_dates.into_iter().map(format_date).collect(),
        }
    }

    pub fn to_quick_response_dto(result: QuickAssignResult) -> QuickAssignResponse {
        let created = result.created.len();
        QuickAssignResponse {
            created,
            skipped_duplicates: result.skipped_duplicates,
            success_message: format!(
                "{} employees assigned, {} already assigned",
                created, result.skipped_duplicates
            ),
        }
    }

    pub fn to_delete_response_dto(result: DeleteAssignmentsResult) -> DeleteAssignmentsResponse {
        let success_message = if result.not_found_ids.is_empty() {
            format!("{} assignments deleted", result.deleted_count)
        } else {
            format!(
                "{} assignments deleted, {} not found",
                result.deleted_count,
                result.not_found_ids.len()
            )
        };

        DeleteAssignmentsResponse {
            deleted_count: result.deleted_count,
            not_found_ids: result.not_found_ids,
            success_message,
        }
    }
}
