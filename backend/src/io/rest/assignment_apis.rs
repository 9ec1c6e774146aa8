//! # REST API for Shift Assignments
//!
//! Endpoints for bulk and single-day assignment, listing and deletion.
//! After a bulk or quick assignment the client re-fetches
//! `GET /api/assignments` for the range it displays.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use shared::{BulkAssignRequest, DeleteAssignmentsRequest, QuickAssignRequest};
use tracing::info;

use crate::domain::commands::assignments::AssignmentListQuery;
use crate::domain::date_expansion::parse_date;
use crate::error::ShiftError;
use crate::io::rest::mappers::AssignmentMapper;
use crate::AppState;

/// Query parameters for listing assignments; dates are YYYY-MM-DD
#[derive(Debug, Default, Deserialize)]
pub struct AssignmentListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub shift_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub center_id: Option<i64>,
}

impl AssignmentListParams {
    fn to_query(&self) -> Result<AssignmentListQuery, ShiftError> {
        Ok(AssignmentListQuery {
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            shift_id: self.shift_id,
            employee_id: self.employee_id,
            center_id: self.center_id,
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments))
        .route("/bulk", post(bulk_assign))
        .route("/bulk/preview", post(preview_bulk_assign))
        .route("/quick", post(quick_assign))
        .route("/delete", post(delete_assignments))
        .route("/:id", delete(delete_assignment))
}

async fn list_assignments(
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/assignments - query: {:?}", params);

    let assignments = state
        .assignment_service
        .list_assignments(params.to_query()?)
        .await?;

    Ok(Json(AssignmentMapper::to_assignment_list_dto(assignments)))
}

/// Assign one employee to a shift over a date range
async fn bulk_assign(
    State(state): State<AppState>,
    Json(request): Json<BulkAssignRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/assignments/bulk - request: {:?}", request);

    let command = AssignmentMapper::to_bulk_command(request)?;
    let result = state.assignment_service.bulk_assign(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentMapper::to_bulk_response_dto(result)),
    ))
}

/// Show which dates a bulk assignment would create and which already exist
async fn preview_bulk_assign(
    State(state): State<AppState>,
    Json(request): Json<BulkAssignRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/assignments/bulk/preview - request: {:?}", request);

    let command = AssignmentMapper::to_bulk_command(request)?;
    let preview = state.assignment_service.preview_bulk_assign(command).await?;

    Ok(Json(AssignmentMapper::to_preview_dto(preview)))
}

/// Assign several employees to one shift on one date
async fn quick_assign(
    State(state): State<AppState>,
    Json(request): Json<QuickAssignRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/assignments/quick - request: {:?}", request);

    let command = AssignmentMapper::to_quick_command(request)?;
    let result = state.assignment_service.quick_assign(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(AssignmentMapper::to_quick_response_dto(result)),
    ))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("DELETE /api/assignments/{}", assignment_id);

    state.assignment_service.delete_assignment(assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_assignments(
    State(state): State<AppState>,
    Json(request): Json<DeleteAssignmentsRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/assignments/delete - request: {:?}", request);

    let result = state
        .assignment_service
        .delete_assignments(AssignmentMapper::to_delete_command(request))
        .await?;

    Ok(Json(AssignmentMapper::to_delete_response_dto(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_parse_dates() {
        let params = AssignmentListParams {
            start_date: Some("2025-11-01".to_string()),
            end_date: Some("2025-11-30".to_string()),
            center_id: Some(2),
            ..Default::default()
        };

        let query = params.to_query().unwrap();
        assert_eq!(query.start_date.map(|d| d.to_string()), Some("2025-11-01".to_string()));
        assert_eq!(query.center_id, Some(2));
    }

    #[test]
    fn test_list_params_reject_bad_date() {
        let params = AssignmentListParams {
            end_date: Some("November".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.to_query(), Err(ShiftError::Validation(_))));
    }
}
