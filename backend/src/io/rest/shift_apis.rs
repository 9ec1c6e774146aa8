//! # REST API for Shift Definitions
//!
//! Endpoints for creating, listing, retrieving and deleting shifts.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::CreateShiftRequest;
use tracing::info;

use crate::domain::commands::shifts::ShiftListQuery;
use crate::error::ShiftError;
use crate::io::rest::mappers::ShiftMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ShiftListParams {
    pub center_id: Option<i64>,
}

/// Create a router for shift related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts).post(create_shift))
        .route("/:id", get(get_shift).delete(delete_shift))
}

/// Create a new shift
async fn create_shift(
    State(state): State<AppState>,
    Json(request): Json<CreateShiftRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/shifts - request: {:?}", request);

    let new_shift = ShiftMapper::to_new_domain(request)?;
    let shift = state.shift_service.create_shift(new_shift).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShiftMapper::to_shift_response_dto(shift, "Shift created successfully")),
    ))
}

/// List shifts, optionally for one center
async fn list_shifts(
    State(state): State<AppState>,
    Query(params): Query<ShiftListParams>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/shifts - query: {:?}", params);

    let shifts = state
        .shift_service
        .list_shifts(ShiftListQuery {
            center_id: params.center_id,
        })
        .await?;

    Ok(Json(ShiftMapper::to_shift_list_dto(shifts)))
}

/// Get a shift by ID
async fn get_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i64>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/shifts/{}", shift_id);

    let shift = state.shift_service.get_shift(shift_id).await?;
    Ok(Json(ShiftMapper::to_dto(shift)))
}

/// Delete a shift and its assignments
async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i64>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("DELETE /api/shifts/{}", shift_id);

    state.shift_service.delete_shift(shift_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
