//! # REST API for Employees

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use shared::{CreateEmployeeRequest, SetEmployeeActiveRequest};
use tracing::info;

use crate::domain::commands::employees::EmployeeListQuery;
use crate::error::ShiftError;
use crate::io::rest::mappers::EmployeeMapper;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeListParams {
    pub center_id: Option<i64>,
    #[serde(default)]
    pub active_only: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/:id", get(get_employee))
        .route("/:id/active", put(set_employee_active))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("POST /api/employees - request: {:?}", request);

    let employee = state
        .employee_service
        .create_employee(EmployeeMapper::to_new_domain(request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeMapper::to_employee_response_dto(
            employee,
            "Employee created successfully",
        )),
    ))
}

async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListParams>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/employees - query: {:?}", params);

    let employees = state
        .employee_service
        .list_employees(EmployeeListQuery {
            center_id: params.center_id,
            active_only: params.active_only,
        })
        .await?;

    Ok(Json(EmployeeMapper::to_employee_list_dto(employees)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/employees/{}", employee_id);

    let employee = state.employee_service.get_employee(employee_id).await?;
    Ok(Json(EmployeeMapper::to_dto(employee)))
}

async fn set_employee_active(
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<SetEmployeeActiveRequest>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("PUT /api/employees/{}/active - request: {:?}", employee_id, request);

    let employee = state
        .employee_service
        .set_active(employee_id, request.active)
        .await?;
    let message = if employee.active {
        "Employee activated"
    } else {
        "Employee deactivated"
    };

    Ok(Json(EmployeeMapper::to_employee_response_dto(employee, message)))
}
