//! # Shift Scheduling Backend
//!
//! Backend for the shift scheduling part of the La Jungla Ibérica management
//! app: shift definitions, employees, bulk and single-day shift assignment,
//! and the monthly coverage calendar.
//!
//! ## Architecture
//!
//! - **storage**: SQLite persistence behind storage traits
//! - **domain**: business rules and services, independent of HTTP
//! - **io**: REST handlers, DTO mappers and the API key check
//!
//! The services receive their repositories explicitly through [`AppState`];
//! there is no global database client.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::{EmployeeService, ShiftAssignmentService, ShiftCalendarService, ShiftService};
use crate::io::rest::{assignment_apis, auth, calendar_apis, employee_apis, shift_apis};
use crate::storage::{AssignmentStorage, Connection, EmployeeStorage, ShiftStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub shift_service: ShiftService,
    pub employee_service: EmployeeService,
    pub assignment_service: ShiftAssignmentService,
    pub calendar_service: ShiftCalendarService,
    /// Key every `/api` request must present
    pub api_key: Arc<str>,
}

impl AppState {
    /// Wire every service to repositories created from `connection`
    pub fn new<C: Connection>(connection: &C, api_key: &str) -> Self {
        info!("Setting up domain model");

        let shifts: Arc<dyn ShiftStorage> = Arc::new(connection.create_shift_repository());
        let employees: Arc<dyn EmployeeStorage> = Arc::new(connection.create_employee_repository());
        let assignments: Arc<dyn AssignmentStorage> =
            Arc::new(connection.create_assignment_repository());

        Self {
            shift_service: ShiftService::new(shifts.clone()),
            employee_service: EmployeeService::new(employees.clone()),
            assignment_service: ShiftAssignmentService::new(
                shifts.clone(),
                employees,
                assignments.clone(),
            ),
            calendar_service: ShiftCalendarService::new(shifts, assignments),
            api_key: Arc::from(api_key),
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: HeaderValue) -> Router {
    // CORS setup to allow the dashboard to make requests
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(auth::API_KEY_HEADER),
        ]);

    let api_routes = Router::new()
        .nest("/shifts", shift_apis::router())
        .nest("/employees", employee_apis::router())
        .nest("/assignments", assignment_apis::router())
        .nest("/calendar", calendar_apis::router())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
