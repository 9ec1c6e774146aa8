use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Datelike;
use serde::Deserialize;
use tracing::info;

use crate::domain::date_expansion::today_local;
use crate::error::ShiftError;
use crate::AppState;

/// Query parameters for calendar month API; month and year default to today
#[derive(Debug, Deserialize)]
pub struct CalendarMonthQuery {
    pub center_id: i64,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Create a router for calendar related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/month", get(get_calendar_month))
}

/// Get the shift coverage grid of one center for one month
async fn get_calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> Result<impl IntoResponse, ShiftError> {
    info!("GET /api/calendar/month - query: {:?}", query);

    let today = today_local();
    let month = query.month.unwrap_or_else(|| today.month());
    let year = query.year.unwrap_or_else(|| today.year());

    let calendar = state
        .calendar_service
        .get_calendar_month(query.center_id, month, year)
        .await?;

    Ok(Json(calendar))
}
