use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::{Date, Month};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    dates::{iso_date, today_utc},
    entries::services::list_entries,
    error::{ApiError, ApiResult},
    goals::repo as profiles,
    state::AppState,
};

use super::aggregation::{self, DailyIntake, DashboardSummary, MonthCalendar};

pub fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/intake/daily", get(daily_intake))
        .route("/intake/calendar", get(calendar))
        .route("/dashboard", get(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    #[serde(default, deserialize_with = "iso_date::deserialize_option")]
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

async fn profile_goal(state: &AppState, user_id: Uuid) -> ApiResult<Option<i32>> {
    Ok(profiles::find_by_user(&state.db, user_id)
        .await?
        .map(|p| p.daily_calorie_goal))
}

#[instrument(skip(state))]
pub async fn daily_intake(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> ApiResult<Json<DailyIntake>> {
    let date = q.date.unwrap_or_else(today_utc);
    let entries = list_entries(&state, user_id, date, date).await?;
    Ok(Json(DailyIntake::from_entries(date, entries)))
}

#[instrument(skip(state))]
pub async fn calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MonthQuery>,
) -> ApiResult<Json<MonthCalendar>> {
    let today = today_utc();
    let year = q.year.unwrap_or(today.year());
    let month = match q.month {
        Some(m) => Month::try_from(m)
            .map_err(|_| ApiError::BadRequest("month must be 1-12".into()))?,
        None => today.month(),
    };
    let (first, last) = aggregation::month_bounds(year, month)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let entries = list_entries(&state, user_id, first, last).await?;
    let goal = profile_goal(&state, user_id).await?;
    let cal = aggregation::month_calendar(
        year,
        month,
        entries,
        aggregation::effective_goal(goal),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(cal))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> ApiResult<Json<DashboardSummary>> {
    let date = q.date.unwrap_or_else(today_utc);
    let entries = list_entries(&state, user_id, date, date).await?;
    let goal = profile_goal(&state, user_id).await?;
    Ok(Json(aggregation::dashboard(date, entries, goal)))
}
