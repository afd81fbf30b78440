use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::services::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::{
    calculator,
    dto::{GoalPreview, GoalRequest},
    repo::{self, NewProfile, UserProfile},
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals/preview", post(preview_goal))
        .route("/profile", get(get_profile).post(create_profile))
}

#[instrument(skip(payload))]
pub async fn preview_goal(
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GoalRequest>,
) -> ApiResult<Json<GoalPreview>> {
    let breakdown = calculator::breakdown(&payload.to_input())?;
    Ok(Json(GoalPreview {
        training_frequency: payload.activity(),
        breakdown,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GoalRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let goal = calculator::daily_calorie_goal(&payload.to_input()).map_err(|e| {
        warn!(error = %e, "goal calculation rejected");
        ApiError::from(e)
    })?;

    let new_profile = NewProfile {
        current_weight: payload.current_weight,
        height: payload.height,
        ideal_weight: payload.ideal_weight,
        age: i32::try_from(payload.age)
            .map_err(|_| ApiError::BadRequest("age out of range".into()))?,
        sex: payload.sex,
        training_frequency: payload.activity(),
        target_timeline_days: payload.target_timeline_days,
        daily_calorie_goal: goal,
    };

    let profile = repo::insert(&state.db, user_id, &new_profile)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, "profile already exists");
            ApiError::Conflict("Profile already exists".into())
        })?;

    info!(%user_id, daily_calorie_goal = goal, "profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    repo::find_by_user(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))
}
