use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::{food_db::FoodAnalysis, services::analyze_food_image};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn recognition_routes() -> Router<AppState> {
    Router::new()
        .route("/recognize", post(recognize))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
}

/// POST /recognize (multipart, field `image`)
#[instrument(skip(state, mp))]
pub async fn recognize(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> ApiResult<Json<FoodAnalysis>> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            if data.is_empty() {
                return Err(ApiError::BadRequest("image is empty".into()));
            }
            let analysis = analyze_food_image(state.classifier.as_deref(), &data).await;
            return Ok(Json(analysis));
        }
    }
    Err(ApiError::BadRequest("image is required".into()))
}
