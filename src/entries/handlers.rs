use std::collections::HashMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    dates::today_utc,
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::{
    dto::{CreateEntryRequest, EntriesQuery, FoodEntry},
    services::{self, UploadItem},
};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route(
            "/entries/upload",
            post(create_entry_multipart).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<EntriesQuery>,
) -> ApiResult<Json<Vec<FoodEntry>>> {
    let (from, to) = services::resolve_range(&q, today_utc())?;
    let entries = services::list_entries(&state, user_id, from, to).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> ApiResult<(StatusCode, Json<FoodEntry>)> {
    let entry = services::validate(payload, today_utc())?;
    let saved = services::create_entry(&state, user_id, entry, None).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// POST /entries/upload (multipart)
/// Text fields: date, food_name, calories, protein, carbs, fat. Optional file field: image.
#[instrument(skip(state, mp))]
pub async fn create_entry_multipart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> ApiResult<(StatusCode, Json<FoodEntry>)> {
    let bad = |e: axum::extract::multipart::MultipartError| ApiError::BadRequest(e.to_string());

    let mut fields = HashMap::new();
    let mut image = None;
    while let Some(field) = mp.next_field().await.map_err(bad)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "image" {
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".into());
            let body = field.bytes().await.map_err(bad)?;
            if !body.is_empty() {
                image = Some(UploadItem { body, content_type });
            }
        } else {
            fields.insert(name, field.text().await.map_err(bad)?);
        }
    }

    let entry = services::validate(services::request_from_fields(&fields)?, today_utc())?;
    let saved = services::create_entry(&state, user_id, entry, image).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
