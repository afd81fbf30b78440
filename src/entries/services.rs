use std::collections::HashMap;

use bytes::Bytes;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateEntryRequest, EntriesQuery, FoodEntry},
    repo::{self, FoodEntryRow, NewEntry},
};
use crate::{dates::parse_iso_date, error::ApiError, state::AppState};

pub const IMAGE_URL_TTL_SECS: u64 = 30 * 60;

/// Widest range a single listing may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

pub fn validate(req: CreateEntryRequest, today: Date) -> Result<NewEntry, ApiError> {
    let food_name = req.food_name.trim().to_string();
    if food_name.is_empty() {
        return Err(ApiError::BadRequest("food_name is required".into()));
    }
    for (name, v) in [
        ("calories", req.calories),
        ("protein", req.protein),
        ("carbs", req.carbs),
        ("fat", req.fat),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "{name} must be a non-negative number"
            )));
        }
    }
    Ok(NewEntry {
        date: req.date.unwrap_or(today),
        food_name,
        calories: req.calories,
        protein: req.protein,
        carbs: req.carbs,
        fat: req.fat,
    })
}

/// Builds a create request from multipart text fields.
pub fn request_from_fields(fields: &HashMap<String, String>) -> Result<CreateEntryRequest, ApiError> {
    let number = |name: &str, required: bool| -> Result<f64, ApiError> {
        match fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| ApiError::BadRequest(format!("{name} must be a number"))),
            None if required => Err(ApiError::BadRequest(format!("{name} is required"))),
            None => Ok(0.0),
        }
    };
    let date = match fields.get("date").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            parse_iso_date(raw)
                .map_err(|_| ApiError::BadRequest("date must be YYYY-MM-DD".into()))?,
        ),
        None => None,
    };
    Ok(CreateEntryRequest {
        date,
        food_name: fields.get("food_name").cloned().unwrap_or_default(),
        calories: number("calories", true)?,
        protein: number("protein", false)?,
        carbs: number("carbs", false)?,
        fat: number("fat", false)?,
    })
}

pub fn resolve_range(q: &EntriesQuery, today: Date) -> Result<(Date, Date), ApiError> {
    let (from, to) = match (q.date, q.from, q.to) {
        (Some(d), None, None) => (d, d),
        (None, Some(from), Some(to)) => (from, to),
        (None, None, None) => (today, today),
        _ => {
            return Err(ApiError::BadRequest(
                "use either date or both from and to".into(),
            ))
        }
    };
    if from > to {
        return Err(ApiError::BadRequest("from must not be after to".into()));
    }
    if (to - from).whole_days() >= MAX_RANGE_DAYS {
        return Err(ApiError::BadRequest(format!(
            "range must be shorter than {MAX_RANGE_DAYS} days"
        )));
    }
    Ok((from, to))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

pub fn image_key(user_id: Uuid, at: OffsetDateTime, content_type: &str) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    format!("{user_id}/{millis}.{ext}")
}

/// Uploads the photo. A failure is logged and the entry goes ahead without it.
pub async fn upload_image(state: &AppState, user_id: Uuid, item: UploadItem) -> Option<String> {
    let key = image_key(user_id, OffsetDateTime::now_utc(), &item.content_type);
    match state
        .storage
        .put_object(&key, item.body, &item.content_type)
        .await
    {
        Ok(()) => Some(key),
        Err(e) => {
            warn!(error = %format!("{e:#}"), %user_id, "image upload failed, saving entry without image");
            None
        }
    }
}

pub async fn create_entry(
    state: &AppState,
    user_id: Uuid,
    entry: NewEntry,
    image: Option<UploadItem>,
) -> anyhow::Result<FoodEntry> {
    let image_key = match image {
        Some(item) => upload_image(state, user_id, item).await,
        None => None,
    };

    let row = match repo::insert(&state.db, user_id, &entry, image_key.as_deref()).await {
        Ok(row) => row,
        Err(e) => {
            if let Some(key) = &image_key {
                if let Err(del) = state.storage.delete_object(key).await {
                    warn!(error = %del, %key, "orphaned image not removed");
                }
            }
            return Err(e);
        }
    };

    info!(%user_id, entry_id = %row.id, date = %row.date, calories = row.calories, "food entry saved");
    Ok(to_public(state, row).await)
}

pub async fn to_public(state: &AppState, row: FoodEntryRow) -> FoodEntry {
    let image_url = match &row.image_key {
        Some(key) => match state.storage.presign_get(key, IMAGE_URL_TTL_SECS).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, %key, "presign failed");
                None
            }
        },
        None => None,
    };
    FoodEntry {
        id: row.id,
        user_id: row.user_id,
        date: row.date,
        food_name: row.food_name,
        calories: row.calories,
        protein: row.protein,
        carbs: row.carbs,
        fat: row.fat,
        image_url,
        created_at: row.created_at,
    }
}

pub async fn to_public_many(state: &AppState, rows: Vec<FoodEntryRow>) -> Vec<FoodEntry> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(to_public(state, row).await);
    }
    out
}

pub async fn list_entries(
    state: &AppState,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<FoodEntry>> {
    let rows = repo::list_by_range(&state.db, user_id, from, to).await?;
    Ok(to_public_many(state, rows).await)
}
