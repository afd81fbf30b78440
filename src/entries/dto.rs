use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

/// Food entry as returned to clients; the stored image key is replaced by a
/// short-lived URL.
#[derive(Debug, Clone, Serialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: Date,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default, deserialize_with = "iso_date::deserialize_option")]
    pub date: Option<Date>,
    pub food_name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// `?date=` for a single day or `?from=&to=` for an inclusive range.
#[derive(Debug, Default, Deserialize)]
pub struct EntriesQuery {
    #[serde(default, deserialize_with = "iso_date::deserialize_option")]
    pub date: Option<Date>,
    #[serde(default, deserialize_with = "iso_date::deserialize_option")]
    pub from: Option<Date>,
    #[serde(default, deserialize_with = "iso_date::deserialize_option")]
    pub to: Option<Date>,
}
