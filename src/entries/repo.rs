use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct FoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Validated entry ready for insertion.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: Date,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

const ENTRY_COLUMNS: &str =
    "id, user_id, date, food_name, calories, protein, carbs, fat, image_key, created_at";

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    entry: &NewEntry,
    image_key: Option<&str>,
) -> anyhow::Result<FoodEntryRow> {
    let row = sqlx::query_as::<_, FoodEntryRow>(&format!(
        r#"
        INSERT INTO food_entries (user_id, date, food_name, calories, protein, carbs, fat, image_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ENTRY_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(entry.date)
    .bind(&entry.food_name)
    .bind(entry.calories)
    .bind(entry.protein)
    .bind(entry.carbs)
    .bind(entry.fat)
    .bind(image_key)
    .fetch_one(db)
    .await
    .context("insert food entry")?;
    Ok(row)
}

/// Entries with `from <= date <= to`, oldest first.
pub async fn list_by_range(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<FoodEntryRow>> {
    let rows = sqlx::query_as::<_, FoodEntryRow>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
          FROM food_entries
         WHERE user_id = $1 AND date >= $2 AND date <= $3
         ORDER BY date ASC, created_at ASC
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await
    .context("list food entries")?;
    Ok(rows)
}
