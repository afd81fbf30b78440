use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::calculator::{ActivityLevel, Sex};

/// Row of `user_profiles`. Enum columns are stored as their snake_case labels.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_weight: f64,
    pub height: f64,
    pub ideal_weight: f64,
    pub age: i32,
    pub sex: String,
    pub training_frequency: String,
    pub target_timeline_days: i32,
    pub daily_calorie_goal: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_weight: f64,
    pub height: f64,
    pub ideal_weight: f64,
    pub age: i32,
    pub sex: Sex,
    pub training_frequency: ActivityLevel,
    pub target_timeline_days: i32,
    pub daily_calorie_goal: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ProfileRow> for UserProfile {
    fn from(r: ProfileRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            current_weight: r.current_weight,
            height: r.height,
            ideal_weight: r.ideal_weight,
            age: r.age,
            sex: if r.sex == "female" { Sex::Female } else { Sex::Male },
            training_frequency: ActivityLevel::from_label(&r.training_frequency),
            target_timeline_days: r.target_timeline_days,
            daily_calorie_goal: r.daily_calorie_goal,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct NewProfile {
    pub current_weight: f64,
    pub height: f64,
    pub ideal_weight: f64,
    pub age: i32,
    pub sex: Sex,
    pub training_frequency: ActivityLevel,
    pub target_timeline_days: i32,
    pub daily_calorie_goal: i32,
}

const PROFILE_COLUMNS: &str = "id, user_id, current_weight, height, ideal_weight, age, sex, \
     training_frequency, target_timeline_days, daily_calorie_goal, created_at, updated_at";

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(UserProfile::from))
}

/// Inserts the profile; `None` when the user already has one.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    p: &NewProfile,
) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        INSERT INTO user_profiles (user_id, current_weight, height, ideal_weight, age, sex,
                                   training_frequency, target_timeline_days, daily_calorie_goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(p.current_weight)
    .bind(p.height)
    .bind(p.ideal_weight)
    .bind(p.age)
    .bind(p.sex.as_str())
    .bind(p.training_frequency.as_str())
    .bind(p.target_timeline_days)
    .bind(p.daily_calorie_goal)
    .fetch_optional(db)
    .await?;
    Ok(row.map(UserProfile::from))
}
