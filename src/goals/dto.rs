use serde::{Deserialize, Serialize};

use super::calculator::{ActivityLevel, GoalBreakdown, GoalInput, Sex};

/// Goal setup form. Used both for the live preview and for creating the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalRequest {
    pub current_weight: f64,
    pub ideal_weight: f64,
    pub height: f64,
    pub age: u32,
    pub sex: Sex,
    /// Free-form label; anything unrecognised is treated as sedentary.
    #[serde(default = "default_activity")]
    pub training_frequency: String,
    pub target_timeline_days: i32,
}

fn default_activity() -> String {
    "moderate".into()
}

impl GoalRequest {
    pub fn activity(&self) -> ActivityLevel {
        ActivityLevel::from_label(&self.training_frequency)
    }

    pub fn to_input(&self) -> GoalInput {
        GoalInput {
            current_weight_kg: self.current_weight,
            ideal_weight_kg: self.ideal_weight,
            height_cm: self.height,
            age_years: self.age,
            sex: self.sex,
            activity: self.activity(),
            target_days: self.target_timeline_days,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GoalPreview {
    pub training_frequency: ActivityLevel,
    #[serde(flatten)]
    pub breakdown: GoalBreakdown,
}
