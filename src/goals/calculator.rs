//! Daily calorie goal from a weight target.
//!
//! BMR uses the Mifflin-St Jeor equation, TDEE scales it by an activity
//! multiplier, and the weight delta is spread evenly over the timeline at
//! 7700 kcal per kg. No physiological bounds are applied to the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Energy stored in one kilogram of body weight.
pub const KCAL_PER_KG: f64 = 7700.0;

/// Shortest accepted timeline. Anything below divides the weight delta
/// over less than a week.
pub const MIN_TARGET_DAYS: i32 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    fn bmr_constant(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Resolves a stored or submitted label; unknown labels count as sedentary.
    pub fn from_label(label: &str) -> Self {
        match label {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("target timeline must be at least {min} days, got {days}")]
    TimelineTooShort { days: i32, min: i32 },
    #[error("{0} must be a finite number")]
    NonFiniteInput(&'static str),
}

#[derive(Debug, Clone)]
pub struct GoalInput {
    pub current_weight_kg: f64,
    pub ideal_weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity: ActivityLevel,
    pub target_days: i32,
}

/// Intermediate values alongside the rounded goal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GoalBreakdown {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_adjustment: f64,
    pub daily_calorie_goal: i32,
}

pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + sex.bmr_constant()
}

pub fn total_daily_energy_expenditure(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

// Half-way values round toward positive infinity.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

pub fn breakdown(input: &GoalInput) -> Result<GoalBreakdown, GoalError> {
    if input.target_days < MIN_TARGET_DAYS {
        return Err(GoalError::TimelineTooShort {
            days: input.target_days,
            min: MIN_TARGET_DAYS,
        });
    }
    for (name, v) in [
        ("current weight", input.current_weight_kg),
        ("ideal weight", input.ideal_weight_kg),
        ("height", input.height_cm),
    ] {
        if !v.is_finite() {
            return Err(GoalError::NonFiniteInput(name));
        }
    }

    let weeks = f64::from(input.target_days) / 7.0;
    let weekly_weight_change = (input.ideal_weight_kg - input.current_weight_kg) / weeks;
    let daily_adjustment = weekly_weight_change * KCAL_PER_KG / 7.0;

    let bmr = basal_metabolic_rate(
        input.current_weight_kg,
        input.height_cm,
        input.age_years,
        input.sex,
    );
    let tdee = total_daily_energy_expenditure(bmr, input.activity);

    Ok(GoalBreakdown {
        bmr,
        tdee,
        daily_adjustment,
        daily_calorie_goal: round_half_up(tdee + daily_adjustment),
    })
}

pub fn daily_calorie_goal(input: &GoalInput) -> Result<i32, GoalError> {
    breakdown(input).map(|b| b.daily_calorie_goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GoalInput {
        GoalInput {
            current_weight_kg: 80.0,
            ideal_weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            sex: Sex::Male,
            activity: ActivityLevel::Moderate,
            target_days: 90,
        }
    }

    #[test]
    fn bmr_uses_sex_constant() {
        assert!((basal_metabolic_rate(80.0, 175.0, 30, Sex::Male) - 1748.75).abs() < 1e-9);
        assert!((basal_metabolic_rate(80.0, 175.0, 30, Sex::Female) - 1582.75).abs() < 1e-9);
    }

    #[test]
    fn cutting_goal_matches_formula() {
        let b = breakdown(&sample()).expect("valid input");
        assert!((b.tdee - 2710.5625).abs() < 1e-9);
        assert!((b.daily_adjustment + 855.555_555).abs() < 1e-3);
        assert_eq!(b.daily_calorie_goal, 1855);
        let expected = (b.tdee + b.daily_adjustment).round() as i32;
        assert_eq!(b.daily_calorie_goal, expected);
    }

    #[test]
    fn maintenance_goal_is_tdee() {
        let input = GoalInput {
            current_weight_kg: 60.0,
            ideal_weight_kg: 60.0,
            height_cm: 165.0,
            age_years: 25,
            sex: Sex::Female,
            activity: ActivityLevel::Sedentary,
            target_days: 30,
        };
        // 1345.25 * 1.2 = 1614.3
        assert_eq!(daily_calorie_goal(&input), Ok(1614));
    }

    #[test]
    fn bulking_adds_surplus() {
        let mut input = sample();
        input.ideal_weight_kg = 84.0;
        input.target_days = 56;
        // +0.5 kg per week -> +550 kcal per day
        let b = breakdown(&input).unwrap();
        assert!((b.daily_adjustment - 550.0).abs() < 1e-9);
        assert_eq!(b.daily_calorie_goal, 3261);
    }

    #[test]
    fn goal_is_deterministic() {
        let a = daily_calorie_goal(&sample()).unwrap();
        let b = daily_calorie_goal(&sample()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_activity_is_sedentary() {
        let multiplier = |label: &str| ActivityLevel::from_label(label).multiplier();
        assert_eq!(multiplier("couch_potato"), 1.2);
        assert_eq!(multiplier(""), multiplier("sedentary"));
        assert_eq!(multiplier("very_active"), 1.9);
        assert_eq!(ActivityLevel::from_label("Moderate"), ActivityLevel::Sedentary);
    }

    #[test]
    fn labels_round_trip() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            assert_eq!(ActivityLevel::from_label(level.as_str()), level);
        }
    }

    #[test]
    fn zero_day_timeline_is_rejected() {
        let mut input = sample();
        input.target_days = 0;
        assert_eq!(
            daily_calorie_goal(&input),
            Err(GoalError::TimelineTooShort { days: 0, min: 7 })
        );
        input.target_days = 6;
        assert!(daily_calorie_goal(&input).is_err());
        input.target_days = 7;
        assert!(daily_calorie_goal(&input).is_ok());
    }

    #[test]
    fn nan_weight_is_rejected() {
        let mut input = sample();
        input.ideal_weight_kg = f64::NAN;
        assert_eq!(
            daily_calorie_goal(&input),
            Err(GoalError::NonFiniteInput("ideal weight"))
        );
    }

    #[test]
    fn implausible_goal_is_not_clamped() {
        let mut input = sample();
        input.ideal_weight_kg = 40.0;
        input.target_days = 7;
        let goal = daily_calorie_goal(&input).unwrap();
        assert!(goal < 0);
    }

    #[test]
    fn half_values_round_up() {
        assert_eq!(round_half_up(1960.5), 1961);
        assert_eq!(round_half_up(-10.5), -10);
        assert_eq!(round_half_up(1855.0069), 1855);
    }
}
