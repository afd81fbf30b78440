//! Per-day nutrition totals and goal-relative day status.
//!
//! Nothing here is stored: every view is rebuilt from the entry list.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month};

use crate::{dates::iso_date, entries::dto::FoodEntry};

/// Goal used when the user has no profile or a non-positive goal.
pub const DEFAULT_DAILY_GOAL: i32 = 2000;

pub const GOOD_THRESHOLD_PERCENT: f64 = 80.0;
pub const OVER_THRESHOLD_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Serialize)]
pub struct DailyIntake {
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: Date,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub entries: Vec<FoodEntry>,
}

impl DailyIntake {
    pub fn from_entries(date: Date, entries: Vec<FoodEntry>) -> Self {
        let mut intake = Self {
            date,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            intake.push(entry);
        }
        intake
    }

    fn push(&mut self, entry: FoodEntry) {
        self.total_calories += entry.calories;
        self.total_protein += entry.protein;
        self.total_carbs += entry.carbs;
        self.total_fat += entry.fat;
        self.entries.push(entry);
    }
}

/// Buckets entries by their calendar date. Dates without entries are absent.
pub fn group_by_date(entries: Vec<FoodEntry>) -> BTreeMap<Date, DailyIntake> {
    let mut days: BTreeMap<Date, DailyIntake> = BTreeMap::new();
    for entry in entries {
        let date = entry.date;
        days.entry(date)
            .or_insert_with(|| DailyIntake::from_entries(date, Vec::new()))
            .push(entry);
    }
    days
}

pub fn effective_goal(profile_goal: Option<i32>) -> i32 {
    match profile_goal {
        Some(goal) if goal > 0 => goal,
        _ => DEFAULT_DAILY_GOAL,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Empty,
    Low,
    Good,
    Over,
}

impl DayStatus {
    pub fn classify(intake: Option<&DailyIntake>, goal: i32) -> Self {
        let Some(intake) = intake else {
            return DayStatus::Empty;
        };
        let pct = percent_of_goal(intake.total_calories, goal);
        if pct >= OVER_THRESHOLD_PERCENT {
            DayStatus::Over
        } else if pct >= GOOD_THRESHOLD_PERCENT {
            DayStatus::Good
        } else {
            DayStatus::Low
        }
    }
}

fn percent_of_goal(calories: f64, goal: i32) -> f64 {
    calories * 100.0 / f64::from(effective_goal(Some(goal)))
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: Date,
    pub total_calories: f64,
    pub entry_count: usize,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u8,
    pub daily_goal: i32,
    pub days: Vec<CalendarDay>,
}

pub fn month_bounds(year: i32, month: Month) -> Result<(Date, Date), time::error::ComponentRange> {
    let first = Date::from_calendar_date(year, month, 1)?;
    let last = Date::from_calendar_date(year, month, month.length(year))?;
    Ok((first, last))
}

/// One row per day of the month, whether or not anything was logged.
pub fn month_calendar(
    year: i32,
    month: Month,
    entries: Vec<FoodEntry>,
    goal: i32,
) -> Result<MonthCalendar, time::error::ComponentRange> {
    let (first, last) = month_bounds(year, month)?;
    let by_date = group_by_date(entries);
    let goal = effective_goal(Some(goal));

    let mut days = Vec::with_capacity(usize::from(last.day()));
    let mut day = Some(first);
    while let Some(date) = day.filter(|d| *d <= last) {
        let intake = by_date.get(&date);
        days.push(CalendarDay {
            date,
            total_calories: intake.map_or(0.0, |i| i.total_calories),
            entry_count: intake.map_or(0, |i| i.entries.len()),
            status: DayStatus::classify(intake, goal),
        });
        day = date.next_day();
    }

    Ok(MonthCalendar {
        year,
        month: u8::from(month),
        daily_goal: goal,
        days,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: Date,
    pub daily_goal: i32,
    pub consumed: f64,
    pub remaining: f64,
    /// Share of the goal eaten, capped at 100.
    pub progress_percent: f64,
    pub status: DayStatus,
    pub intake: DailyIntake,
}

pub fn dashboard(date: Date, entries: Vec<FoodEntry>, profile_goal: Option<i32>) -> DashboardSummary {
    let goal = effective_goal(profile_goal);
    let intake = DailyIntake::from_entries(date, entries);
    let consumed = intake.total_calories;
    let status = if intake.entries.is_empty() {
        DayStatus::Empty
    } else {
        DayStatus::classify(Some(&intake), goal)
    };
    DashboardSummary {
        date,
        daily_goal: goal,
        consumed,
        remaining: f64::from(goal) - consumed,
        progress_percent: percent_of_goal(consumed, goal).min(100.0),
        status,
        intake,
    }
}
