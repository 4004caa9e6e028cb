use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::nutrition::targets::NutritionTargets;
use crate::response_parser::{MealName, NutritionRecord};

pub const DEFAULT_MEAL_NAME: &str = "Analyzed Meal";

/// A logged meal, as kept in the user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub meal_name: MealName,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub calories: f64,
    #[serde(alias = "protein")]
    pub protein_g: f64,
    #[serde(alias = "carbs")]
    pub carbs_g: f64,
    #[serde(alias = "fat")]
    pub fat_g: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Meal {
    /// Builds a history entry from an analysis result, filling in the defaults
    /// the parser deliberately leaves out.
    pub fn from_record(id: impl Into<String>, record: NutritionRecord, created_at: DateTime<Utc>) -> Self {
        let meal_name = record
            .meal_name
            .as_ref()
            .and_then(MealName::primary)
            .map(|name| MealName::Single(name.to_string()))
            .unwrap_or_else(|| MealName::Single(DEFAULT_MEAL_NAME.to_string()));

        Self {
            id: id.into(),
            meal_name,
            ingredients: record.ingredients.unwrap_or_default(),
            calories: record.calories,
            protein_g: record.protein_g,
            carbs_g: record.carbs_g,
            fat_g: record.fat_g,
            created_at,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Progress towards each target in percent, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyProgress {
    pub calories_pct: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// Sums the meals whose timestamp falls on `day` in the time zone `tz`.
pub fn daily_totals<Tz: TimeZone>(meals: &[Meal], day: NaiveDate, tz: &Tz) -> DailyTotals {
    meals
        .iter()
        .filter(|meal| meal.created_at.with_timezone(tz).date_naive() == day)
        .fold(DailyTotals::default(), |acc, meal| DailyTotals {
            calories: acc.calories + meal.calories,
            protein_g: acc.protein_g + meal.protein_g,
            carbs_g: acc.carbs_g + meal.carbs_g,
            fat_g: acc.fat_g + meal.fat_g,
        })
}

pub fn progress(totals: &DailyTotals, targets: &NutritionTargets) -> DailyProgress {
    DailyProgress {
        calories_pct: percent_of(totals.calories, targets.calories),
        protein_pct: percent_of(totals.protein_g, targets.protein_g),
        carbs_pct: percent_of(totals.carbs_g, targets.carbs_g),
        fat_pct: percent_of(totals.fat_g, targets.fat_g),
    }
}

fn percent_of(consumed: f64, target: i64) -> f64 {
    if target <= 0 {
        // any intake against a zero target counts as complete
        return if consumed > 0.0 { 100.0 } else { 0.0 };
    }
    (consumed / target as f64 * 100.0).min(100.0)
}
