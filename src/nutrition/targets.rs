use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Atwater factors, kcal per gram
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Sex-specific constant of the Mifflin-St Jeor equation.
    fn bmr_offset(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("unknown sex '{}', expected 'male' or 'female'", other)),
        }
    }
}

/// Physical profile and goal of a user, as stored on their profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    /// 1.2 (sedentary) to 1.9 (extremely active)
    pub activity_factor: f64,
    /// Negative for a deficit, positive for a surplus, zero for maintenance.
    pub goal_offset_kcal: i32,
}

impl Default for ProfileInputs {
    // Profile handed to a user who has not filled in their settings yet.
    fn default() -> Self {
        Self {
            weight_kg: 70.0,
            height_cm: 170.0,
            age_years: 30,
            sex: Sex::Male,
            activity_factor: 1.375,
            goal_offset_kcal: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
    /// Share of calories from protein.
    pub protein: f64,
    /// Share of calories from fat. Carbs take whatever remains.
    pub fat: f64,
}

impl Default for MacroRatios {
    fn default() -> Self {
        Self {
            protein: 0.3,
            fat: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGrams {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

impl NutritionTargets {
    /// Targets shown when a user has no profile-derived targets.
    pub const FALLBACK: NutritionTargets = NutritionTargets {
        calories: 2000,
        protein_g: 150,
        carbs_g: 200,
        fat_g: 65,
    };
}

/// Rounds to the nearest integer, ties towards positive infinity.
///
/// This is the same rule as JavaScript's `Math.round`, for both signs:
/// `2.5 -> 3`, `-2.5 -> -2`.
pub fn round_half_up(value: f64) -> i64 {
    // `value + 0.5` can itself round up (0.49999999999999994 + 0.5 == 1.0),
    // so compare the fractional part instead.
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Calculates the recommended daily calorie intake.
///
/// BMR comes from the Mifflin-St Jeor equation, is scaled by the activity factor
/// to get TDEE, and the goal offset is added on top.
///
/// # Arguments
/// * `activity_factor`: expected in [1.2, 1.9] but not clamped.
/// * `goal_offset_kcal`: signed daily adjustment, expected in [-1000, 1000].
///
/// # Returns
/// The rounded calorie target. Degenerate inputs are not rejected and may
/// produce a meaningless (even negative) value.
pub fn compute_daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: Sex,
    activity_factor: f64,
    goal_offset_kcal: i32,
) -> i64 {
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + sex.bmr_offset();
    let tdee = bmr * activity_factor;
    round_half_up(tdee + f64::from(goal_offset_kcal))
}

/// Splits a calorie budget into protein, carb and fat grams.
///
/// Carbs receive `1 - protein - fat` of the calories. Ratios summing to 1 or
/// more are accepted and give zero or negative carbs.
pub fn compute_macros(calories: f64, ratios: MacroRatios) -> MacroGrams {
    let protein_g = round_half_up((calories * ratios.protein) / KCAL_PER_G_PROTEIN);
    let fat_g = round_half_up((calories * ratios.fat) / KCAL_PER_G_FAT);

    let carbs_ratio = 1.0 - ratios.protein - ratios.fat;
    let carbs_g = round_half_up((calories * carbs_ratio) / KCAL_PER_G_CARBS);

    MacroGrams {
        protein_g,
        carbs_g,
        fat_g,
    }
}

/// Turns a profile into a full set of daily targets.
pub fn compute_targets(profile: &ProfileInputs, ratios: MacroRatios) -> NutritionTargets {
    let calories = compute_daily_calories(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.sex,
        profile.activity_factor,
        profile.goal_offset_kcal,
    );
    let macros = compute_macros(calories as f64, ratios);

    NutritionTargets {
        calories,
        protein_g: macros.protein_g,
        carbs_g: macros.carbs_g,
        fat_g: macros.fat_g,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_daily_calories_male_deficit() {
        // bmr = 800 + 1125 - 150 + 5 = 1780, tdee = 2759, minus 250
        assert_eq!(compute_daily_calories(80.0, 180.0, 30, Sex::Male, 1.55, -250), 2509);
    }

    #[test]
    fn test_daily_calories_female_surplus() {
        // bmr = 650 + 1031.25 - 140 - 161 = 1380.25, tdee = 1897.84..., plus 200
        assert_eq!(compute_daily_calories(65.0, 165.0, 28, Sex::Female, 1.375, 200), 2098);
    }

    #[test]
    fn test_daily_calories_is_deterministic() {
        let first = compute_daily_calories(72.5, 176.0, 41, Sex::Female, 1.725, -500);
        for _ in 0..10 {
            assert_eq!(compute_daily_calories(72.5, 176.0, 41, Sex::Female, 1.725, -500), first);
        }
    }

    #[test]
    fn test_daily_calories_does_not_clamp_activity() {
        // 1780 * 3.0 = 5340, well outside the usual range but still computed
        assert_eq!(compute_daily_calories(80.0, 180.0, 30, Sex::Male, 3.0, 0), 5340);
    }

    #[test]
    fn test_daily_calories_pathological_input_goes_negative() {
        let calories = compute_daily_calories(0.0, 0.0, 90, Sex::Female, 1.2, -1000);
        // bmr = -450 - 161 = -611, tdee = -733.2, minus 1000
        assert_eq!(calories, -1733);
    }

    #[test]
    fn test_macros_default_ratios() {
        let macros = compute_macros(2000.0, MacroRatios::default());
        assert_eq!(
            macros,
            MacroGrams {
                protein_g: 150,
                carbs_g: 200,
                fat_g: 67
            }
        );
    }

    #[test]
    fn test_macros_custom_ratios() {
        let macros = compute_macros(1800.0, MacroRatios { protein: 0.35, fat: 0.25 });
        assert_eq!(
            macros,
            MacroGrams {
                protein_g: 158,
                carbs_g: 180,
                fat_g: 50
            }
        );
    }

    #[test]
    fn test_macros_ratio_sum_over_one_gives_negative_carbs() {
        let macros = compute_macros(2000.0, MacroRatios { protein: 0.6, fat: 0.6 });
        assert_eq!(macros.protein_g, 300);
        assert_eq!(macros.fat_g, 133);
        assert_eq!(macros.carbs_g, -100);
    }

    #[test]
    fn test_macros_ratio_sum_exactly_one_gives_zero_carbs() {
        let macros = compute_macros(2000.0, MacroRatios { protein: 0.5, fat: 0.5 });
        assert_eq!(macros.carbs_g, 0);
    }

    #[test]
    fn test_macro_kcal_sum_stays_close_to_budget() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let calories: f64 = rng.gen_range(800.0..5000.0);
            let protein: f64 = rng.gen_range(0.1..0.45);
            let fat: f64 = rng.gen_range(0.1..0.45);
            let macros = compute_macros(calories, MacroRatios { protein, fat });

            let kcal = macros.protein_g * 4 + macros.carbs_g * 4 + macros.fat_g * 9;
            // half a gram of rounding per macro: 2 + 2 + 4.5
            assert!(
                (kcal as f64 - calories).abs() <= 8.5,
                "calories {} ratios {}/{} -> {:?} ({} kcal)",
                calories,
                protein,
                fat,
                macros,
                kcal
            );
        }
    }

    #[test]
    fn test_macro_kcal_sum_for_round_budgets() {
        for calories in (1200..=4000).step_by(100) {
            let macros = compute_macros(calories as f64, MacroRatios::default());
            let kcal = macros.protein_g * 4 + macros.carbs_g * 4 + macros.fat_g * 9;
            assert!((kcal - calories).abs() <= 5, "{} -> {}", calories, kcal);
        }
    }

    #[test]
    fn test_round_half_up_matches_math_round() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4999), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(1823.5), 1824);
    }

    #[test]
    fn test_compute_targets_for_default_profile() {
        // bmr = 700 + 1062.5 - 150 + 5 = 1617.5, * 1.375 = 2224.06...
        let targets = compute_targets(&ProfileInputs::default(), MacroRatios::default());
        assert_eq!(targets.calories, 2224);
        assert_eq!(targets.protein_g, 167);
        assert_eq!(targets.fat_g, 74);
        assert_eq!(targets.carbs_g, 222);
    }

    #[test]
    fn test_sex_parsing_and_serde() {
        assert_eq!("Male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!(" f ".parse::<Sex>().unwrap(), Sex::Female);
        assert!("other".parse::<Sex>().is_err());
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"female\"");
    }
}
