use anyhow::{Context, Result};
use calorie_lens::api_connection::endpoints::Provider;
use calorie_lens::cli::{parse_args, AnalyzeArgs, Command, SummaryArgs, TargetsArgs};
use calorie_lens::config::AnalyzerConfig;
use calorie_lens::logging::init_logging;
use calorie_lens::meal_analyzer::{analyze_meal, AnalysisInput};
use calorie_lens::nutrition::daily_summary::{daily_totals, progress, Meal};
use calorie_lens::nutrition::labels::{
    activity_level_to_string, clamp_to_range, format_number, goal_to_label,
};
use calorie_lens::nutrition::targets::{compute_targets, MacroRatios, NutritionTargets, ProfileInputs};
use calorie_lens::response_parser::parse_nutrition_response;
use serde::Serialize;
use serde_json::json;
use tokio::fs;
use tracing::{info, warn};

const ACTIVITY_RANGE: (f64, f64) = (1.2, 1.9);
const GOAL_RANGE: (f64, f64) = (-1000.0, 1000.0);

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_targets(args: TargetsArgs) -> Result<()> {
    let activity_factor = clamp_to_range(args.activity, ACTIVITY_RANGE.0, ACTIVITY_RANGE.1);
    let goal_offset_kcal = clamp_to_range(f64::from(args.goal), GOAL_RANGE.0, GOAL_RANGE.1) as i32;
    if activity_factor != args.activity || goal_offset_kcal != args.goal {
        warn!(
            activity = args.activity,
            goal = args.goal,
            "activity or goal outside the supported range, clamped"
        );
    }

    let profile = ProfileInputs {
        weight_kg: args.weight,
        height_cm: args.height,
        age_years: args.age,
        sex: args.sex,
        activity_factor,
        goal_offset_kcal,
    };
    let ratios = MacroRatios {
        protein: args.protein_ratio,
        fat: args.fat_ratio,
    };
    let targets = compute_targets(&profile, ratios);

    print_json(&json!({
        "targets": targets,
        "activityLevel": activity_level_to_string(profile.activity_factor),
        "goal": goal_to_label(profile.goal_offset_kcal),
    }))
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let input = match (args.image, args.text) {
        (Some(path), _) => AnalysisInput::from_image_file(&path)
            .await
            .with_context(|| format!("Failed to read image file '{}'", path.display()))?,
        (None, Some(text)) => AnalysisInput::Text(text),
        (None, None) => anyhow::bail!("either --image or --text is required"),
    };

    let config = AnalyzerConfig::from_env();
    let provider = Provider::openrouter(&config);
    let record = analyze_meal(&provider, &config, &input)
        .await
        .context("Analysis failed, try again or enter the meal manually")?;

    print_json(&record)
}

async fn run_parse(response_file: &std::path::Path) -> Result<()> {
    let raw = fs::read_to_string(response_file)
        .await
        .with_context(|| format!("Failed to read response file '{}'", response_file.display()))?;
    let record = parse_nutrition_response(&raw)?;
    print_json(&record)
}

async fn run_summary(args: SummaryArgs) -> Result<()> {
    let meals_json = fs::read_to_string(&args.meals)
        .await
        .with_context(|| format!("Failed to read meals file '{}'", args.meals.display()))?;
    let meals: Vec<Meal> = serde_json::from_str(&meals_json)
        .with_context(|| format!("Meals file '{}' is not a valid meal list", args.meals.display()))?;

    let targets = match &args.targets {
        Some(path) => {
            let text = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read targets file '{}'", path.display()))?;
            serde_json::from_str::<NutritionTargets>(&text)
                .with_context(|| format!("Targets file '{}' is not valid", path.display()))?
        }
        None => NutritionTargets::FALLBACK,
    };

    let day = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let totals = daily_totals(&meals, day, &chrono::Local);
    info!(%day, meals = meals.len(), "summarising day");

    print_json(&json!({
        "date": day,
        "totals": totals,
        "targets": targets,
        "progress": progress(&totals, &targets),
        "caloriesText": format!(
            "{} / {} kcal",
            format_number(Some(totals.calories)),
            format_number(Some(targets.calories as f64))
        ),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // .env may carry RUST_LOG and the API key
    init_logging();

    let cli_args = parse_args();
    match cli_args.command {
        Command::Targets(args) => run_targets(args),
        Command::Analyze(args) => run_analyze(args).await,
        Command::Parse { response_file } => run_parse(&response_file).await,
        Command::Summary(args) => run_summary(args).await,
    }
}
