use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::nutrition::targets::Sex;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute daily calorie and macro targets from a profile
    Targets(TargetsArgs),
    /// Estimate the nutrition of a meal photo or description
    Analyze(AnalyzeArgs),
    /// Parse a saved model reply into a nutrition record
    Parse {
        /// File holding the raw reply text
        #[arg(short, long)]
        response_file: PathBuf,
    },
    /// Summarise one day of logged meals against the targets
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Body weight in kilograms
    #[arg(long)]
    pub weight: f64,
    /// Height in centimetres
    #[arg(long)]
    pub height: f64,
    /// Age in years
    #[arg(long)]
    pub age: u32,
    /// male or female
    #[arg(long)]
    pub sex: Sex,
    /// Activity factor, 1.2 (sedentary) to 1.9 (extremely active)
    #[arg(long, default_value_t = 1.375)]
    pub activity: f64,
    /// Daily kcal offset, negative to lose weight, positive to gain
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub goal: i32,
    #[arg(long, default_value_t = 0.3)]
    pub protein_ratio: f64,
    #[arg(long, default_value_t = 0.3)]
    pub fat_ratio: f64,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct AnalyzeArgs {
    /// Path to a photo of the meal
    #[arg(short, long)]
    pub image: Option<PathBuf>,
    /// Free-text description of the meal
    #[arg(short, long)]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// JSON file with the list of logged meals
    #[arg(short, long)]
    pub meals: PathBuf,
    /// Day to summarise (YYYY-MM-DD), today in local time by default
    #[arg(short, long)]
    pub date: Option<chrono::NaiveDate>,
    /// JSON file with the targets; the fallback targets are used otherwise
    #[arg(long)]
    pub targets: Option<PathBuf>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_accepts_negative_goal() {
        let cli = Cli::try_parse_from([
            "calorie-lens", "targets", "--weight", "80", "--height", "180", "--age", "30",
            "--sex", "male", "--activity", "1.55", "--goal", "-250",
        ])
        .unwrap();
        match cli.command {
            Command::Targets(args) => {
                assert_eq!(args.goal, -250);
                assert_eq!(args.sex, Sex::Male);
                assert_eq!(args.protein_ratio, 0.3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_needs_exactly_one_input() {
        assert!(Cli::try_parse_from(["calorie-lens", "analyze"]).is_err());
        assert!(Cli::try_parse_from([
            "calorie-lens", "analyze", "--image", "a.jpg", "--text", "soup"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["calorie-lens", "analyze", "--text", "soup"]).is_ok());
    }

    #[test]
    fn test_summary_parses_date() {
        let cli = Cli::try_parse_from([
            "calorie-lens", "summary", "--meals", "meals.json", "--date", "2024-03-15",
        ])
        .unwrap();
        match cli.command {
            Command::Summary(args) => {
                assert_eq!(args.date, chrono::NaiveDate::from_ymd_opt(2024, 3, 15));
                assert!(args.targets.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
