//! Extraction of nutrition facts from free-form model replies.
//!
//! Models asked for "only a JSON object" still wrap it in prose, code fences or
//! truncate it. Parsing therefore runs in two tiers: a strict JSON decode of the
//! outermost brace span, then a regex scan of the whole reply for the four
//! macro values. A macro that is genuinely missing is never filled in.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

static CALORIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)calories"?:?\s*(\d+(?:\.\d+)?)"#).unwrap());
static PROTEIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)protein"?:?\s*(\d+(?:\.\d+)?)"#).unwrap());
static CARBS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)carbs"?:?\s*(\d+(?:\.\d+)?)"#).unwrap());
static FAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)fat"?:?\s*(\d+(?:\.\d+)?)"#).unwrap());
static MEAL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)mealName(?:"\s*:|"|:)\s*"([^"]+)""#).unwrap());

/// Name of the dish, or of each dish when a photo shows several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MealName {
    Single(String),
    Multiple(Vec<String>),
}

impl MealName {
    /// The name a meal is stored under: the first entry of a list.
    pub fn primary(&self) -> Option<&str> {
        match self {
            MealName::Single(name) => Some(name.as_str()),
            MealName::Multiple(names) => names.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    #[serde(rename = "mealName", default, skip_serializing_if = "Option::is_none")]
    pub meal_name: Option<MealName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    pub calories: f64,
    #[serde(rename = "protein")]
    pub protein_g: f64,
    #[serde(rename = "carbs")]
    pub carbs_g: f64,
    #[serde(rename = "fat")]
    pub fat_g: f64,
}

/// Which tier of the pipeline produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Json,
    RegexFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub record: NutritionRecord,
    pub strategy: ParseStrategy,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// The complete reply, kept for diagnostics.
    pub raw_text: String,
}

/// Parses a model reply into a [`NutritionRecord`].
pub fn parse_nutrition_response(raw_text: &str) -> Result<NutritionRecord, ParseError> {
    parse_detailed(raw_text).map(|parsed| parsed.record)
}

/// Same as [`parse_nutrition_response`], also reporting which tier succeeded.
pub fn parse_detailed(raw_text: &str) -> Result<ParsedResponse, ParseError> {
    if let Some(record) = brace_span(raw_text).and_then(parse_json_candidate) {
        return Ok(ParsedResponse {
            record,
            strategy: ParseStrategy::Json,
        });
    }

    if let Some(record) = scan_with_regex(raw_text) {
        return Ok(ParsedResponse {
            record,
            strategy: ParseStrategy::RegexFallback,
        });
    }

    Err(ParseError {
        message: "Failed to parse nutrition information from AI response".to_string(),
        raw_text: raw_text.to_string(),
    })
}

/// Slice from the first `{` to the last `}`, both included.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_json_candidate(candidate: &str) -> Option<NutritionRecord> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;

    let calories = required_number(object, "calories")?;
    let protein_g = required_number(object, "protein")?;
    let carbs_g = required_number(object, "carbs")?;
    let fat_g = required_number(object, "fat")?;

    let meal_name = match object.get("mealName") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(MealName::Single(name.clone())),
        Some(Value::Array(names)) => Some(MealName::Multiple(
            names.iter().map(value_to_text).collect(),
        )),
        Some(_) => return None,
    };

    let ingredients = match object.get("ingredients") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.iter().map(value_to_text).collect()),
        Some(other) => Some(vec![value_to_text(other)]),
    };

    Some(NutritionRecord {
        meal_name,
        ingredients,
        calories,
        protein_g,
        carbs_g,
        fat_g,
    })
}

fn required_number(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).filter(|v| v.is_number()).and_then(Value::as_f64)
}

// Strings without their JSON quotes, everything else in JSON text form.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scan_with_regex(text: &str) -> Option<NutritionRecord> {
    let calories = capture_number(&CALORIES_RE, text)?;
    let protein_g = capture_number(&PROTEIN_RE, text)?;
    let carbs_g = capture_number(&CARBS_RE, text)?;
    let fat_g = capture_number(&FAT_RE, text)?;

    let meal_name = MEAL_NAME_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| MealName::Single(m.as_str().to_string()));

    Some(NutritionRecord {
        meal_name,
        ingredients: None,
        calories,
        protein_g,
        carbs_g,
        fat_g,
    })
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
