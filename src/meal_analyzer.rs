use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{
    ChatCompletionRequest, ChatMessage, ContentPart, ImageUrl, MessageContent, Provider,
};
use crate::config::AnalyzerConfig;
use crate::response_parser::{parse_detailed, NutritionRecord, ParseError};

const RESPONSE_CONTRACT: &str = "Respond ONLY with a valid JSON object containing:
- \"mealName\": string or array of strings for dish name(s)
- \"ingredients\": array of strings listing primary ingredients
- \"portionSize\": estimated portion size (small/medium/large)
- \"calories\": number (total calories)
- \"protein\": number (grams)
- \"carbs\": number (grams)
- \"fat\": number (grams)";

/// What the user handed in: a photo of the meal or a description of it.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Image { bytes: Vec<u8>, mime_type: String },
    Text(String),
}

impl AnalysisInput {
    pub async fn from_image_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::Image {
            bytes,
            mime_type: mime_type_for_path(path).to_string(),
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            AnalysisInput::Image { .. } => "image",
            AnalysisInput::Text(_) => "text",
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Api(#[from] ApiConnectionError),

    #[error("model '{0}' does not accept images")]
    ImagesUnsupported(String),

    #[error("the model returned no content")]
    EmptyResponse,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Guesses the image MIME type from the file extension, JPEG when unknown.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

pub fn build_prompt(input: &AnalysisInput) -> String {
    match input {
        AnalysisInput::Text(description) => format!(
            "Based on this food description: \"{}\", analyze the meal carefully.

TASKS:
1. Identify the main dish(es) and estimate the portion size based on the description.
2. List all mentioned ingredients and infer likely ingredients if not explicitly stated.
3. If the description mentions any sizing (small, medium, large) or quantities, use that information.
4. Provide realistic nutritional information for the described portion.

If the text includes any corrections or updates to a previous analysis, prioritize those changes.

{}

Example: {{\"mealName\": \"Salmon with Rice and Vegetables\", \"ingredients\": [\"Salmon Fillet\", \"Brown Rice\", \"Broccoli\"], \"portionSize\": \"medium\", \"calories\": 550, \"protein\": 35, \"carbs\": 45, \"fat\": 25}}",
            description.trim(),
            RESPONSE_CONTRACT
        ),
        AnalysisInput::Image { .. } => format!(
            "Analyze this food image carefully.

TASKS:
1. Identify the main dish(es) shown and estimate the portion size (small, medium, large).
2. List all visible primary ingredients.
3. Consider the scale of the food relative to the plate or utensils if visible.
4. Provide realistic nutritional information for the exact portion shown.

Account for visible oils, sauces and toppings, and be conservative when uncertain.

{}

Example: {{\"mealName\": \"Cheeseburger with Fries\", \"ingredients\": [\"Beef Patty\", \"Burger Bun\", \"Cheese\", \"French Fries\"], \"portionSize\": \"large\", \"calories\": 950, \"protein\": 35, \"carbs\": 80, \"fat\": 55}}",
            RESPONSE_CONTRACT
        ),
    }
}

pub fn build_request(input: &AnalysisInput, model: &str) -> ChatCompletionRequest {
    let mut parts = vec![ContentPart::Text {
        text: build_prompt(input),
    }];
    if let AnalysisInput::Image { bytes, mime_type } = input {
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:{};base64,{}", mime_type, BASE64.encode(bytes)),
            },
        });
    }

    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }],
        temperature: Some(0.0),
        max_tokens: None,
    }
}

/// Asks the model for the nutrition facts of a meal and parses its reply.
///
/// A reply that cannot be parsed is returned as [`AnalysisError::Parse`]; the
/// caller decides whether to re-prompt or fall back to manual entry.
pub async fn analyze_meal(
    provider: &Provider,
    config: &AnalyzerConfig,
    input: &AnalysisInput,
) -> Result<NutritionRecord, AnalysisError> {
    if matches!(input, AnalysisInput::Image { .. }) && !provider.supports_images(&config.model) {
        return Err(AnalysisError::ImagesUnsupported(config.model.clone()));
    }

    info!(kind = input.kind(), model = %config.model, "analyzing meal");
    let request = build_request(input, &config.model);
    let response = provider.call_chat_completion(&request).await?;

    let content = response.first_content().ok_or_else(|| {
        warn!(id = %response.id, "no content in model response");
        AnalysisError::EmptyResponse
    })?;
    debug!(raw_response = content, "model response");

    match parse_detailed(content) {
        Ok(parsed) => {
            info!(strategy = ?parsed.strategy, calories = parsed.record.calories, "meal analyzed");
            Ok(parsed.record)
        }
        Err(err) => {
            warn!(raw_response = %err.raw_text, "could not parse nutrition from model response");
            Err(err.into())
        }
    }
}
