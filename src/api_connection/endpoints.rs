use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize)]
pub struct OpenRouterAvailableModel {
    pub model_name: &'static str,
    pub supports_images: bool,
}

#[derive(Clone, Debug, Serialize)]
pub enum Provider {
    OpenRouter {
        /// Name of the environment variable holding the key, read at call time.
        api_key_env_var: String,
        base_url: String,
        site_url: String,
        app_title: String,
    },
}

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

pub const OPENROUTER_MODELS: &[OpenRouterAvailableModel] = &[
    OpenRouterAvailableModel {
        model_name: "google/gemini-2.5-flash",
        supports_images: true,
    },
    OpenRouterAvailableModel {
        model_name: "openai/gpt-4o-mini",
        supports_images: true,
    },
    OpenRouterAvailableModel {
        model_name: "qwen/qwen3-32b",
        supports_images: false,
    },
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    pub role: String,
    // Some providers send null content on refusals or tool calls
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: Option<u32>,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created: u64,
    pub model: String,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub usage: Option<ChatCompletionUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any non-blank content.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_parts_serialize_with_type_tags() {
        let message = ChatMessage {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: "What is this?".to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/png;base64,AAAA".to_string(),
                    },
                },
            ]),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "What is this?" },
                    { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
                ]
            })
        );
    }

    #[test]
    fn test_plain_text_content_serializes_as_string() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text("Output JSON.".to_string()),
            }],
            temperature: Some(0.0),
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["content"], json!("Output JSON."));
        assert_eq!(value["temperature"], json!(0.0));
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_first_content_skips_blank_and_null() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "model": DEFAULT_MODEL,
            "choices": [{ "message": { "role": "assistant", "content": "  \n " } }]
        }))
        .unwrap();
        assert_eq!(response.first_content(), None);

        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "gen-2",
            "model": DEFAULT_MODEL,
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(response.first_content(), None);

        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "gen-3",
            "created": 1700000000,
            "model": DEFAULT_MODEL,
            "choices": [{ "index": 0, "finish_reason": "stop",
                          "message": { "role": "assistant", "content": " {\"calories\": 1} " } }]
        }))
        .unwrap();
        assert_eq!(response.first_content(), Some("{\"calories\": 1}"));
    }

    #[test]
    fn test_default_model_is_in_catalogue_and_takes_images() {
        let model = OPENROUTER_MODELS
            .iter()
            .find(|m| m.model_name == DEFAULT_MODEL)
            .expect("default model listed");
        assert!(model.supports_images);
    }
}
