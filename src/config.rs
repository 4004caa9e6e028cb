use crate::api_connection::endpoints::DEFAULT_MODEL;

pub const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost:5000";
pub const DEFAULT_APP_TITLE: &str = "CalorieLens";

/// Settings for talking to the inference API.
///
/// The key itself is not stored here; only the name of the variable that holds
/// it, so it is read at request time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub api_key_env_var: String,
    pub model: String,
    pub base_url: String,
    pub site_url: String,
    pub app_title: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Reads the process environment. `.env` is loaded once by the binary at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key_env_var: defaults.api_key_env_var,
            model: get("OPENROUTER_MODEL").unwrap_or(defaults.model),
            base_url: get("OPENROUTER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            site_url: get("SITE_URL").unwrap_or(defaults.site_url),
            app_title: get("APP_TITLE").unwrap_or(defaults.app_title),
        }
    }
}
