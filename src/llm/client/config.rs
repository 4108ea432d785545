//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_ANALYSIS_PROMPT;

/// Configuration for the LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API endpoint base (OpenAI-compatible).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key. Required; the serve path refuses to start without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to use for analysis.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Custom analysis prompt (uses the {content} placeholder).
    #[serde(default)]
    pub analysis_prompt: Option<String>,
    /// Maximum characters of document content to send.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_max_content_chars() -> usize {
    48000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            analysis_prompt: None,
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl LlmConfig {
    /// Build config from the environment.
    ///
    /// Supported env vars:
    /// - `OPENAI_API_KEY`: API credential (required to actually call out)
    /// - `LLM_ENDPOINT`: API endpoint base
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_MAX_CONTENT_CHARS`: Max document chars to send
    /// - `LLM_PROMPT`: Custom analysis prompt
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.api_key = std::env::var("OPENAI_API_KEY").ok();

        if let Ok(val) = std::env::var("LLM_ENDPOINT") {
            config.endpoint = val;
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            config.model = val;
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                config.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                config.max_content_chars = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_PROMPT") {
            config.analysis_prompt = Some(val);
        }

        config
    }

    #[allow(dead_code)]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Get the analysis prompt, using custom or default.
    pub fn get_analysis_prompt(&self) -> &str {
        self.analysis_prompt
            .as_deref()
            .unwrap_or(DEFAULT_ANALYSIS_PROMPT)
    }
}
