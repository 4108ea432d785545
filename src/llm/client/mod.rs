//! LLM client for document analysis.
//!
//! Talks to an OpenAI-compatible chat completions API. One request per
//! analysis, no retry, no backoff; a failed call fails the whole batch.

mod config;
mod prompts;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use config::LlmConfig;

/// LLM client for document analysis.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    /// Create a client from the environment, requiring the API credential.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env();
        if config.api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }
        Ok(Self::new(config))
    }

    /// Get the config.
    #[allow(dead_code)]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Run the analysis prompt over the combined document text.
    ///
    /// Returns the raw completion; classification happens downstream.
    pub async fn analyze(&self, combined_text: &str) -> Result<String, LlmError> {
        let truncated = self.truncate_content(combined_text);
        let prompt = self
            .config
            .get_analysis_prompt()
            .replace("{content}", truncated);

        info!("Analyzing combined document ({} chars)", truncated.len());
        self.call_chat(&prompt).await
    }

    /// Truncate content to configured maximum (UTF-8 safe).
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.config.max_content_chars {
            return text;
        }
        // Find a valid UTF-8 boundary at or before max_content_chars
        let mut end = self.config.max_content_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    /// Call the chat completions API with a prompt.
    async fn call_chat(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint);
        debug!("Calling {} with model {}", url, self.config.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("Response contained no completion".to_string()))
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug)]
pub enum LlmError {
    /// No API credential configured
    MissingApiKey,
    /// Failed to connect to the API
    Connection(String),
    /// API returned an error
    Api(String),
    /// Failed to parse response
    Parse(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::MissingApiKey => {
                write!(f, "The environment variable OPENAI_API_KEY is not set")
            }
            LlmError::Connection(msg) => write!(f, "Connection error: {}", msg),
            LlmError::Api(msg) => write!(f, "API error: {}", msg),
            LlmError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}
