//! Anthropic implementation of the script generator.
//!
//! Uses the messages API with the generation prompts shared by all
//! adapters.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GenerationError, GenerationResult};
use crate::prompts::{format_generation_prompt, GENERATION_SYSTEM_PROMPT};
use crate::traits::generator::ScriptGenerator;
use crate::types::task::ExtractionTask;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic-based script generator.
#[derive(Clone)]
pub struct AnthropicGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicGenerator {
    /// Create a generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "claude-3-5-haiku-latest".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 2_000,
        }
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> GenerationResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| GenerationError::Config("ANTHROPIC_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the model (default: claude-3-5-haiku-latest).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl ScriptGenerator for AnthropicGenerator {
    async fn generate(
        &self,
        task: &ExtractionTask,
        html: &str,
        failed_js: Option<&str>,
    ) -> GenerationResult<Option<String>> {
        let user_prompt = format_generation_prompt(task, html, failed_js);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: GENERATION_SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: &user_prompt,
            }],
        };

        let response = match self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "anthropic request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            warn!(
                task_id = %task.task_id,
                status = %response.status(),
                "anthropic returned an error status"
            );
            return Ok(None);
        }

        let body: MessagesResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "anthropic response decode failed");
                return Ok(None);
            }
        };

        Ok(body
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}
