//! OpenAI implementation of the script generator.
//!
//! A reference adapter using the chat-completions API.
//!
//! # Example
//!
//! ```rust,ignore
//! use selfheal::generators::OpenAiGenerator;
//!
//! let generator = OpenAiGenerator::from_env()?.with_model("gpt-4o");
//! let engine = HealingEngine::new(store).with_generator(Arc::new(generator));
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GenerationError, GenerationResult};
use crate::prompts::{format_generation_prompt, GENERATION_SYSTEM_PROMPT};
use crate::traits::generator::ScriptGenerator;
use crate::types::task::ExtractionTask;

/// OpenAI-based script generator.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> GenerationResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GenerationError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ScriptGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        task: &ExtractionTask,
        html: &str,
        failed_js: Option<&str>,
    ) -> GenerationResult<Option<String>> {
        let user_prompt = format_generation_prompt(task, html, failed_js);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: GENERATION_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.2,
        };

        let response = match self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "openai request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            warn!(
                task_id = %task.task_id,
                status = %response.status(),
                "openai returned an error status"
            );
            return Ok(None);
        }

        let body: ChatResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "openai response decode failed");
                return Ok(None);
            }
        };

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()))
    }
}
