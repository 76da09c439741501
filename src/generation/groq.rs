//! Chat-completions client for the audit generator
//!
//! Sends a single user message to an OpenAI-compatible chat completions
//! endpoint. One attempt per audit; no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::{
    GENERATION_ENDPOINT, GENERATION_MAX_TOKENS, GENERATION_MODEL, GENERATION_TEMPERATURE,
};
use crate::error::GenerationError;
use crate::generation::{audit_prompt, AuditGenerator, AuditResult};

/// Chat completions request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Conversation, here always a single user turn
    pub messages: Vec<ChatMessage<'a>>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output length cap
    pub max_tokens: u32,
}

/// One request message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    /// Speaker role
    pub role: &'a str,
    /// Message text
    pub content: &'a str,
}

/// Chat completions response body, reduced to the fields we read
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion candidate
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Assistant message, if any
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Assistant message inside a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if present and non-empty
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

/// Audit generator backed by the Groq chat completions API
#[derive(Debug, Clone)]
pub struct GroqGenerator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GroqGenerator {
    /// Create a generator against the production endpoint
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: GENERATION_ENDPOINT.to_string(),
        }
    }

    /// Point the generator at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single request/response exchange; `Ok(None)` when the response
    /// carries no content.
    pub async fn request_audit(&self, website: &str) -> Result<Option<String>, GenerationError> {
        let prompt = audit_prompt(website);
        let body = ChatRequest {
            model: GENERATION_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Generation API error");
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(parsed.first_content().map(str::to_string))
    }
}

#[async_trait]
impl AuditGenerator for GroqGenerator {
    #[instrument(skip(self))]
    async fn generate(&self, website: &str) -> AuditResult {
        info!(website, "Analyzing business website");

        match self.request_audit(website).await {
            Ok(Some(text)) => {
                info!(chars = text.len(), "AI audit generated successfully");
                AuditResult::model(text)
            }
            Ok(None) => {
                warn!("Generation response had no content");
                AuditResult::empty_response()
            }
            Err(e) => {
                error!(error = %e, "Audit generation failed, using fallback");
                AuditResult::fallback(website)
            }
        }
    }
}
