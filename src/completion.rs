//! Completion backend abstraction and implementations.
//!
//! Defines the [`CompletionBackend`] trait and concrete implementations:
//! - **[`DisabledBackend`]** — demo-mode stand-in used when no generation
//!   credential is configured; the orchestrator routes demo mode to the
//!   synthetic preview, so this backend is not expected to be called.
//! - **[`OpenAiBackend`]** — calls an OpenAI-compatible chat completions
//!   API with the configured model, token budget, and temperature.
//!
//! Failures are typed, not stringly: authentication, empty content, and
//! provider errors are distinct variants so the orchestrator and the HTTP
//! layer can classify them. There are no internal retries; the caller
//! decides whether to surface or fall back.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::GenerationConfig;
use crate::models::CompletionRequest;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("authentication with the generation provider failed")]
    Auth,
    #[error("generation provider returned no usable content")]
    EmptyResponse,
    #[error("generation provider error (status {status}): {message}")]
    Provider { status: u16, message: String },
    #[error("transport error calling generation provider: {0}")]
    Transport(String),
}

/// Narrow call-and-get-text contract over the text-generation capability.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Model identifier, e.g. `"gpt-4o-mini"`.
    fn model_name(&self) -> &str;

    /// Whether a live provider is behind this backend. Demo mode reports
    /// `false` and the orchestrator synthesizes the reply locally.
    fn is_live(&self) -> bool {
        true
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

// ============ Disabled Backend ============

/// Demo-mode backend used when `generation.provider = "disabled"`.
pub struct DisabledBackend;

#[async_trait]
impl CompletionBackend for DisabledBackend {
    fn model_name(&self) -> &str {
        "disabled"
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::EmptyResponse)
    }
}

// ============ OpenAI-compatible Backend ============

/// Chat completions over an OpenAI-compatible HTTP API.
///
/// Posts to `{base_url}/chat/completions` with a system and a user message.
/// `401`/`403` map to [`CompletionError::Auth`], other non-success statuses
/// to [`CompletionError::Provider`], and a missing or blank
/// `choices[0].message.content` to [`CompletionError::EmptyResponse`].
pub struct OpenAiBackend {
    http: Client,
    cfg: GenerationConfig,
    api_key: String,
}

impl OpenAiBackend {
    /// Build the backend. Fails when no credential is available: a
    /// configuration error must surface at startup, before any request
    /// is accepted.
    pub fn new(cfg: &GenerationConfig) -> anyhow::Result<OpenAiBackend> {
        let api_key = cfg.resolve_api_key().ok_or_else(|| {
            anyhow::anyhow!("OPENAI_API_KEY not set and no generation.api_key configured")
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("matchdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(OpenAiBackend {
            http,
            cfg: cfg.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn model_name(&self) -> &str {
        &self.cfg.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.cfg.base_url);
        let body = serde_json::json!({
            "model": self.cfg.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": self.cfg.max_tokens,
            "temperature": self.cfg.temperature,
        });

        info!(model = %self.cfg.model, "calling generation provider");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Transport("timeout".to_string())
                } else {
                    CompletionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(CompletionError::Auth);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message: truncate(&message, 300),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        parse_chat_response(&json)
    }
}

/// Extract `choices[0].message.content` from a chat completions payload.
fn parse_chat_response(json: &serde_json::Value) -> Result<String, CompletionError> {
    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .trim();

    if content.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }

    Ok(content.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

/// Select the backend for the configured generation provider.
pub fn create_backend(cfg: &GenerationConfig) -> anyhow::Result<Box<dyn CompletionBackend>> {
    match cfg.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledBackend)),
        "openai" => Ok(Box::new(OpenAiBackend::new(cfg)?)),
        other => anyhow::bail!("Unknown generation provider: {}", other),
    }
}
