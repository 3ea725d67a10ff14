// Chat-completion provider for OpenAI-compatible endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::RemoteError;

use super::{RemoteModel, extract_content};

#[derive(Debug)]
pub struct ChatCompletionProvider {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
}

impl ChatCompletionProvider {
    /// Build a provider posting to `url` with a client-level request timeout.
    pub fn new(url: String, model: String, timeout: Duration) -> Result<Self, RemoteError> {
        install_crypto_provider();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Config(e.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key: None,
            model,
            temperature: 0.0,
        })
    }

    /// Build a provider from the `[remote]` config section; `None` when no endpoint is set.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>, RemoteError> {
        let Some(url) = config.endpoint() else {
            return Ok(None);
        };
        let provider = Self::new(
            url.to_string(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_temperature(config.temperature);
        Ok(Some(match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => provider.with_api_key(key.to_string()),
            _ => provider,
        }))
    }

    #[must_use]
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// reqwest is built without a bundled TLS backend; register aws-lc-rs once per process.
fn install_crypto_provider() {
    // Err means another provider is already installed, which is fine.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[async_trait::async_trait]
#[allow(clippy::unnecessary_literal_bound)]
impl RemoteModel for ChatCompletionProvider {
    fn name(&self) -> &str {
        "chat-completion"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, RemoteError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        debug!(model = %self.model, url = %self.url, "Calling remote model");

        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(RemoteError::ApiError { status, body: text });
        }

        let result: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        extract_content(&result).ok_or(RemoteError::EmptyContent)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
