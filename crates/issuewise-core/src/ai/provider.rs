// SPDX-License-Identifier: Apache-2.0

//! AI provider trait and the bounded query loop.
//!
//! Defines the `AiProvider` trait every provider implements, with default
//! implementations for the HTTP transport and for [`AiProvider::query`],
//! the retrying gateway that turns a [`ModelRequest`] into raw text
//! guaranteed to parse as JSON.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelRequest, ResponseShape,
};
use crate::error::IssuewiseError;

/// Fixed number of query attempts before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Strips leading/trailing markdown code-fence markers and whitespace.
///
/// Models occasionally wrap the JSON payload in ```` ```json ```` fences
/// despite the prompt contract; the gateway tolerates that.
#[must_use]
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("```").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

/// AI provider interface.
///
/// Accessors describe one configured provider; `send_chat` is the raw
/// transport and `query` the retrying gateway built on top of it.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Returns the provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Returns the chat-completions endpoint.
    fn api_url(&self) -> &str;

    /// Returns the HTTP client for making requests.
    fn http_client(&self) -> &Client;

    /// Returns the API key for authentication.
    fn api_key(&self) -> &SecretString;

    /// Returns the model identifier.
    fn model(&self) -> &str;

    /// Returns the maximum tokens for API responses.
    fn max_tokens(&self) -> u32;

    /// Returns the temperature for the first attempt.
    fn temperature(&self) -> f32;

    /// Temperature decrement applied after each failed attempt.
    ///
    /// Biases later attempts toward more deterministic output; zero
    /// disables the adjustment.
    fn temperature_step(&self) -> f32 {
        0.0
    }

    /// Sends one chat completion request and returns the raw message content.
    ///
    /// Default implementation posts JSON with bearer authentication and
    /// surfaces non-success statuses as provider errors. No retry here;
    /// retries live in [`AiProvider::query`].
    async fn send_chat(&self, request: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .http_client()
            .post(self.api_url())
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key().expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to send request to {} API", self.name()))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                anyhow::bail!("invalid {} API key", self.name());
            }
            let error_body = response.text().await.unwrap_or_default();
            return Err(IssuewiseError::Provider {
                provider: self.name().to_string(),
                message: format!("HTTP {}: {error_body}", status.as_u16()),
            }
            .into());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .with_context(|| format!("failed to parse {} API response", self.name()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                IssuewiseError::Provider {
                    provider: self.name().to_string(),
                    message: "no choices in response".to_string(),
                }
                .into()
            })
    }

    /// Queries the model with bounded retries and shape validation.
    ///
    /// Each attempt sends the request, strips code fences from the reply,
    /// and checks it against the request's [`ResponseShape`]: the whole
    /// remainder must parse as a generic JSON value, or, for
    /// [`ResponseShape::TextWithTrailingJson`], the segment from the last
    /// `{` onward must. A transport failure or an invalid shape records the
    /// error and moves to the next attempt; the first structurally valid
    /// response is returned immediately. Exhaustion yields an error
    /// carrying the attempt count and the last underlying failure.
    #[instrument(skip(self, request), fields(provider = %self.name(), model = %self.model()))]
    async fn query(&self, request: &ModelRequest) -> Result<String> {
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..MAX_ATTEMPTS {
            #[allow(clippy::cast_precision_loss)]
            let temperature =
                (self.temperature() - self.temperature_step() * attempt as f32).max(0.0);

            let mut messages = Vec::with_capacity(2);
            if let Some(system) = &request.system_instruction {
                messages.push(ChatMessage {
                    role: "system".to_string(),
                    content: system.clone(),
                });
            }
            messages.push(ChatMessage {
                role: "user".to_string(),
                content: request.user_instruction.clone(),
            });

            let chat = ChatCompletionRequest {
                model: self.model().to_string(),
                messages,
                max_tokens: Some(self.max_tokens()),
                temperature: Some(temperature),
            };

            debug!(attempt = attempt + 1, temperature, "Sending model request");

            let content = match self.send_chat(&chat).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "Model request failed");
                    last_error = Some(e);
                    continue;
                }
            };

            let cleaned = strip_code_fences(&content);
            let candidate = match request.shape {
                ResponseShape::Json => cleaned,
                ResponseShape::TextWithTrailingJson => match cleaned.rfind('{') {
                    Some(brace) => &cleaned[brace..],
                    None => {
                        warn!(attempt = attempt + 1, "Response carries no metadata object");
                        last_error = Some(IssuewiseError::NoMetadata.into());
                        continue;
                    }
                },
            };
            match serde_json::from_str::<serde_json::Value>(candidate) {
                Ok(_) => {
                    debug!(
                        attempt = attempt + 1,
                        response_length = cleaned.len(),
                        "Received structurally valid response"
                    );
                    return Ok(cleaned.to_string());
                }
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "Response failed shape validation");
                    last_error = Some(IssuewiseError::InvalidAiResponse(e).into());
                }
            }
        }

        Err(IssuewiseError::AttemptsExhausted {
            attempts: MAX_ATTEMPTS,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        }
        .into())
    }
}
