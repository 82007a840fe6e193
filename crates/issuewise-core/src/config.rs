// SPDX-License-Identifier: Apache-2.0

//! Configuration for a single Issuewise invocation.
//!
//! The bot runs once per webhook delivery, so configuration is assembled by
//! the CLI from the CI environment and handed over as an explicit struct.
//! Construction goes through a builder with required fields; [`AppConfig::validate`]
//! rejects anything that would make event processing impossible.

use std::path::PathBuf;

use bon::Builder;
use secrecy::{ExposeSecret, SecretString};

use crate::error::IssuewiseError;

/// An independently toggleable behavior of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Post an AI-generated analysis comment on the new issue.
    Comment,
    /// Suggest and apply labels with an explanation comment.
    Label,
}

/// AI provider settings.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Provider identifier looked up in the provider registry.
    pub provider: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum tokens for API responses.
    pub max_tokens: u32,
    /// Temperature for the first attempt.
    pub temperature: f32,
    /// Temperature decrement applied after each failed attempt, floored at 0.
    pub temperature_step: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2000,
            temperature: 0.1,
            temperature_step: 0.05,
            timeout_seconds: 60,
        }
    }
}

/// Application configuration for one webhook delivery.
#[derive(Debug, Builder)]
pub struct AppConfig {
    /// GitHub access token used for all source-control calls.
    pub github_token: SecretString,
    /// API key for the AI provider.
    pub ai_api_key: SecretString,
    /// AI provider settings.
    #[builder(default)]
    pub ai: AiConfig,
    /// Path to the JSON file containing the triggering event.
    pub event_path: PathBuf,
    /// Enabled capabilities, in execution order.
    pub capabilities: Vec<Capability>,
}

impl AppConfig {
    /// Checks that all required fields carry usable values.
    ///
    /// # Errors
    ///
    /// Returns [`IssuewiseError::Config`] if a credential is empty, the event
    /// path is empty, or no capability is enabled.
    pub fn validate(&self) -> Result<(), IssuewiseError> {
        if self.github_token.expose_secret().is_empty() {
            return Err(config_error("github token is required"));
        }
        if self.ai_api_key.expose_secret().is_empty() {
            return Err(config_error("ai api key is required"));
        }
        if self.ai.provider.is_empty() {
            return Err(config_error("ai provider is required"));
        }
        if self.event_path.as_os_str().is_empty() {
            return Err(config_error("event path is required"));
        }
        if self.capabilities.is_empty() {
            return Err(config_error("at least one capability must be enabled"));
        }
        Ok(())
    }
}

fn config_error(message: &str) -> IssuewiseError {
    IssuewiseError::Config {
        message: message.to_string(),
    }
}
