// SPDX-License-Identifier: Apache-2.0

//! Generic AI client for registered providers.
//!
//! A single `AiClient` works with any provider in the registry; provider
//! lookup happens at construction so an unknown identifier surfaces as a
//! typed error instead of failing deep inside a query.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;

use super::provider::AiProvider;
use super::registry::{ProviderConfig, get_provider};
use crate::config::AiConfig;
use crate::error::IssuewiseError;

/// Provider-backed AI client.
///
/// Holds the HTTP client, API key, and model parameters for reuse across
/// requests within one invocation.
#[derive(Debug)]
pub struct AiClient {
    provider: &'static ProviderConfig,
    http: Client,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
    temperature_step: f32,
}

impl AiClient {
    /// Creates a client for the named provider.
    ///
    /// # Errors
    ///
    /// Returns [`IssuewiseError::UnsupportedProvider`] if the name has no
    /// registry entry, or an error if the HTTP client cannot be built.
    pub fn new(provider_name: &str, api_key: SecretString, config: &AiConfig) -> Result<Self> {
        let provider =
            get_provider(provider_name).ok_or_else(|| IssuewiseError::UnsupportedProvider {
                name: provider_name.to_string(),
            })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("failed to create HTTP client")?;

        let model = if config.model.is_empty() {
            provider.default_model.to_string()
        } else {
            config.model.clone()
        };

        Ok(Self {
            provider,
            http,
            api_key,
            model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            temperature_step: config.temperature_step,
        })
    }
}

#[async_trait]
impl AiProvider for AiClient {
    fn name(&self) -> &str {
        self.provider.name
    }

    fn api_url(&self) -> &str {
        self.provider.api_url
    }

    fn http_client(&self) -> &Client {
        &self.http
    }

    fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn temperature_step(&self) -> f32 {
        self.temperature_step
    }
}
