// SPDX-License-Identifier: Apache-2.0

//! Provider configuration registry.
//!
//! Maps a provider identifier to its static configuration. An unknown
//! identifier is an [`IssuewiseError::UnsupportedProvider`] at client
//! construction time, never a process abort, so callers can recover.
//!
//! [`IssuewiseError::UnsupportedProvider`]: crate::error::IssuewiseError::UnsupportedProvider

/// Configuration for an AI provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider identifier (lowercase, used in configuration).
    pub name: &'static str,

    /// Human-readable provider name.
    pub display_name: &'static str,

    /// Chat-completions endpoint for this provider.
    pub api_url: &'static str,

    /// Environment variable conventionally carrying the API key.
    pub api_key_env: &'static str,

    /// Default model when none is configured.
    pub default_model: &'static str,
}

/// Static registry of all supported AI providers.
pub static PROVIDERS: &[ProviderConfig] = &[ProviderConfig {
    name: "openai",
    display_name: "OpenAI",
    api_url: "https://api.openai.com/v1/chat/completions",
    api_key_env: "OPENAI_API_KEY",
    default_model: "gpt-4o-mini",
}];

/// Looks up a provider by identifier (case-insensitive).
#[must_use]
pub fn get_provider(name: &str) -> Option<&'static ProviderConfig> {
    PROVIDERS
        .iter()
        .find(|provider| provider.name.eq_ignore_ascii_case(name))
}

/// Returns all registered providers.
#[must_use]
pub fn all_providers() -> &'static [ProviderConfig] {
    PROVIDERS
}
