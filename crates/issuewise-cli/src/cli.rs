// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for Issuewise.
//!
//! Uses clap's derive API. Every option binds to the environment
//! variables set by CI workflows, so the binary runs unattended from a
//! workflow step with no arguments at all.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use issuewise_core::ParseMode;

/// How the model response carries its metadata.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum ResponseFormat {
    /// One JSON document holding the answer and metadata (default)
    #[default]
    Structured,
    /// Free-form answer with a trailing JSON metadata object
    Trailing,
}

impl From<ResponseFormat> for ParseMode {
    fn from(format: ResponseFormat) -> Self {
        match format {
            ResponseFormat::Structured => ParseMode::Structured,
            ResponseFormat::Trailing => ParseMode::TrailingMetadata,
        }
    }
}

/// Issuewise - AI-assisted answers and labels for new GitHub issues.
///
/// Reads a GitHub issue event payload, harvests the repository, asks an
/// AI provider for an analysis, and posts comments and labels back to
/// the issue.
#[derive(Parser)]
#[command(name = "issuewise", version, about)]
pub struct Cli {
    /// GitHub access token used for all API calls
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// API key for the AI provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub ai_api_key: String,

    /// AI provider to query
    #[arg(long, env = "AI_TYPE", default_value = "openai")]
    pub ai_provider: String,

    /// Model override (defaults to the provider's standard model)
    #[arg(long, env = "AI_MODEL")]
    pub ai_model: Option<String>,

    /// Path to the GitHub event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Post an AI analysis comment on new issues
    #[arg(long, env = "ENABLE_COMMENT")]
    pub enable_comment: bool,

    /// Suggest and apply labels on new issues
    #[arg(long, env = "ENABLE_LABEL")]
    pub enable_label: bool,

    /// Expected shape of the model response
    #[arg(long, value_enum, default_value_t = ResponseFormat::Structured)]
    pub response_format: ResponseFormat,
}
