// SPDX-License-Identifier: Apache-2.0

//! Issuewise - AI-assisted answers and labels for new GitHub issues.
//!
//! A CI-friendly binary that reads a GitHub issue event payload, queries
//! an AI provider about the repository, and posts the results back to
//! the issue as comments and labels.

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use issuewise_core::{
    AiClient, AiConfig, AppConfig, Assistant, Capability, GitHubClient, Harvester, load_event,
};
use secrecy::SecretString;
use tracing::debug;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut ai = AiConfig::default();
    ai.provider.clone_from(&cli.ai_provider);
    if let Some(model) = &cli.ai_model {
        ai.model.clone_from(model);
        debug!("Overriding AI model to: {model}");
    }

    let mut capabilities = Vec::new();
    if cli.enable_comment {
        capabilities.push(Capability::Comment);
    }
    if cli.enable_label {
        capabilities.push(Capability::Label);
    }

    let config = AppConfig::builder()
        .github_token(SecretString::from(cli.github_token))
        .ai_api_key(SecretString::from(cli.ai_api_key))
        .ai(ai)
        .event_path(cli.event_path)
        .capabilities(capabilities)
        .build();
    config.validate().context("Invalid configuration")?;
    debug!("Configuration validated");

    let host = GitHubClient::new(&config.github_token).context("Failed to build GitHub client")?;
    let provider = AiClient::new(&config.ai.provider, config.ai_api_key.clone(), &config.ai)
        .context("Failed to build AI client")?;

    let event =
        load_event(&config.event_path).context("Failed to load issue event payload")?;

    let assistant = Assistant::new(
        Arc::new(host),
        Arc::new(provider),
        Harvester::default(),
        cli.response_format.into(),
        config.capabilities.clone(),
    );

    assistant.run(&event).await
}
