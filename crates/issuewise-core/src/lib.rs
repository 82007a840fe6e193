// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Issuewise Core
//!
//! Core library for the Issuewise bot - AI-assisted answers and labels
//! for newly opened GitHub issues.
//!
//! This crate provides reusable components for:
//! - GitHub API integration (content listing, comments, labels)
//! - Repository harvesting with configurable file filtering
//! - AI querying with retries and response validation
//! - Parsing structured model responses into typed analyses
//! - Orchestrating the comment and label capabilities for one event
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use issuewise_core::{
//!     AiClient, AiConfig, Assistant, Capability, GitHubClient, Harvester, ParseMode, load_event,
//! };
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let github_token = SecretString::from("ghp_...".to_string());
//! let ai_key = SecretString::from("sk-...".to_string());
//!
//! let host = GitHubClient::new(&github_token)?;
//! let ai = AiClient::new("openai", ai_key, &AiConfig::default())?;
//!
//! let assistant = Assistant::new(
//!     Arc::new(host),
//!     Arc::new(ai),
//!     Harvester::default(),
//!     ParseMode::Structured,
//!     vec![Capability::Comment, Capability::Label],
//! );
//!
//! let event = load_event("event.json".as_ref())?;
//! assistant.run(&event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ai`] - AI integration (provider registry, chat API, prompts)
//! - [`config`] - Runtime configuration and capabilities
//! - [`error`] - Error types
//! - [`event`] - GitHub issue event payloads
//! - [`github`] - GitHub API (content, comments, labels)
//! - [`harvest`] - Repository snapshot harvesting and filtering
//! - [`orchestrator`] - Per-event capability orchestration
//! - [`parser`] - Model response parsing

// ============================================================================
// Error Handling
// ============================================================================

pub use error::IssuewiseError;

/// Convenience Result type for Issuewise operations.
///
/// This is equivalent to `std::result::Result<T, IssuewiseError>`.
pub type Result<T> = std::result::Result<T, IssuewiseError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AiConfig, AppConfig, Capability};

// ============================================================================
// Events
// ============================================================================

pub use event::{IssueEvent, load_event};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::{EntryKind, GitHubClient, RepoHost, RepoLabel, TreeEntry};

// ============================================================================
// Harvesting
// ============================================================================

pub use harvest::{FileFilter, FileKind, HarvestedFile, Harvester};

// ============================================================================
// AI Integration
// ============================================================================

pub use ai::{
    AiClient, AiProvider, MAX_ATTEMPTS, ModelRequest, ProviderConfig, ResponseShape,
    all_providers, get_provider, strip_code_fences,
};

// ============================================================================
// Response Parsing
// ============================================================================

pub use parser::{
    CodeAnalysis, LabelAnalysis, ParseMode, parse_code_analysis, parse_label_analysis,
};

// ============================================================================
// Orchestration
// ============================================================================

pub use orchestrator::{Assistant, LABEL_CONFIDENCE_THRESHOLD};

// ============================================================================
// Modules
// ============================================================================

pub mod ai;
pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod harvest;
pub mod orchestrator;
pub mod parser;
