// SPDX-License-Identifier: Apache-2.0

//! AI integration module.
//!
//! Prompt construction, the provider registry, and the retrying query
//! gateway over a chat-completions API.

pub mod client;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod types;

pub use client::AiClient;
pub use provider::{AiProvider, MAX_ATTEMPTS, strip_code_fences};
pub use registry::{ProviderConfig, all_providers, get_provider};
pub use types::{ModelRequest, ResponseShape};
