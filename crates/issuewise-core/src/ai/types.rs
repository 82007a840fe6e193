// SPDX-License-Identifier: Apache-2.0

//! Wire and request types for the chat-completions boundary.

use serde::{Deserialize, Serialize};

/// Shape the gateway validates a response against before returning it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// The whole payload must parse as a JSON value.
    #[default]
    Json,
    /// Free-form text whose segment from the last `{` onward must parse
    /// as a JSON value.
    TextWithTrailingJson,
}

/// A provider-agnostic model request, constructed fresh per query.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Optional system instruction.
    pub system_instruction: Option<String>,
    /// User instruction embedding harvested files and the question.
    pub user_instruction: String,
    /// Expected response shape, checked by the gateway on each attempt.
    pub shape: ResponseShape,
}

/// A chat message for the completions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

/// Request body for the chat completions API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
    /// Messages in the conversation.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Choices (usually just one).
    pub choices: Vec<Choice>,
}

/// A single choice in the chat completion response.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChatMessage,
}
