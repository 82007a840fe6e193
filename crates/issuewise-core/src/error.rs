// SPDX-License-Identifier: Apache-2.0

//! Error types for Issuewise.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during Issuewise operations.
///
/// GitHub and transport failures are carried as `anyhow` chains with call
/// site context; only conditions callers match on get a variant here.
#[derive(Error, Debug)]
pub enum IssuewiseError {
    /// AI provider error (HTTP failure, bad status, empty choice list).
    #[error("AI provider error from {provider}: {message}")]
    Provider {
        /// Name of the AI provider.
        provider: String,
        /// Error message from the provider.
        message: String,
    },

    /// Provider identifier has no entry in the provider registry.
    ///
    /// Returned instead of terminating the process so callers can recover.
    #[error("unsupported AI provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider identifier.
        name: String,
    },

    /// Every query attempt failed; carries the last underlying error.
    #[error("AI query failed after {attempts} attempts: {last_error}")]
    AttemptsExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Message of the last recorded failure.
        last_error: String,
    },

    /// Response text was not the JSON shape the contract requires.
    #[error("invalid JSON response from AI")]
    InvalidAiResponse(#[source] serde_json::Error),

    /// Model reported a confidence outside `[0, 1]`.
    ///
    /// Treated as a contract violation by the provider, never clamped.
    #[error("confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange {
        /// The offending confidence value.
        value: f64,
    },

    /// Trailing-metadata payload contained no JSON object.
    #[error("no metadata found in AI response")]
    NoMetadata,

    /// Configuration error (missing credential, capability, or event path).
    #[error("configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}
