// SPDX-License-Identifier: Apache-2.0

//! Structured-response parsing.
//!
//! Two response conventions coexisted historically and both are supported,
//! selected by [`ParseMode`]:
//!
//! - **Structured** (the default): the entire payload is a JSON object
//!   carrying the expected keys.
//! - **Trailing metadata**: free-form prose followed by a terminal JSON
//!   object carrying `confidence` and optional `relevant_files`.
//!
//! Confidence values outside `[0, 1]` are a contract violation by the
//! provider and fail the parse; they are never clamped.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::IssuewiseError;

/// Which response convention the deployment expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Whole payload is a JSON object.
    #[default]
    Structured,
    /// Prose answer followed by a trailing JSON metadata object.
    TrailingMetadata,
}

/// Result of a code-analysis query.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeAnalysis {
    /// Answer text, may contain markdown.
    pub answer: String,
    /// Model-reported confidence in `[0, 1]`.
    pub confidence: f64,
    /// Paths the model considered relevant.
    #[serde(default)]
    pub relevant_files: Vec<String>,
}

/// Result of a label-suggestion query.
///
/// Labels are keyed in a `BTreeMap` so downstream ordering (threshold
/// filtering, the explanation comment) is deterministic.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelAnalysis {
    /// Suggested label names mapped to confidence in `[0, 1]`.
    pub suggested_labels: BTreeMap<String, f64>,
    /// The model's rationale for its suggestions.
    pub explanation: String,
}

/// Trailing JSON metadata in compatibility mode.
#[derive(Debug, Deserialize)]
struct TrailingMetadata {
    confidence: f64,
    #[serde(default)]
    relevant_files: Vec<String>,
}

/// Parses a code-analysis payload according to `mode`.
///
/// # Errors
///
/// Fails if required keys are absent or mistyped, if the trailing-metadata
/// payload has no `{`, or if a confidence is outside `[0, 1]`.
pub fn parse_code_analysis(raw: &str, mode: ParseMode) -> Result<CodeAnalysis, IssuewiseError> {
    match mode {
        ParseMode::Structured => {
            let analysis: CodeAnalysis =
                serde_json::from_str(raw).map_err(IssuewiseError::InvalidAiResponse)?;
            validate_confidence(analysis.confidence)?;
            Ok(analysis)
        }
        ParseMode::TrailingMetadata => {
            // Everything before the last '{' is the answer; the rest is metadata.
            let brace = raw.rfind('{').ok_or(IssuewiseError::NoMetadata)?;
            let metadata: TrailingMetadata =
                serde_json::from_str(&raw[brace..]).map_err(IssuewiseError::InvalidAiResponse)?;
            validate_confidence(metadata.confidence)?;
            Ok(CodeAnalysis {
                answer: raw[..brace].trim().to_string(),
                confidence: metadata.confidence,
                relevant_files: metadata.relevant_files,
            })
        }
    }
}

/// Parses a label-suggestion payload (always structured).
///
/// # Errors
///
/// Fails if required keys are absent or mistyped, or if any confidence is
/// outside `[0, 1]`.
pub fn parse_label_analysis(raw: &str) -> Result<LabelAnalysis, IssuewiseError> {
    let analysis: LabelAnalysis =
        serde_json::from_str(raw).map_err(IssuewiseError::InvalidAiResponse)?;
    for confidence in analysis.suggested_labels.values() {
        validate_confidence(*confidence)?;
    }
    Ok(analysis)
}

fn validate_confidence(value: f64) -> Result<(), IssuewiseError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(IssuewiseError::ConfidenceOutOfRange { value })
    }
}
