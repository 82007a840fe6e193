// SPDX-License-Identifier: Apache-2.0

//! Prompt construction.
//!
//! Pure builders turning harvested files and issue text into
//! [`ModelRequest`]s. Every prompt carries an explicit output-format
//! contract: a single JSON object, no markdown fencing, with the keys the
//! parser expects for that mode.

use std::fmt::Write;

use super::types::{ModelRequest, ResponseShape};
use crate::github::RepoLabel;
use crate::harvest::HarvestedFile;

/// Advisory confidence rubric communicated to the model.
/// Not enforced structurally; the parser only checks the [0, 1] range.
const CONFIDENCE_GUIDE: &str = "Confidence Score Guide:\n\
     - 0.0-0.3: Limited context or understanding\n\
     - 0.4-0.6: Partial context, moderate understanding\n\
     - 0.7-0.9: Good context, clear understanding\n\
     - 1.0: Complete context, full understanding";

const CODE_SYSTEM_INSTRUCTION: &str = "You are a specialized AI code assistant with expertise in \
     analyzing codebases and providing technical explanations.\n\n\
     Your core responsibilities:\n\
     1. Analyze code thoroughly and provide accurate, well-structured explanations\n\
     2. Focus on practical, implementation-focused responses\n\
     3. Always include relevant code examples and file references\n\
     4. Maintain a professional and educational tone\n\
     5. Ensure responses are complete and well-organized";

const LABEL_SYSTEM_INSTRUCTION: &str = "You are a GitHub issue labeling assistant. Given an \
     issue and the labels available in the repository, estimate how well each label fits the \
     issue. Only suggest labels that exist in the repository, and be conservative: a high \
     confidence means the label clearly applies.";

/// Builds the code-analysis request for the comment capability.
///
/// Renders one block per harvested file in harvest order, then the
/// question. The contract requires keys `answer` (string, may contain
/// markdown and escaped newlines) and `confidence` (number in [0, 1]),
/// with an optional `relevant_files` list.
#[must_use]
pub fn code_analysis_request(question: &str, files: &[HarvestedFile]) -> ModelRequest {
    let mut user = String::new();

    user.push_str(
        "Analyze the codebase and provide a response in the following JSON format \
         (DO NOT wrap the response in code blocks):\n\
         {\n\
         \x20 \"answer\": \"Your detailed explanation here, using markdown formatting \
         with escaped newlines\",\n\
         \x20 \"confidence\": 0.8,\n\
         \x20 \"relevant_files\": [\"path/to/file.ext\"]\n\
         }\n\n\
         Response Requirements:\n\
         1. Make explanations comprehensive yet concise\n\
         2. Reference specific files when relevant\n\
         3. Ensure the response is complete (no truncated sentences)\n\
         4. Return ONLY the JSON object, no markdown code blocks\n\n",
    );
    user.push_str(CONFIDENCE_GUIDE);
    user.push_str("\n\nAvailable Files:\n");
    for file in files {
        let _ = write!(user, "File: {}\nContent:\n{}\n\n", file.path, file.content);
    }
    let _ = write!(user, "\nQuestion:\n{question}");

    ModelRequest {
        system_instruction: Some(CODE_SYSTEM_INSTRUCTION.to_string()),
        user_instruction: user,
        shape: ResponseShape::Json,
    }
}

/// Builds the label-suggestion request for the label capability.
///
/// The contract requires keys `suggested_labels` (object mapping label
/// name to confidence in [0, 1]) and `explanation` (string).
#[must_use]
pub fn label_suggestion_request(title: &str, body: &str, labels: &[RepoLabel]) -> ModelRequest {
    let mut user = String::new();

    user.push_str(
        "Suggest labels for the following GitHub issue and respond in this JSON format \
         (DO NOT wrap the response in code blocks):\n\
         {\n\
         \x20 \"suggested_labels\": {\"label-name\": 0.9},\n\
         \x20 \"explanation\": \"Why these labels fit\"\n\
         }\n\n\
         Each confidence must be a number in [0, 1]. Only use label names from the \
         Available Labels list.\n\n",
    );
    user.push_str(CONFIDENCE_GUIDE);
    user.push_str("\n\nAvailable Labels:\n");
    for label in labels {
        if label.description.is_empty() {
            let _ = writeln!(user, "- {}", label.name);
        } else {
            let _ = writeln!(user, "- {} - {}", label.name, label.description);
        }
    }
    let _ = write!(user, "\nIssue Title:\n{title}\n\nIssue Body:\n{body}");

    ModelRequest {
        system_instruction: Some(LABEL_SYSTEM_INSTRUCTION.to_string()),
        user_instruction: user,
        shape: ResponseShape::Json,
    }
}
