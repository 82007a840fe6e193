// SPDX-License-Identifier: Apache-2.0

//! Webhook event payload parsing.
//!
//! GitHub Actions exposes the triggering event as a JSON file whose path is
//! in `GITHUB_EVENT_PATH`. The payload is parsed once and read-only afterward.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// A GitHub issue event as delivered by the `issues` webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    /// Event action, e.g. `"opened"`, `"closed"`, `"edited"`.
    pub action: String,
    /// The issue the event refers to.
    pub issue: EventIssue,
    /// The repository the event originates from.
    pub repository: EventRepository,
}

/// Issue fields carried by the event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EventIssue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body; absent bodies decode as empty.
    #[serde(default)]
    pub body: String,
}

/// Repository fields carried by the event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    /// Repository owner.
    pub owner: EventOwner,
    /// Repository name.
    pub name: String,
}

/// Owner login wrapper, matching the webhook JSON shape.
#[derive(Debug, Clone, Deserialize)]
pub struct EventOwner {
    /// Owner login name.
    pub login: String,
}

impl IssueEvent {
    /// Returns true if this event announces a newly opened issue.
    ///
    /// Every capability short-circuits on anything else.
    #[must_use]
    pub fn is_new_issue(&self) -> bool {
        self.action == "opened"
    }
}

/// Reads and decodes the event payload from `path`.
///
/// A malformed or unreadable payload is fatal: without it there is no issue
/// to act on.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid issue event.
pub fn load_event(path: &Path) -> Result<IssueEvent> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event payload from {}", path.display()))?;

    let event: IssueEvent = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse event payload at {}", path.display()))?;

    debug!(
        action = %event.action,
        number = event.issue.number,
        repo = %format!("{}/{}", event.repository.owner.login, event.repository.name),
        "Loaded issue event"
    );

    Ok(event)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE_EVENT: &str = r#"{
        "action": "opened",
        "issue": {"number": 42, "title": "Crash on startup", "body": "It crashes."},
        "repository": {"owner": {"login": "octocat"}, "name": "hello-world"}
    }"#;

    #[test]
    fn test_load_event_parses_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_EVENT.as_bytes()).unwrap();

        let event = load_event(file.path()).unwrap();
        assert_eq!(event.action, "opened");
        assert_eq!(event.issue.number, 42);
        assert_eq!(event.issue.title, "Crash on startup");
        assert_eq!(event.repository.owner.login, "octocat");
        assert_eq!(event.repository.name, "hello-world");
        assert!(event.is_new_issue());
    }

    #[test]
    fn test_load_event_missing_body_defaults_empty() {
        let payload = r#"{
            "action": "closed",
            "issue": {"number": 7, "title": "No body"},
            "repository": {"owner": {"login": "o"}, "name": "r"}
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(payload.as_bytes()).unwrap();

        let event = load_event(file.path()).unwrap();
        assert_eq!(event.issue.body, "");
        assert!(!event.is_new_issue());
    }

    #[test]
    fn test_load_event_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(load_event(file.path()).is_err());
    }

    #[test]
    fn test_load_event_missing_file() {
        let err = load_event(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read event payload"));
    }
}
