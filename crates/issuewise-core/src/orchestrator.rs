// SPDX-License-Identifier: Apache-2.0

//! Capability orchestration.
//!
//! Composes harvesting, prompt construction, the model gateway, and
//! response parsing per enabled capability, and drives the side effects
//! (posting comments, applying labels). Capabilities are independent: a
//! failure in one is logged and never blocks a sibling.

use std::fmt::Write;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::ai::types::ResponseShape;
use crate::ai::{AiProvider, prompt};
use crate::config::Capability;
use crate::event::IssueEvent;
use crate::github::RepoHost;
use crate::harvest::Harvester;
use crate::parser::{self, ParseMode};

/// Minimum confidence for a suggested label to be applied (inclusive).
pub const LABEL_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Fixed attribution footer appended to every analysis comment.
const COMMENT_FOOTER: &str = "---\n\
     _This analysis was performed by \
     [Issuewise](https://github.com/issuewise/issuewise). If you have any \
     questions, please contact the repository maintainers._";

/// Drives the enabled capabilities for one issue event.
pub struct Assistant {
    host: Arc<dyn RepoHost>,
    provider: Arc<dyn AiProvider>,
    harvester: Harvester,
    parse_mode: ParseMode,
    capabilities: Vec<Capability>,
}

impl Assistant {
    /// Creates an assistant from its collaborators.
    #[must_use]
    pub fn new(
        host: Arc<dyn RepoHost>,
        provider: Arc<dyn AiProvider>,
        harvester: Harvester,
        parse_mode: ParseMode,
        capabilities: Vec<Capability>,
    ) -> Self {
        Self {
            host,
            provider,
            harvester,
            parse_mode,
            capabilities,
        }
    }

    /// Processes one issue event.
    ///
    /// Events whose action is not `"opened"` short-circuit before any
    /// capability runs. Capability failures are logged and swallowed so
    /// siblings still run; only the short-circuit path and success reach
    /// `Ok`.
    ///
    /// # Errors
    ///
    /// Currently never fails; the `Result` return leaves room for fatal
    /// conditions discovered during orchestration.
    #[instrument(skip(self, event), fields(action = %event.action, number = event.issue.number))]
    pub async fn run(&self, event: &IssueEvent) -> Result<()> {
        if !event.is_new_issue() {
            info!("Event is not a new issue, skipping");
            return Ok(());
        }

        let owner = &event.repository.owner.login;
        let repo = &event.repository.name;
        info!(repo = %format!("{owner}/{repo}"), "Processing new issue event");

        for capability in &self.capabilities {
            let outcome = match capability {
                Capability::Comment => self.run_comment(owner, repo, event).await,
                Capability::Label => self.run_label(owner, repo, event).await,
            };
            if let Err(e) = outcome {
                warn!(capability = ?capability, error = %format!("{e:#}"), "Capability failed");
            }
        }

        info!("Finished processing issue event");
        Ok(())
    }

    /// Comment capability: harvest, query, parse, post the analysis.
    async fn run_comment(&self, owner: &str, repo: &str, event: &IssueEvent) -> Result<()> {
        let files = self
            .harvester
            .harvest(self.host.as_ref(), owner, repo)
            .await?;
        debug!(files = files.len(), "Harvested repository content");

        let mut request = prompt::code_analysis_request(&event.issue.body, &files);
        if self.parse_mode == ParseMode::TrailingMetadata {
            request.shape = ResponseShape::TextWithTrailingJson;
        }
        let raw = self.provider.query(&request).await?;
        let analysis = parser::parse_code_analysis(&raw, self.parse_mode)?;
        debug!(
            confidence = analysis.confidence,
            relevant_files = analysis.relevant_files.len(),
            "Parsed code analysis"
        );

        let body = format_analysis_comment(&analysis.answer);
        self.host
            .create_comment(owner, repo, event.issue.number, &body)
            .await
    }

    /// Label capability: suggest labels, apply those above the threshold,
    /// post an explanation.
    async fn run_label(&self, owner: &str, repo: &str, event: &IssueEvent) -> Result<()> {
        let labels = self.host.list_labels(owner, repo).await?;
        if labels.is_empty() {
            debug!("Repository has no labels, skipping label capability");
            return Ok(());
        }

        let request = prompt::label_suggestion_request(&event.issue.title, &event.issue.body, &labels);
        let raw = self.provider.query(&request).await?;
        let analysis = parser::parse_label_analysis(&raw)?;

        let selected: Vec<String> = analysis
            .suggested_labels
            .iter()
            .filter(|(_, confidence)| **confidence >= LABEL_CONFIDENCE_THRESHOLD)
            .map(|(name, _)| name.clone())
            .collect();
        if selected.is_empty() {
            debug!("No suggested label met the confidence threshold, skipping");
            return Ok(());
        }

        self.host
            .add_labels(owner, repo, event.issue.number, &selected)
            .await?;

        let body = format_label_comment(&selected, &analysis.explanation);
        self.host
            .create_comment(owner, repo, event.issue.number, &body)
            .await
    }
}

/// Formats the analysis comment: answer plus the attribution footer.
fn format_analysis_comment(answer: &str) -> String {
    format!("🤖 AI Assistant Analysis\n\n{answer}\n\n{COMMENT_FOOTER}")
}

/// Formats the explanation comment posted after labels are applied.
fn format_label_comment(labels: &[String], explanation: &str) -> String {
    let mut body = String::from("🏷️ Applied labels:\n\n");
    for label in labels {
        let _ = writeln!(body, "- `{label}`");
    }
    let _ = write!(body, "\n{explanation}\n\n{COMMENT_FOOTER}");
    body
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::Client;
    use secrecy::SecretString;

    use super::*;
    use crate::ai::ModelRequest;
    use crate::ai::types::ChatCompletionRequest;
    use crate::github::{EntryKind, RepoLabel, TreeEntry};

    /// Records every host/provider call, in order, by name.
    #[derive(Default)]
    struct CallLog(Mutex<Vec<String>>);

    impl CallLog {
        fn record(&self, name: &str) {
            self.0.lock().unwrap().push(name.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == name).count()
        }
    }

    struct RecordingHost {
        log: Arc<CallLog>,
        labels: Vec<RepoLabel>,
        fail_harvest: bool,
        applied_labels: Mutex<Vec<String>>,
        comments: Mutex<Vec<String>>,
    }

    impl RecordingHost {
        fn new(log: Arc<CallLog>) -> Self {
            Self {
                log,
                labels: Vec::new(),
                fail_harvest: false,
                applied_labels: Mutex::new(Vec::new()),
                comments: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RepoHost for RecordingHost {
        async fn list_dir(&self, _: &str, _: &str, path: &str) -> Result<Vec<TreeEntry>> {
            self.log.record("list_dir");
            if self.fail_harvest {
                anyhow::bail!("listing failed");
            }
            if path.is_empty() {
                Ok(vec![TreeEntry {
                    name: "main.rs".to_string(),
                    path: "main.rs".to_string(),
                    kind: EntryKind::File,
                }])
            } else {
                Ok(Vec::new())
            }
        }

        async fn file_content(&self, _: &str, _: &str, _: &str) -> Result<String> {
            self.log.record("file_content");
            Ok("fn main() {}".to_string())
        }

        async fn create_comment(&self, _: &str, _: &str, _: u64, body: &str) -> Result<()> {
            self.log.record("create_comment");
            self.comments.lock().unwrap().push(body.to_string());
            Ok(())
        }

        async fn add_labels(&self, _: &str, _: &str, _: u64, labels: &[String]) -> Result<()> {
            self.log.record("add_labels");
            self.applied_labels.lock().unwrap().extend_from_slice(labels);
            Ok(())
        }

        async fn list_labels(&self, _: &str, _: &str) -> Result<Vec<RepoLabel>> {
            self.log.record("list_labels");
            Ok(self.labels.clone())
        }
    }

    struct RecordingProvider {
        log: Arc<CallLog>,
        response: String,
        http: Client,
        key: SecretString,
        seen_shapes: Mutex<Vec<ResponseShape>>,
    }

    impl RecordingProvider {
        fn new(log: Arc<CallLog>, response: &str) -> Self {
            Self {
                log,
                response: response.to_string(),
                http: Client::new(),
                key: SecretString::from("test"),
                seen_shapes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn api_url(&self) -> &str {
            "https://recording.invalid"
        }

        fn http_client(&self) -> &Client {
            &self.http
        }

        fn api_key(&self) -> &SecretString {
            &self.key
        }

        fn model(&self) -> &str {
            "recording-model"
        }

        fn max_tokens(&self) -> u32 {
            2000
        }

        fn temperature(&self) -> f32 {
            0.1
        }

        async fn send_chat(&self, _request: &ChatCompletionRequest) -> Result<String> {
            unimplemented!("query is overridden")
        }

        async fn query(&self, request: &ModelRequest) -> Result<String> {
            self.log.record("query");
            self.seen_shapes.lock().unwrap().push(request.shape);
            Ok(self.response.clone())
        }
    }

    fn opened_event() -> IssueEvent {
        serde_json::from_str(
            r#"{
                "action": "opened",
                "issue": {"number": 1, "title": "Bug report", "body": "It breaks."},
                "repository": {"owner": {"login": "octocat"}, "name": "hello"}
            }"#,
        )
        .unwrap()
    }

    fn closed_event() -> IssueEvent {
        serde_json::from_str(
            r#"{
                "action": "closed",
                "issue": {"number": 1, "title": "t", "body": "b"},
                "repository": {"owner": {"login": "o"}, "name": "r"}
            }"#,
        )
        .unwrap()
    }

    fn assistant(
        host: Arc<RecordingHost>,
        provider: Arc<RecordingProvider>,
        capabilities: Vec<Capability>,
    ) -> Assistant {
        Assistant::new(host, provider, Harvester::default(), ParseMode::Structured, capabilities)
    }

    const CODE_RESPONSE: &str = r#"{"answer": "Fix the loop.", "confidence": 0.8}"#;

    #[tokio::test]
    async fn test_non_opened_event_makes_no_calls() {
        let log = Arc::new(CallLog::default());
        let host = Arc::new(RecordingHost::new(Arc::clone(&log)));
        let provider = Arc::new(RecordingProvider::new(Arc::clone(&log), CODE_RESPONSE));

        assistant(host, provider, vec![Capability::Comment, Capability::Label])
            .run(&closed_event())
            .await
            .unwrap();

        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_comment_capability_runs_harvest_query_post_in_order() {
        let log = Arc::new(CallLog::default());
        let host = Arc::new(RecordingHost::new(Arc::clone(&log)));
        let provider = Arc::new(RecordingProvider::new(Arc::clone(&log), CODE_RESPONSE));

        assistant(Arc::clone(&host), provider, vec![Capability::Comment])
            .run(&opened_event())
            .await
            .unwrap();

        // Exactly one harvest (one root listing), one query, one comment post.
        assert_eq!(log.count("list_dir"), 1);
        assert_eq!(log.count("query"), 1);
        assert_eq!(log.count("create_comment"), 1);
        let calls = log.calls();
        let pos = |name: &str| calls.iter().position(|c| c == name).unwrap();
        assert!(pos("list_dir") < pos("query"));
        assert!(pos("query") < pos("create_comment"));

        let comments = host.comments.lock().unwrap();
        assert!(comments[0].contains("Fix the loop."));
        assert!(comments[0].contains("Issuewise"));
    }

    #[tokio::test]
    async fn test_trailing_mode_requests_trailing_shape_and_posts_prose_answer() {
        let log = Arc::new(CallLog::default());
        let host = Arc::new(RecordingHost::new(Arc::clone(&log)));
        let provider = Arc::new(RecordingProvider::new(
            Arc::clone(&log),
            "Check the retry loop.\n{\"confidence\":0.8,\"relevant_files\":[\"main.rs\"]}",
        ));

        Assistant::new(
            Arc::clone(&host) as Arc<dyn crate::github::RepoHost>,
            Arc::clone(&provider) as Arc<dyn AiProvider>,
            Harvester::default(),
            ParseMode::TrailingMetadata,
            vec![Capability::Comment],
        )
        .run(&opened_event())
        .await
        .unwrap();

        let shapes = provider.seen_shapes.lock().unwrap().clone();
        assert_eq!(shapes, vec![ResponseShape::TextWithTrailingJson]);

        let comments = host.comments.lock().unwrap();
        assert!(comments[0].contains("Check the retry loop."));
        assert!(!comments[0].contains("relevant_files"));
    }

    #[tokio::test]
    async fn test_label_capability_applies_only_confident_labels() {
        let log = Arc::new(CallLog::default());
        let mut host = RecordingHost::new(Arc::clone(&log));
        host.labels = ["bug", "question", "enhancement"]
            .iter()
            .map(|name| RepoLabel {
                name: (*name).to_string(),
                description: String::new(),
            })
            .collect();
        let host = Arc::new(host);
        let provider = Arc::new(RecordingProvider::new(
            Arc::clone(&log),
            r#"{"suggested_labels": {"bug": 0.9, "question": 0.65, "enhancement": 0.7},
                "explanation": "Crash with a requested improvement."}"#,
        ));

        assistant(Arc::clone(&host), provider, vec![Capability::Label])
            .run(&opened_event())
            .await
            .unwrap();

        // Threshold is inclusive: 0.7 passes, 0.65 does not.
        let applied = host.applied_labels.lock().unwrap().clone();
        assert_eq!(applied, vec!["bug", "enhancement"]);

        let comments = host.comments.lock().unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("`bug`"));
        assert!(comments[0].contains("Crash with a requested improvement."));
    }

    #[tokio::test]
    async fn test_label_capability_skips_when_repository_has_no_labels() {
        let log = Arc::new(CallLog::default());
        let host = Arc::new(RecordingHost::new(Arc::clone(&log)));
        let provider = Arc::new(RecordingProvider::new(Arc::clone(&log), "{}"));

        assistant(Arc::clone(&host), provider, vec![Capability::Label])
            .run(&opened_event())
            .await
            .unwrap();

        assert_eq!(log.count("list_labels"), 1);
        assert_eq!(log.count("query"), 0);
        assert_eq!(log.count("add_labels"), 0);
    }

    #[tokio::test]
    async fn test_label_capability_skips_when_nothing_meets_threshold() {
        let log = Arc::new(CallLog::default());
        let mut host = RecordingHost::new(Arc::clone(&log));
        host.labels = vec![RepoLabel {
            name: "bug".to_string(),
            description: String::new(),
        }];
        let host = Arc::new(host);
        let provider = Arc::new(RecordingProvider::new(
            Arc::clone(&log),
            r#"{"suggested_labels": {"bug": 0.4}, "explanation": "Unsure."}"#,
        ));

        assistant(Arc::clone(&host), provider, vec![Capability::Label])
            .run(&opened_event())
            .await
            .unwrap();

        assert_eq!(log.count("add_labels"), 0);
        assert_eq!(log.count("create_comment"), 0);
    }

    #[tokio::test]
    async fn test_failed_capability_does_not_block_sibling() {
        let log = Arc::new(CallLog::default());
        let mut host = RecordingHost::new(Arc::clone(&log));
        host.fail_harvest = true;
        host.labels = vec![RepoLabel {
            name: "bug".to_string(),
            description: String::new(),
        }];
        let host = Arc::new(host);
        let provider = Arc::new(RecordingProvider::new(
            Arc::clone(&log),
            r#"{"suggested_labels": {"bug": 0.9}, "explanation": "Crash."}"#,
        ));

        // Comment capability fails at harvest; label capability still runs.
        assistant(Arc::clone(&host), provider, vec![Capability::Comment, Capability::Label])
            .run(&opened_event())
            .await
            .unwrap();

        assert_eq!(log.count("list_labels"), 1);
        assert_eq!(log.count("add_labels"), 1);
    }
}
