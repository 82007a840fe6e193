// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Defines the [`RepoHost`] seam the harvester and orchestrator work
//! against, plus its octocrab-backed production implementation. Calls on
//! this boundary are not retried; a failure fails the current capability.

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Kind of a directory entry as reported by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file whose content can be fetched.
    File,
    /// A directory to recurse into.
    Dir,
    /// Anything else (submodule, symlink, malformed entry); skipped.
    Other,
}

/// A single entry of a repository directory listing.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Final path segment.
    pub name: String,
    /// Repository-relative, slash-separated path.
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
}

/// A repository label with its description.
#[derive(Debug, Clone)]
pub struct RepoLabel {
    /// Label name.
    pub name: String,
    /// Label description; empty when the repository has none.
    pub description: String,
}

/// Source-control operations the pipeline needs.
///
/// Production uses [`GitHubClient`]; tests substitute synthetic trees and
/// call recorders.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Lists the entries of a directory (`path` empty means repository root),
    /// in the order the backing store returns them.
    async fn list_dir(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<TreeEntry>>;

    /// Fetches and decodes the text content of a single file.
    async fn file_content(&self, owner: &str, repo: &str, path: &str) -> Result<String>;

    /// Creates a comment on an issue.
    async fn create_comment(&self, owner: &str, repo: &str, number: u64, body: &str)
    -> Result<()>;

    /// Adds labels to an issue.
    async fn add_labels(&self, owner: &str, repo: &str, number: u64, labels: &[String])
    -> Result<()>;

    /// Lists all repository labels, following pagination until exhausted.
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<RepoLabel>>;
}

/// Octocrab-backed [`RepoHost`] implementation.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

/// Page size used when listing repository labels.
const LABEL_PAGE_SIZE: u8 = 100;

impl GitHubClient {
    /// Builds an authenticated client from a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying octocrab client cannot be built.
    pub fn new(token: &SecretString) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.expose_secret().to_string())
            .build()
            .context("failed to build GitHub client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn list_dir(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<TreeEntry>> {
        let repos = self.client.repos(owner, repo);
        let mut request = repos.get_content();
        if !path.is_empty() {
            request = request.path(path);
        }
        let contents = request
            .send()
            .await
            .with_context(|| format!("failed to list contents of '{path}' in {owner}/{repo}"))?;

        // Entries the contents API reports without a usable type map to
        // Other and are skipped by the caller rather than failing the walk.
        let entries = contents
            .items
            .into_iter()
            .map(|item| {
                let kind = match item.r#type.as_str() {
                    "file" => EntryKind::File,
                    "dir" => EntryKind::Dir,
                    _ => EntryKind::Other,
                };
                TreeEntry {
                    name: item.name,
                    path: item.path,
                    kind,
                }
            })
            .collect();

        Ok(entries)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path))]
    async fn file_content(&self, owner: &str, repo: &str, path: &str) -> Result<String> {
        let contents = self
            .client
            .repos(owner, repo)
            .get_content()
            .path(path)
            .send()
            .await
            .with_context(|| format!("failed to get file contents for {path}"))?;

        let item = contents
            .items
            .into_iter()
            .next()
            .with_context(|| format!("no content found for file: {path}"))?;

        item.decoded_content()
            .with_context(|| format!("failed to decode content of {path}"))
    }

    #[instrument(skip(self, body), fields(owner = %owner, repo = %repo, number = number))]
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<()> {
        let comment = self
            .client
            .issues(owner, repo)
            .create_comment(number, body)
            .await
            .with_context(|| format!("failed to post comment to issue #{number}"))?;

        debug!(url = %comment.html_url, "Comment posted");
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<()> {
        if labels.is_empty() {
            debug!("No labels to apply");
            return Ok(());
        }

        let route = format!("/repos/{owner}/{repo}/issues/{number}/labels");
        let payload = serde_json::json!({ "labels": labels });

        self.client
            .post::<_, serde_json::Value>(route, Some(&payload))
            .await
            .with_context(|| {
                format!(
                    "failed to apply labels to issue #{number} in {owner}/{repo}. \
                     Check that the token has write access to the repository."
                )
            })?;

        debug!(labels = ?labels, "Labels applied");
        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<RepoLabel>> {
        let mut labels = Vec::new();
        let mut page: u32 = 1;

        loop {
            let current = self
                .client
                .issues(owner, repo)
                .list_labels_for_repo()
                .per_page(LABEL_PAGE_SIZE)
                .page(page)
                .send()
                .await
                .with_context(|| format!("failed to list labels for {owner}/{repo}"))?;

            let has_next = current.next.is_some();
            labels.extend(current.items.into_iter().map(|label| RepoLabel {
                name: label.name,
                description: label.description.unwrap_or_default(),
            }));

            if !has_next {
                break;
            }
            page += 1;
        }

        debug!(count = labels.len(), "Fetched repository labels");
        Ok(labels)
    }
}
