// SPDX-License-Identifier: Apache-2.0

//! Repository content harvesting.
//!
//! Recursively walks a repository tree depth-first, applies the
//! [`FileFilter`], and fetches decoded content for each accepted file. The
//! harvest is strict all-or-nothing: a fetch or decode failure for any
//! single file aborts the whole harvest with an error naming the failing
//! path. Output order is directory-listing order; nothing is cached across
//! invocations.

pub mod filter;

pub use filter::FileFilter;

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::{debug, instrument};

use crate::github::{EntryKind, RepoHost};

/// Coarse classification of a harvested file, derived from its extension.
/// Informational only; it never affects filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Program source code.
    Source,
    /// Prose documentation.
    Documentation,
    /// Build or deployment configuration.
    Configuration,
    /// Everything else.
    Other,
}

impl FileKind {
    fn from_path(path: &str) -> Self {
        let base = path.rsplit('/').next().unwrap_or(path);
        if matches!(base, "Dockerfile" | "Makefile") {
            return FileKind::Configuration;
        }
        match base.rsplit('.').next() {
            Some("go" | "js" | "ts" | "py" | "java" | "rb" | "php" | "rs" | "sh") => {
                FileKind::Source
            }
            Some("md" | "txt") => FileKind::Documentation,
            Some("yaml" | "yml" | "json") => FileKind::Configuration,
            _ => FileKind::Other,
        }
    }
}

/// A file collected during one harvest, alive for one AI query.
#[derive(Debug, Clone)]
pub struct HarvestedFile {
    /// Repository-relative, slash-separated path.
    pub path: String,
    /// Decoded text content.
    pub content: String,
    /// Derived classification.
    pub kind: FileKind,
}

/// Walks a repository and collects filtered file contents.
#[derive(Debug, Clone, Default)]
pub struct Harvester {
    filter: FileFilter,
}

impl Harvester {
    /// Creates a harvester with an explicit filter configuration.
    #[must_use]
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Harvests all accepted files starting from the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory listing or single-file fetch
    /// fails; the error names the failing path and no partial results are
    /// returned.
    #[instrument(skip(self, host), fields(owner = %owner, repo = %repo))]
    pub async fn harvest(
        &self,
        host: &dyn RepoHost,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<HarvestedFile>> {
        let mut files = Vec::new();
        self.walk(host, owner, repo, String::new(), &mut files)
            .await
            .context("failed to traverse repository")?;

        debug!(files = files.len(), "Harvest complete");
        Ok(files)
    }

    // Recursion over async requires boxing the future; the walk itself is
    // plain depth-first in listing order.
    fn walk<'a>(
        &'a self,
        host: &'a dyn RepoHost,
        owner: &'a str,
        repo: &'a str,
        path: String,
        out: &'a mut Vec<HarvestedFile>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let entries = host.list_dir(owner, repo, &path).await?;

            for entry in entries {
                match entry.kind {
                    EntryKind::File => {
                        if self.filter.accepts(&entry.path) {
                            let content = host
                                .file_content(owner, repo, &entry.path)
                                .await
                                .with_context(|| {
                                    format!("failed to get file content for {}", entry.path)
                                })?;
                            out.push(HarvestedFile {
                                kind: FileKind::from_path(&entry.path),
                                path: entry.path,
                                content,
                            });
                        }
                    }
                    EntryKind::Dir => {
                        let dir = entry.path.clone();
                        self.walk(host, owner, repo, entry.path, out)
                            .await
                            .with_context(|| format!("failed to traverse directory {dir}"))?;
                    }
                    EntryKind::Other => {}
                }
            }

            Ok(())
        })
    }
}
