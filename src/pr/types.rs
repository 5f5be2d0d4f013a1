use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Canonical (owner, repo, number) triple identifying one pull request.
/// Extracted by parse_pr_identifier() in pr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// Snapshot of pull request metadata as returned by the GitHub REST API.
/// Only the fields the context formatter renders are kept; everything else
/// in the response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title
    pub title: String,
    /// Free-text description; GitHub sends null when empty
    pub body: Option<String>,
    /// Lifecycle state ("open" / "closed")
    pub state: String,
    /// Author account
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Canonical web URL
    pub html_url: String,
    /// Source branch
    pub head: BranchRef,
    /// Target branch
    pub base: BranchRef,
    pub merged: bool,
    /// Unknown while GitHub is still computing mergeability
    #[serde(default)]
    #[allow(dead_code)] // Not part of the rendered context
    pub mergeable: Mergeable,
    /// Total lines added
    pub additions: u64,
    /// Total lines deleted
    pub deletions: u64,
    /// Total files changed
    pub changed_files: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// One end of a pull request: branch name plus commit.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
    #[allow(dead_code)]
    pub sha: String,
}

/// Tri-state mergeability reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum Mergeable {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Mergeable::Yes,
            Some(false) => Mergeable::No,
            None => Mergeable::Unknown,
        }
    }
}

/// GitHub-shaped JSON for a well-formed PR, shared by client and server tests.
#[cfg(test)]
pub(crate) fn sample_pr_json(number: u64) -> serde_json::Value {
    serde_json::json!({
        "id": 1000 + number,
        "number": number,
        "title": "Add widget caching",
        "body": "Caches widgets between requests.",
        "state": "open",
        "user": {"login": "octocat"},
        "created_at": "2024-01-02T03:04:05Z",
        "updated_at": "2024-01-03T04:05:06Z",
        "html_url": format!("https://github.com/octo/widgets/pull/{number}"),
        "head": {"ref": "feature/cache", "sha": "abc123"},
        "base": {"ref": "main", "sha": "def456"},
        "merged": false,
        "mergeable": true,
        "additions": 120,
        "deletions": 8,
        "changed_files": 4
    })
}
