pub mod client;
pub mod types;

pub use client::{GitHubClient, PullRequestSource};
pub use types::{PrRef, PullRequest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Invalid PR identifier format: {0}. Use formats like 'owner/repo/pull/123' or 'owner/repo#123'")]
    UnrecognizedIdentifier(String),

    #[error("GitHub API request failed: {status} {reason}")]
    MetadataFetch { status: u16, reason: String },

    #[error("Failed to fetch PR diff: {status} {reason}")]
    DiffFetch { status: u16, reason: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Parse a human-typed PR identifier into its component parts.
///
/// Accepted forms, first match wins:
///   https://github.com/{owner}/{repo}/pull/{number}
///   {owner}/{repo}/pull/{number}   (or `pulls`)
///   {owner}/{repo}#{number}
///
/// Returns None for anything else; no trimming or case folding happens.
pub fn parse_pr_identifier(identifier: &str) -> Option<PrRef> {
    let cleaned = strip_github_host(identifier);
    parse_pull_path(cleaned).or_else(|| parse_shorthand(cleaned))
}

fn strip_github_host(identifier: &str) -> &str {
    ["https://github.com/", "http://github.com/"]
        .iter()
        .find_map(|prefix| identifier.strip_prefix(prefix))
        .unwrap_or(identifier)
}

/// `owner/repo/pull/N` or `owner/repo/pulls/N`
fn parse_pull_path(path: &str) -> Option<PrRef> {
    let segments: Vec<&str> = path.split('/').collect();
    let [owner, repo, kind, number] = segments.as_slice() else {
        return None;
    };

    if owner.is_empty() || repo.is_empty() || !matches!(*kind, "pull" | "pulls") {
        return None;
    }

    Some(PrRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        number: parse_number(number)?,
    })
}

/// `owner/repo#N`. The repo part may contain `/` but never `#`.
fn parse_shorthand(path: &str) -> Option<PrRef> {
    let (owner, rest) = path.split_once('/')?;
    let (repo, number) = rest.split_once('#')?;

    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(PrRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        number: parse_number(number)?,
    })
}

fn parse_number(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
