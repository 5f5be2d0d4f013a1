use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use tracing::{debug, instrument};

use super::types::{PrRef, PullRequest};
use super::PrError;
use crate::config::Config;

/// Read-only access to a pull request on some source host.
/// Implementations must be Send + Sync so the server can share one across calls.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch the structured metadata for `pr`.
    async fn fetch_metadata(&self, pr: &PrRef) -> Result<PullRequest, PrError>;

    /// Fetch the unified diff for `pr`, verbatim.
    async fn fetch_diff(&self, pr: &PrRef) -> Result<String, PrError>;
}

/// GitHub REST client. Holds no per-request state; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    diff_url: String,
    user_agent: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url().to_string(),
            diff_url: config.diff_url().to_string(),
            user_agent: config.user_agent().to_string(),
            token: config.github_token().map(str::to_string),
        }
    }

    fn metadata_url(&self, pr: &PrRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, pr.owner, pr.repo, pr.number
        )
    }

    fn diff_url(&self, pr: &PrRef) -> String {
        format!(
            "{}/raw/{}/{}/pull/{}.diff",
            self.diff_url, pr.owner, pr.repo, pr.number
        )
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    #[instrument(skip(self, pr), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    async fn fetch_metadata(&self, pr: &PrRef) -> Result<PullRequest, PrError> {
        let mut request = self
            .http
            .get(self.metadata_url(pr))
            .header(ACCEPT, "application/vnd.github.v3+json")
            .header(USER_AGENT, &self.user_agent);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        debug!(authenticated = self.token.is_some(), "fetching PR metadata from GitHub API");
        let response = request.send().await?;
        if let Some((status, reason)) = failure_status(&response) {
            return Err(PrError::MetadataFetch { status, reason });
        }

        let body = response.text().await?;
        let metadata: PullRequest = serde_json::from_str(&body)?;
        debug!(title = %metadata.title, changed_files = metadata.changed_files, "received PR metadata");
        Ok(metadata)
    }

    #[instrument(skip(self, pr), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    async fn fetch_diff(&self, pr: &PrRef) -> Result<String, PrError> {
        debug!("fetching PR diff");
        let response = self.http.get(self.diff_url(pr)).send().await?;
        if let Some((status, reason)) = failure_status(&response) {
            return Err(PrError::DiffFetch { status, reason });
        }

        let diff_text = response.text().await?;
        debug!(diff_bytes = diff_text.len(), "received PR diff");
        Ok(diff_text)
    }
}

/// Status code and reason phrase for a non-success response.
fn failure_status(response: &Response) -> Option<(u16, String)> {
    let status: StatusCode = response.status();
    if status.is_success() {
        return None;
    }
    let reason = status.canonical_reason().unwrap_or_default().to_string();
    Some((status.as_u16(), reason))
}
