//! MCP surface: the `get_pr_context` tool and the static `pr://help` resource.
//!
//! Protocol framing, tool dispatch and argument decoding are handled by rmcp;
//! unknown tool names and arguments that don't match [`GetPrContextParams`]
//! are rejected there before any handler here runs.

mod help;

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ListResourcesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::context::format_pr_context;
use crate::pr::{parse_pr_identifier, PrError, PullRequestSource};

pub const SERVER_NAME: &str = "pull-request-context-mcp";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPrContextParams {
    #[schemars(
        description = "PR identifier (e.g., 'facebook/react/pull/12345' or 'facebook/react#12345')"
    )]
    pub identifier: String,
    #[schemars(
        description = "Whether to include the full diff content in the response (default: true)"
    )]
    pub include_diff: Option<bool>,
}

/// MCP server exposing pull request context. Stateless between calls.
#[derive(Clone)]
pub struct PrContextServer {
    source: Arc<dyn PullRequestSource>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PrContextServer {
    pub fn new(source: Arc<dyn PullRequestSource>) -> Self {
        Self {
            source,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Fetch detailed context about a GitHub pull request. Accepts PR identifiers in formats like 'owner/repo/pull/123', 'owner/repo#123', or full GitHub URLs."
    )]
    pub async fn get_pr_context(
        &self,
        Parameters(params): Parameters<GetPrContextParams>,
    ) -> Result<CallToolResult, McpError> {
        let include_diff = params.include_diff.unwrap_or(true);
        let text = self
            .get_pr_context_text(&params.identifier, include_diff)
            .await
            .map_err(to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl PrContextServer {
    /// Resolve, fetch and format. The diff is only requested after the
    /// metadata fetch succeeded, and only when `include_diff` is set.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_pr_context_text(
        &self,
        identifier: &str,
        include_diff: bool,
    ) -> Result<String, PrError> {
        let pr_ref = parse_pr_identifier(identifier)
            .ok_or_else(|| PrError::UnrecognizedIdentifier(identifier.to_string()))?;
        debug!(owner = %pr_ref.owner, repo = %pr_ref.repo, pr = pr_ref.number, "resolved PR identifier");

        let pull_request = self.source.fetch_metadata(&pr_ref).await?;
        let diff = if include_diff {
            Some(self.source.fetch_diff(&pr_ref).await?)
        } else {
            None
        };

        let text = format_pr_context(&pull_request, diff.as_deref());
        debug!(pr = pull_request.number, bytes = text.len(), "built PR context");
        Ok(text)
    }
}

/// User input problems become invalid-params errors; anything that went wrong
/// talking to GitHub is reported under a common prefix.
fn to_mcp_error(err: PrError) -> McpError {
    match err {
        PrError::UnrecognizedIdentifier(_) => McpError::invalid_params(err.to_string(), None),
        other => McpError::internal_error(format!("Failed to fetch PR: {other}"), None),
    }
}

#[tool_handler]
impl ServerHandler for PrContextServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Fetches GitHub pull request context. Call 'get_pr_context' with an identifier such as 'owner/repo#123'; read 'pr://help' for the accepted formats."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(help::list_resources())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        help::read_resource(&request.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pr::types::sample_pr_json;
    use crate::pr::GitHubClient;
    use rmcp::model::ErrorCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(mock: &MockServer) -> PrContextServer {
        let client = GitHubClient::new(&Config::for_base_url(&mock.uri(), None));
        PrContextServer::new(Arc::new(client))
    }

    fn params(identifier: &str, include_diff: Option<bool>) -> Parameters<GetPrContextParams> {
        Parameters(GetPrContextParams {
            identifier: identifier.to_string(),
            include_diff,
        })
    }

    fn result_text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    async fn mount_metadata(mock: &MockServer, number: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/octo/widgets/pulls/{number}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_pr_json(number)))
            .expect(1)
            .mount(mock)
            .await;
    }

    #[test]
    fn test_server_info() {
        let server = PrContextServer::new(Arc::new(GitHubClient::new(&Config::default())));
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.instructions.is_some());
        assert_eq!(info.server_info.name, "pull-request-context-mcp");
    }

    #[test]
    fn test_single_tool_registered() {
        let server = PrContextServer::new(Arc::new(GitHubClient::new(&Config::default())));
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_pr_context");

        let schema = serde_json::Value::Object((*tools[0].input_schema).clone());
        assert_eq!(schema["required"], serde_json::json!(["identifier"]));
        assert!(schema["properties"]["include_diff"].is_object());
    }

    #[test]
    fn test_non_string_identifier_rejected() {
        let args = serde_json::json!({"identifier": 42});
        assert!(serde_json::from_value::<GetPrContextParams>(args).is_err());

        let args = serde_json::json!({"include_diff": false});
        assert!(serde_json::from_value::<GetPrContextParams>(args).is_err());
    }

    #[tokio::test]
    async fn test_context_without_diff_makes_one_call() {
        let mock = MockServer::start().await;
        mount_metadata(&mock, 7).await;
        Mock::given(method("GET"))
            .and(path("/raw/octo/widgets/pull/7.diff"))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff"))
            .expect(0)
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let result = server
            .get_pr_context(params("octo/widgets#7", Some(false)))
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.contains("<title> Add widget caching </title>"));
        assert!(text.contains("<pull_request>7 - open</pull_request>"));
        assert!(text.contains("<author> octocat </author>"));
        assert!(text.contains("<changes> +120 -8 across 4 file(s) </changes>"));
        assert!(!text.contains("<diff>"));
    }

    #[tokio::test]
    async fn test_context_includes_diff_by_default() {
        let mock = MockServer::start().await;
        mount_metadata(&mock, 7).await;
        Mock::given(method("GET"))
            .and(path("/raw/octo/widgets/pull/7.diff"))
            .respond_with(ResponseTemplate::new(200).set_body_string("+let cache = Cache::new();\n"))
            .expect(1)
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let result = server
            .get_pr_context(params("https://github.com/octo/widgets/pull/7", None))
            .await
            .unwrap();

        let text = result_text(&result);
        assert!(text.ends_with("<diff>\n+let cache = Cache::new();\n\n</diff>"));
    }

    #[tokio::test]
    async fn test_metadata_404_skips_diff() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/pulls/999999"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw/octo/widgets/pull/999999.diff"))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff"))
            .expect(0)
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let err = server
            .get_pr_context(params("octo/widgets#999999", None))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.starts_with("Failed to fetch PR: "));
        assert!(err.message.contains("404"));
    }

    #[tokio::test]
    async fn test_diff_failure_reported() {
        let mock = MockServer::start().await;
        mount_metadata(&mock, 7).await;
        Mock::given(method("GET"))
            .and(path("/raw/octo/widgets/pull/7.diff"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let err = server
            .get_pr_context(params("octo/widgets/pull/7", Some(true)))
            .await
            .unwrap_err();

        assert_eq!(
            err.message,
            "Failed to fetch PR: Failed to fetch PR diff: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_unrecognized_identifier_makes_no_calls() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let err = server
            .get_pr_context(params("owner/repo/issues/5", None))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("owner/repo/issues/5"));
        assert!(err.message.contains("owner/repo#123"));
    }

    #[tokio::test]
    async fn test_unrecognized_identifier_kind() {
        let mock = MockServer::start().await;
        let server = server_for(&mock);
        let err = server
            .get_pr_context_text("not-a-pr", true)
            .await
            .unwrap_err();
        assert!(matches!(err, PrError::UnrecognizedIdentifier(ref s) if s == "not-a-pr"));
    }
}
