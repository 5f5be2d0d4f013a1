use rmcp::model::{
    AnnotateAble, ListResourcesResult, RawResource, ReadResourceResult, Resource,
    ResourceContents,
};
use rmcp::ErrorData as McpError;
use serde_json::json;

pub const HELP_URI: &str = "pr://help";

const HELP_MIME_TYPE: &str = "text/plain";

pub const HELP_TEXT: &str = "Pull Request Context MCP Server

This server provides tools to fetch GitHub pull request information.

Usage:
1. Use the 'get_pr_context' tool with a PR identifier
2. Supported formats:
   - owner/repo/pull/123
   - owner/repo#123
   - https://github.com/owner/repo/pull/123

Example: get_pr_context with identifier \"facebook/react/pull/12345\"

Environment Variables:
- GITHUB_TOKEN: Optional GitHub personal access token for higher rate limits
";

fn help_resource() -> Resource {
    let mut raw = RawResource::new(HELP_URI, "Pull Request Help");
    raw.description = Some("Information on how to use this MCP server".to_string());
    raw.mime_type = Some(HELP_MIME_TYPE.to_string());
    raw.no_annotation()
}

pub(super) fn list_resources() -> ListResourcesResult {
    ListResourcesResult {
        resources: vec![help_resource()],
        next_cursor: None,
    }
}

pub(super) fn read_resource(uri: &str) -> Result<ReadResourceResult, McpError> {
    if uri != HELP_URI {
        return Err(McpError::resource_not_found(
            format!("Unknown resource: {uri}"),
            Some(json!({ "uri": uri })),
        ));
    }

    let mut contents = ResourceContents::text(HELP_TEXT, HELP_URI);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some(HELP_MIME_TYPE.to_string());
    }
    Ok(ReadResourceResult {
        contents: vec![contents],
    })
}
