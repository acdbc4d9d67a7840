//! Result helpers for MCP tool responses
//!
//! Every tool answer is one of two envelopes: a success carrying a single
//! text block, or a failure (`is_error = true`) carrying a single
//! human-readable message. Failures are results, not protocol errors, so the
//! calling agent can read and react to them.

use rmcp::model::{CallToolResult, Content, RawContent};
use serde::Serialize;

use crate::error::{internal_error, McpResult};

/// Create a successful JSON response from any serializable data
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::json_success;
///
/// #[derive(Serialize)]
/// struct Region { region_id: String }
///
/// let result = json_success(&vec![Region { region_id: "cn-hangzhou".into() }])?;
/// ```
pub fn json_success<T: Serialize>(data: &T) -> McpResult<CallToolResult> {
    let json = serde_json::to_string_pretty(data).map_err(|e| internal_error(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Create a failure envelope
///
/// The message is prefixed with `Error: ` so it reads unambiguously when an
/// agent echoes it back to a user.
pub fn error_result(message: impl AsRef<str>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", message.as_ref()))])
}

/// Return the first text block of a result, if there is one
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|c| match &c.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
