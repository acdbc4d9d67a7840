//! Error handling utilities for MCP servers
//!
//! Protocol-level errors are reserved for transport problems. Anything a
//! tool can fail at should be reported with [`crate::error_result`] instead.

use rmcp::ErrorData as McpError;

/// Type alias for results that may fail at the MCP protocol level
pub type McpResult<T> = Result<T, McpError>;

/// Create an internal error with a message
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::internal_error;
///
/// return Err(internal_error("tool registry is not available"));
/// ```
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}
