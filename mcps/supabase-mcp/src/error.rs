//! Error types for platform operations and tool dispatch
//!
//! [`PlatformError`] covers everything the backends can fail at. [`ToolError`]
//! adds the registry-level failures. Both end up as failure envelopes; neither
//! ever crosses the MCP boundary as a protocol error.

use thiserror::Error;

/// Errors raised by the platform adapter and its backends
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Missing or malformed credentials/configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A required input was missing or malformed
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream API answered with a failure, or could not be reached
    #[error("{context}: {message}")]
    Upstream {
        /// What the operation was trying to do, e.g. "Failed to fetch project"
        context: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Backend-provided detail, or the transport error text
        message: String,
    },

    /// The upstream answered successfully but the expected item was absent
    #[error("{0} not found")]
    NotFound(String),

    /// The platform does not implement this capability
    #[error("operation '{0}' is not supported by this platform")]
    Unsupported(&'static str),

    /// The upstream body did not have the expected shape
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PlatformError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Self::Validation(format!("{} is required", field))
    }

    pub(crate) fn upstream(context: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            context: context.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Result type alias for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors raised while dispatching a tool call
#[derive(Error, Debug)]
pub enum ToolError {
    /// No active tool has this name
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not satisfy the tool's input schema
    #[error("invalid arguments for {tool}: {details}")]
    InvalidArguments { tool: String, details: String },

    /// A write-class tool was called while the server is read-only
    #[error("cannot run {0} in read-only mode")]
    ReadOnlyMode(String),

    /// The handler itself failed
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_context() {
        let err = PlatformError::upstream("Failed to fetch project", Some(404), "Project not found");
        assert_eq!(err.to_string(), "Failed to fetch project: Project not found");
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let err = PlatformError::missing_field("vpc_id");
        assert_eq!(err.to_string(), "validation error: vpc_id is required");
    }

    #[test]
    fn test_tool_error_wraps_platform_error_transparently() {
        let err: ToolError = PlatformError::NotFound("anon key".into()).into();
        assert_eq!(err.to_string(), "anon key not found");
    }
}
