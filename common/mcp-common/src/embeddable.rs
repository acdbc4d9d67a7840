//! Embeddable MCP trait for in-process execution
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without a
//! stdio transport in between. Hosts see the same tool list and the same
//! result envelopes a remote client would.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use supabase_mcp::{SupabaseMcpServer, ServerConfig};
//!
//! let server = SupabaseMcpServer::from_config(config)?;
//!
//! let tools = server.list_tools();
//! println!("Available: {:?}", tools.iter().map(|t| &t.name).collect::<Vec<_>>());
//!
//! let result = server.call_tool("describe_regions", serde_json::json!({})).await;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Trait for MCP servers that can be executed in-process
///
/// Implementations must be `Send + Sync`; hosts may issue concurrent calls
/// from multiple tasks.
///
/// `call_tool` has no error channel on purpose. Unknown tools, bad
/// arguments and backend failures all come back as failure envelopes
/// (`is_error = Some(true)`), exactly as they would over the wire.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Returns the server name for identification
    ///
    /// This should match the server name used in MCP configuration files.
    fn server_name(&self) -> &str;

    /// Returns the active tools, in registration order
    fn list_tools(&self) -> Vec<Tool>;

    /// Executes a tool by name with a JSON object of arguments
    async fn call_tool(&self, name: &str, params: Value) -> CallToolResult;

    /// Returns an optional description of the server
    fn server_description(&self) -> Option<&str> {
        None
    }
}
