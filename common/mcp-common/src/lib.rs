//! MCP Common - Shared utilities for MCP servers
//!
//! This crate provides common functionality used across the MCP servers in
//! this workspace:
//!
//! - **Initialization**: [`init_tracing`] and [`serve_stdio`] for standardized startup
//! - **Results**: success and failure envelopes for `CallToolResult`
//! - **Errors**: small constructors for MCP protocol errors
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{error_result, json_success};
//!
//! async fn my_tool(&self) -> CallToolResult {
//!     match fetch_data().await {
//!         Ok(data) => json_success(&data).unwrap_or_else(|e| error_result(e.message)),
//!         Err(e) => error_result(e.to_string()),
//!     }
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::EmbeddableMcp;
pub use error::{internal_error, McpResult};
pub use init::{init_tracing, serve_stdio};
pub use result::{error_result, first_text, json_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
