//! Supabase MCP Library
//!
//! MCP tools for managing Supabase projects. Two backends sit behind one
//! platform interface: the Supabase Management API and Aliyun's RDS
//! "Supabase" instances. Tools are grouped into feature groups chosen at
//! startup, and a read-only mode rejects every tool that writes.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use supabase_mcp::{EmbeddableMcp, ServerConfig, SupabaseMcpServer};
//!
//! let server = SupabaseMcpServer::from_config(config)?;
//! let result = server.call_tool("describe_regions", serde_json::json!({})).await;
//! ```
//!
//! # Usage as Binary
//!
//! ```json
//! { "mcpServers": { "supabase": { "command": "./supabase-mcp", "args": ["--features", "aliyun,database"] } } }
//! ```

pub mod config;
pub mod error;
pub mod platform;
pub mod query;
pub mod server;
pub mod tools;

pub use config::{Args, FileConfig, PlatformOptions, QueryOptions, ServerConfig};
pub use error::{PlatformError, PlatformResult, ToolError};
pub use platform::{ApiPlatform, ClientIdentity, SupabasePlatform};
pub use server::{SessionState, SupabaseMcpServer};
pub use tools::FeatureGroup;

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::EmbeddableMcp;
