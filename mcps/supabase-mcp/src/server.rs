//! MCP server exposing the assembled Supabase tool set
//!
//! Unlike the router-based servers in this workspace, the tool list here is
//! decided at startup (feature groups, project scoping), so `list_tools` and
//! `call_tool` are implemented by hand on top of [`ToolRegistry`].

use mcp_common::{error_result, EmbeddableMcp};
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, InitializeRequestParam, InitializeResult, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::PlatformResult;
use crate::platform::{build_http_client, ApiPlatform, ClientIdentity, SupabasePlatform};
use crate::query::PgQueryClient;
use crate::tools::{ToolContext, ToolRegistry};

const INSTRUCTIONS: &str = "Supabase MCP Server - manages Supabase projects through the \
     Supabase Management API and Aliyun RDS Supabase instances. Tools are grouped by feature; \
     write tools are rejected when the server runs in read-only mode.";

/// Session lifecycle as seen by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready(ClientIdentity),
}

pub struct SupabaseMcpServer {
    registry: Arc<ToolRegistry>,
    platform: Arc<dyn SupabasePlatform>,
    session: OnceLock<ClientIdentity>,
}

impl SupabaseMcpServer {
    /// Build the production server: one HTTP client shared by every backend
    pub fn from_config(config: ServerConfig) -> PlatformResult<Self> {
        let http = build_http_client(&config.platform)?;
        let query = PgQueryClient::new(http.clone(), config.query.clone());
        let platform: Arc<dyn SupabasePlatform> = Arc::new(ApiPlatform::new(http, config.platform.clone()));

        Self::assemble(&config, platform, query)
    }

    /// Build a server around a caller-supplied platform
    pub fn with_platform(config: &ServerConfig, platform: Arc<dyn SupabasePlatform>) -> PlatformResult<Self> {
        let http = build_http_client(&config.platform)?;
        let query = PgQueryClient::new(http, config.query.clone());

        Self::assemble(config, platform, query)
    }

    fn assemble(
        config: &ServerConfig,
        platform: Arc<dyn SupabasePlatform>,
        query: PgQueryClient,
    ) -> PlatformResult<Self> {
        let context = ToolContext {
            platform: Arc::clone(&platform),
            query: Arc::new(query),
            read_only: config.read_only,
        };
        let registry = ToolRegistry::assemble(
            &config.features,
            config.read_only,
            config.project_ref.clone(),
            context,
        )?;

        Ok(Self {
            registry: Arc::new(registry),
            platform,
            session: OnceLock::new(),
        })
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn session_state(&self) -> SessionState {
        match self.session.get() {
            Some(identity) => SessionState::Ready(identity.clone()),
            None => SessionState::Uninitialized,
        }
    }

    /// Record the client identity and initialize the platform
    ///
    /// Only the first call has any effect; returns whether it was this one.
    pub fn initialize_session(&self, identity: ClientIdentity) -> bool {
        match self.session.set(identity) {
            Ok(()) => {
                if let Some(identity) = self.session.get() {
                    info!(client = %identity.name, version = %identity.version, "session initialized");
                    self.platform.init(identity);
                }
                true
            }
            Err(identity) => {
                warn!(client = %identity.name, "session already initialized, ignoring");
                false
            }
        }
    }

    /// Run a tool, giving up with a failure envelope once `ct` fires
    pub async fn call_tool_until_cancelled(
        &self,
        name: &str,
        arguments: Value,
        ct: &CancellationToken,
    ) -> CallToolResult {
        tokio::select! {
            result = self.registry.call_tool(name, arguments) => result,
            _ = ct.cancelled() => {
                warn!(tool = %name, "tool call cancelled by client");
                error_result(format!("{} was cancelled", name))
            }
        }
    }
}

impl ServerHandler for SupabaseMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        let identity = ClientIdentity {
            name: request.client_info.name.clone(),
            version: request.client_info.version.clone(),
        };
        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        self.initialize_session(identity);
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let CallToolRequestParam { name, arguments, .. } = request;
        let arguments = Value::Object(arguments.unwrap_or_default());

        Ok(self.call_tool_until_cancelled(&name, arguments, &context.ct).await)
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait::async_trait]
impl EmbeddableMcp for SupabaseMcpServer {
    fn server_name(&self) -> &str {
        "supabase"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    async fn call_tool(&self, name: &str, params: Value) -> CallToolResult {
        self.registry.call_tool(name, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlatformOptions, QueryOptions};
    use crate::tools::FeatureGroup;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlatform {
        inits: Mutex<Vec<ClientIdentity>>,
    }

    #[async_trait::async_trait]
    impl SupabasePlatform for RecordingPlatform {
        fn init(&self, identity: &ClientIdentity) {
            self.inits.lock().unwrap().push(identity.clone());
        }
    }

    fn config(features: Vec<FeatureGroup>) -> ServerConfig {
        ServerConfig {
            features,
            read_only: false,
            project_ref: None,
            platform: PlatformOptions::new(Some("token".into()), None),
            query: QueryOptions::default(),
        }
    }

    #[test]
    fn test_session_initializes_once() {
        let platform = Arc::new(RecordingPlatform::default());
        let server = SupabaseMcpServer::with_platform(&config(vec![FeatureGroup::Aliyun]), platform.clone()).unwrap();
        assert_eq!(server.session_state(), SessionState::Uninitialized);

        let first = ClientIdentity {
            name: "cursor".into(),
            version: "0.42".into(),
        };
        assert!(server.initialize_session(first.clone()));
        assert!(!server.initialize_session(ClientIdentity {
            name: "other".into(),
            version: "1".into(),
        }));

        assert_eq!(server.session_state(), SessionState::Ready(first.clone()));
        assert_eq!(*platform.inits.lock().unwrap(), vec![first]);
    }

    #[test]
    fn test_embeddable_name_and_tools() {
        let server =
            SupabaseMcpServer::with_platform(&config(vec![FeatureGroup::Storage]), Arc::new(RecordingPlatform::default()))
                .unwrap();
        assert_eq!(server.server_name(), "supabase");

        let names: Vec<String> = EmbeddableMcp::list_tools(&server)
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["list_storage_buckets", "get_storage_config", "update_storage_config"]
        );
    }

    struct StalledPlatform;

    #[async_trait::async_trait]
    impl SupabasePlatform for StalledPlatform {
        async fn describe_regions(
            &self,
            _request: crate::platform::DescribeRegionsRequest,
        ) -> PlatformResult<Vec<crate::platform::Region>> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancelled_call_returns_failure() {
        let server =
            SupabaseMcpServer::with_platform(&config(vec![FeatureGroup::Aliyun]), Arc::new(StalledPlatform)).unwrap();
        let ct = CancellationToken::new();
        ct.cancel();

        let result = server
            .call_tool_until_cancelled("describe_regions", serde_json::json!({}), &ct)
            .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            mcp_common::first_text(&result),
            Some("Error: describe_regions was cancelled")
        );
    }

    #[tokio::test]
    async fn test_uncancelled_call_completes() {
        let server = SupabaseMcpServer::with_platform(
            &config(vec![FeatureGroup::Aliyun]),
            Arc::new(RecordingPlatform::default()),
        )
        .unwrap();

        let result = server
            .call_tool_until_cancelled("drop_everything", serde_json::json!({}), &CancellationToken::new())
            .await;
        assert_eq!(mcp_common::first_text(&result), Some("Error: unknown tool: drop_everything"));
    }

    #[test]
    fn test_server_info_enables_tools() {
        let server =
            SupabaseMcpServer::with_platform(&config(vec![]), Arc::new(RecordingPlatform::default())).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
