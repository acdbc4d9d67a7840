//! Registry behavior that does not depend on any backend
//!
//! A recording platform stands in for the real one so that read-only
//! enforcement and argument handling can be checked by counting calls.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mcp_common::first_text;
use supabase_mcp::platform::{
    DescribeRegionsRequest, ExecuteSqlOptions, ProjectRequest, OperationResult, Region,
};
use supabase_mcp::{
    EmbeddableMcp, FeatureGroup, PlatformOptions, PlatformResult, QueryOptions, ServerConfig, SupabaseMcpServer,
    SupabasePlatform,
};

#[derive(Default)]
struct RecordingPlatform {
    deletes: AtomicUsize,
    region_calls: AtomicUsize,
    sql: Mutex<Vec<ExecuteSqlOptions>>,
}

#[async_trait]
impl SupabasePlatform for RecordingPlatform {
    async fn delete_aliyun_project(&self, request: ProjectRequest) -> PlatformResult<OperationResult> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(OperationResult {
            project_id: Some(request.project_id),
            request_id: None,
            order_id: None,
        })
    }

    async fn describe_regions(&self, _request: DescribeRegionsRequest) -> PlatformResult<Vec<Region>> {
        self.region_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn execute_sql(&self, _project_id: &str, options: ExecuteSqlOptions) -> PlatformResult<serde_json::Value> {
        self.sql.lock().unwrap().push(options);
        Ok(json!([]))
    }
}

fn server(features: Vec<FeatureGroup>, read_only: bool) -> (SupabaseMcpServer, Arc<RecordingPlatform>) {
    let config = ServerConfig {
        features,
        read_only,
        project_ref: None,
        platform: PlatformOptions::new(Some("token".to_string()), None),
        query: QueryOptions::default(),
    };
    let platform = Arc::new(RecordingPlatform::default());
    let server = SupabaseMcpServer::with_platform(&config, platform.clone()).unwrap();
    (server, platform)
}

#[tokio::test]
async fn read_only_rejects_write_tools_without_calling_platform() {
    let (server, platform) = server(vec![FeatureGroup::Aliyun], true);

    let result = server
        .call_tool("delete_supabase_project", json!({"project_id": "proj123"}))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(
        first_text(&result),
        Some("Error: cannot run delete_supabase_project in read-only mode")
    );
    assert_eq!(platform.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn read_only_still_lists_and_runs_read_tools() {
    let (server, platform) = server(vec![FeatureGroup::Aliyun], true);

    assert!(server.list_tools().iter().any(|t| t.name == "delete_supabase_project"));

    let result = server.call_tool("describe_regions", json!({})).await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(first_text(&result), Some("[]"));
    assert_eq!(platform.region_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn writes_go_through_when_not_read_only() {
    let (server, platform) = server(vec![FeatureGroup::Aliyun], false);

    let result = server
        .call_tool("delete_supabase_project", json!({"project_id": "proj123"}))
        .await;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(platform.deletes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn project_sql_follows_server_read_only_flag() {
    let (server, platform) = server(vec![FeatureGroup::Database], true);

    let result = server
        .call_tool("execute_project_sql", json!({"project_id": "abc", "query": "select 1"}))
        .await;

    assert_ne!(result.is_error, Some(true));
    let calls = platform.sql.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].read_only);
}

#[tokio::test]
async fn unknown_tool_is_a_failure_envelope() {
    let (server, _) = server(vec![FeatureGroup::Aliyun], false);

    let result = server.call_tool("drop_everything", json!({})).await;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(first_text(&result), Some("Error: unknown tool: drop_everything"));
}

#[tokio::test]
async fn tools_outside_enabled_groups_are_unknown() {
    let (server, _) = server(vec![FeatureGroup::Aliyun], false);

    let result = server.call_tool("list_branches", json!({"project_id": "abc"})).await;
    assert_eq!(first_text(&result), Some("Error: unknown tool: list_branches"));
}

#[tokio::test]
async fn null_arguments_are_treated_as_empty() {
    let (server, platform) = server(vec![FeatureGroup::Aliyun], false);

    let result = server.call_tool("describe_regions", serde_json::Value::Null).await;
    assert_ne!(result.is_error, Some(true));
    assert_eq!(platform.region_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_required_argument_names_the_field() {
    let (server, platform) = server(vec![FeatureGroup::Aliyun], false);

    let result = server.call_tool("delete_supabase_project", json!({})).await;
    let message = first_text(&result).unwrap();

    assert!(message.starts_with("Error: invalid arguments for delete_supabase_project"));
    assert!(message.contains("project_id"));
    assert_eq!(platform.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsupported_operations_surface_as_failures() {
    let (server, _) = server(vec![FeatureGroup::Storage], false);

    let result = server
        .call_tool("list_storage_buckets", json!({"project_id": "abc"}))
        .await;
    assert_eq!(
        first_text(&result),
        Some("Error: operation 'list_storage_buckets' is not supported by this platform")
    );
}
