//! Management API tools against a mock `api.supabase.com`

use serde_json::{json, Value};
use supabase_mcp::{EmbeddableMcp, FeatureGroup, PlatformOptions, QueryOptions, ServerConfig, SupabaseMcpServer};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mcp_common::first_text;

const TOKEN: &str = "sbp_test_token";

fn config(mock: &MockServer, features: Vec<FeatureGroup>, project_ref: Option<&str>) -> ServerConfig {
    ServerConfig {
        features,
        read_only: false,
        project_ref: project_ref.map(str::to_string),
        platform: PlatformOptions::new(Some(TOKEN.to_string()), Some(mock.uri())),
        query: QueryOptions::default(),
    }
}

fn text(result: &rmcp::model::CallToolResult) -> &str {
    first_text(result).unwrap()
}

#[tokio::test]
async fn get_project_sends_bearer_token() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/abcdefgh"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abcdefgh",
            "name": "demo",
            "organization_id": "org-1",
            "region": "us-east-1",
            "status": "ACTIVE_HEALTHY"
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Account], None)).unwrap();
    let result = server.call_tool("get_project", json!({"project_id": "abcdefgh"})).await;

    assert_ne!(result.is_error, Some(true), "{}", text(&result));
    let project: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(project["status"], "ACTIVE_HEALTHY");
}

#[tokio::test]
async fn upstream_failure_is_prefixed_with_context() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Project not found"})))
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Account], None)).unwrap();
    let result = server.call_tool("get_project", json!({"project_id": "missing"})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text(&result), "Error: Failed to fetch project: Project not found");
}

#[tokio::test]
async fn execute_project_sql_posts_query() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/abcdefgh/database/query"))
        .and(body_json(json!({"query": "select 1 as one", "read_only": false})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"one": 1}])))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Database], None)).unwrap();
    let result = server
        .call_tool(
            "execute_project_sql",
            json!({"project_id": "abcdefgh", "query": "select 1 as one"}),
        )
        .await;

    assert_eq!(serde_json::from_str::<Value>(text(&result)).unwrap(), json!([{"one": 1}]));
}

#[tokio::test]
async fn project_scope_hides_and_injects_project_id() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/scoped01/database/migrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"version": "20240101000000", "name": "init"}
        ])))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(
        &mock,
        vec![FeatureGroup::Account, FeatureGroup::Database],
        Some("scoped01"),
    ))
    .unwrap();

    let tools = server.list_tools();
    assert!(tools.iter().all(|t| t.name != "list_projects"));
    let list_migrations = tools.iter().find(|t| t.name == "list_migrations").unwrap();
    let properties = list_migrations
        .input_schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    assert!(!properties.contains_key("project_id"));

    let result = server.call_tool("list_migrations", json!({})).await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));
    let migrations: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(migrations[0]["name"], "init");
}

#[tokio::test]
async fn project_scope_overrides_caller_project_id() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/scoped01/database/migrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/other/database/migrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock)
        .await;

    let server =
        SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Database], Some("scoped01"))).unwrap();
    let result = server
        .call_tool("list_migrations", json!({"project_id": "other"}))
        .await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let requests = mock.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v1/projects/scoped01/database/migrations");
}

#[tokio::test]
async fn get_logs_builds_service_query() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/abcdefgh/analytics/endpoints/logs.all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Debugging], None)).unwrap();
    let result = server
        .call_tool("get_logs", json!({"project_id": "abcdefgh", "service": "postgres"}))
        .await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let requests = mock.received_requests().await.unwrap();
    let sql = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "sql")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(sql.contains("postgres_logs"));
    assert!(requests[0].url.query_pairs().any(|(k, _)| k == "iso_timestamp_start"));
}

#[tokio::test]
async fn unknown_log_service_fails_validation() {
    let mock = MockServer::start().await;
    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Debugging], None)).unwrap();

    let result = server
        .call_tool("get_logs", json!({"project_id": "abcdefgh", "service": "kafka"}))
        .await;
    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("invalid arguments for get_logs"));
}

// ============================================================================
// Branching
// ============================================================================

#[tokio::test]
async fn create_branch_defaults_name() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/abcdefgh/branches"))
        .and(body_json(json!({"branch_name": "develop"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "br-1",
            "name": "develop",
            "parent_project_ref": "abcdefgh",
            "is_default": false
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Branching], None)).unwrap();
    let result = server
        .call_tool("create_branch", json!({"project_id": "abcdefgh"}))
        .await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let branch: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(branch["id"], "br-1");
}

#[tokio::test]
async fn reset_branch_sends_migration_version() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/branches/br-1/reset"))
        .and(body_json(json!({"migration_version": "20240101000000"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Branching], None)).unwrap();
    let result = server
        .call_tool(
            "reset_branch",
            json!({"branch_id": "br-1", "migration_version": "20240101000000"}),
        )
        .await;

    assert_eq!(serde_json::from_str::<Value>(text(&result)).unwrap(), json!({"success": true}));
}

#[tokio::test]
async fn delete_branch_failure_keeps_upstream_message() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/branches/br-9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Branch not found"})))
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Branching], None)).unwrap();
    let result = server.call_tool("delete_branch", json!({"branch_id": "br-9"})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text(&result), "Error: Failed to delete branch: Branch not found");
}

// ============================================================================
// Edge Functions
// ============================================================================

const BOUNDARY: &str = "fn-body-boundary";

fn multipart_body() -> String {
    let root = "/tmp/user_fn_abcdefgh_fn-1_3";
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"metadata\"\r\n\r\n{{\"deno2_entrypoint_path\":null}}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{root}/source/index.ts\"\r\n\
         Content-Type: application/typescript\r\n\r\nDeno.serve(() => new Response(\"ok\"))\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{root}/source/deno.json\"\r\n\r\n{{}}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
        root = root
    )
}

#[tokio::test]
async fn get_edge_function_rewrites_paths() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/abcdefgh/functions/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "fn-1",
            "slug": "hello",
            "name": "hello",
            "status": "ACTIVE",
            "version": 3,
            "entrypoint_path": "file:///tmp/user_fn_abcdefgh_fn-1_3/source/index.ts",
            "import_map_path": "file:///tmp/user_fn_abcdefgh_fn-1_3/source/deno.json"
        })))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/abcdefgh/functions/hello/body"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            multipart_body(),
            &format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Functions], None)).unwrap();
    let result = server
        .call_tool(
            "get_edge_function",
            json!({"project_id": "abcdefgh", "function_slug": "hello"}),
        )
        .await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let function: Value = serde_json::from_str(text(&result)).unwrap();
    assert_eq!(function["entrypoint_path"], "source/index.ts");
    assert_eq!(function["import_map_path"], "source/deno.json");
    assert_eq!(function["files"].as_array().unwrap().len(), 2);
    assert_eq!(function["files"][0]["name"], "source/index.ts");
    assert_eq!(function["files"][0]["content"], "Deno.serve(() => new Response(\"ok\"))");
}

#[tokio::test]
async fn deploy_edge_function_uses_slug_query() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/abcdefgh/functions/deploy"))
        .and(query_param("slug", "hello"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "fn-1",
            "slug": "hello",
            "name": "hello",
            "status": "ACTIVE",
            "version": 4
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let server = SupabaseMcpServer::from_config(config(&mock, vec![FeatureGroup::Functions], None)).unwrap();
    let result = server
        .call_tool(
            "deploy_edge_function",
            json!({
                "project_id": "abcdefgh",
                "name": "hello",
                "files": [{"name": "index.ts", "content": "Deno.serve(() => new Response(\"ok\"))"}]
            }),
        )
        .await;
    assert_ne!(result.is_error, Some(true), "{}", text(&result));

    let requests = mock.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"metadata\""));
    assert!(body.contains("\"entrypoint_path\":\"index.ts\""));
}
