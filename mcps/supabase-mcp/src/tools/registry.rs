//! Tool descriptors and the registry that dispatches calls to them
//!
//! A descriptor pairs a name and description with a typed handler. The input
//! schema is derived from the handler's parameter type, so the schema shown to
//! clients and the struct the handler receives cannot drift apart.

use futures::future::BoxFuture;
use jsonschema::{Draft, Validator};
use mcp_common::{error_result, json_success};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use super::FeatureGroup;
use crate::error::{PlatformError, PlatformResult, ToolError};
use crate::platform::SupabasePlatform;
use crate::query::PgQueryClient;

const PROJECT_ID: &str = "project_id";

/// Whether a tool only reads, or changes remote state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ToolContext {
    pub platform: Arc<dyn SupabasePlatform>,
    pub query: Arc<PgQueryClient>,
    pub read_only: bool,
}

/// Input for tools that take no arguments
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

type HandlerFuture = BoxFuture<'static, PlatformResult<Value>>;
type Handler = Arc<dyn Fn(ToolContext, Value) -> HandlerFuture + Send + Sync>;

pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub access: Access,
    schema: JsonObject,
    handler: Handler,
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("access", &self.access)
            .finish()
    }
}

/// Build a descriptor whose schema comes from `P`
pub fn tool<P, R, F, Fut>(name: &'static str, description: &'static str, access: Access, handler: F) -> ToolDescriptor
where
    P: DeserializeOwned + JsonSchema + Send + 'static,
    R: Serialize + Send + 'static,
    F: Fn(ToolContext, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PlatformResult<R>> + Send + 'static,
{
    let schema = schemars::schema_for!(P).as_object().cloned().unwrap_or_default();

    let handler: Handler = Arc::new(move |ctx: ToolContext, args: Value| -> HandlerFuture {
        match serde_json::from_value::<P>(args) {
            Ok(params) => {
                let fut = handler(ctx, params);
                Box::pin(async move { Ok(serde_json::to_value(fut.await?)?) })
            }
            Err(e) => Box::pin(async move { Err(PlatformError::validation(e.to_string())) }),
        }
    });

    ToolDescriptor {
        name,
        description,
        access,
        schema,
        handler,
    }
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    group: FeatureGroup,
    validator: Validator,
    listed: Tool,
    inject_project: bool,
}

/// The active tool set, fixed at assembly
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<&'static str, usize>,
    read_only: bool,
    project_ref: Option<String>,
    context: ToolContext,
}

impl ToolRegistry {
    /// Collect the tools of `features`, in order
    ///
    /// With a `project_ref`, the account group is left out and management
    /// tools stop asking for `project_id`. Fails on duplicate tool names.
    pub fn assemble(
        features: &[FeatureGroup],
        read_only: bool,
        project_ref: Option<String>,
        context: ToolContext,
    ) -> PlatformResult<Self> {
        let mut tools: Vec<RegisteredTool> = Vec::new();
        let mut index = HashMap::new();

        for &group in features {
            if project_ref.is_some() && group == FeatureGroup::Account {
                info!("project scoped, skipping account tools");
                continue;
            }

            for descriptor in group.tools() {
                if index.contains_key(descriptor.name) {
                    return Err(PlatformError::Config(format!(
                        "duplicate tool name: {}",
                        descriptor.name
                    )));
                }

                let validator = jsonschema::options()
                    .with_draft(Draft::Draft202012)
                    .build(&Value::Object(descriptor.schema.clone()))
                    .map_err(|e| {
                        PlatformError::Config(format!("invalid schema for {}: {}", descriptor.name, e))
                    })?;

                let inject_project = project_ref.is_some()
                    && group.uses_management_api()
                    && has_property(&descriptor.schema, PROJECT_ID);

                let mut shown = descriptor.schema.clone();
                if inject_project {
                    remove_property(&mut shown, PROJECT_ID);
                }
                let listed = Tool::new(descriptor.name, descriptor.description, Arc::new(shown));

                index.insert(descriptor.name, tools.len());
                tools.push(RegisteredTool {
                    descriptor,
                    group,
                    validator,
                    listed,
                    inject_project,
                });
            }
        }

        info!(tools = tools.len(), read_only, "tool registry assembled");
        Ok(Self {
            tools,
            index,
            read_only,
            project_ref,
            context,
        })
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.listed.clone()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.descriptor.name).collect()
    }

    pub fn group_of(&self, name: &str) -> Option<FeatureGroup> {
        self.index.get(name).map(|&i| self.tools[i].group)
    }

    /// Run a tool and wrap the outcome in a result envelope
    ///
    /// Never fails: every error becomes a failure envelope.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(value) => {
                info!(tool = name, "tool call succeeded");
                json_success(&value).unwrap_or_else(|e| error_result(e.message))
            }
            Err(err) => {
                warn!(tool = name, error = %err, "tool call failed");
                error_result(err.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let mut arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        if tool.inject_project {
            if let (Some(map), Some(project_ref)) = (arguments.as_object_mut(), &self.project_ref) {
                // The scoped ref always wins over a caller-supplied project_id
                map.insert(PROJECT_ID.to_string(), Value::String(project_ref.clone()));
            }
        }

        let errors: Vec<String> = tool.validator.iter_errors(&arguments).map(|e| e.to_string()).collect();
        if !errors.is_empty() {
            return Err(ToolError::InvalidArguments {
                tool: name.to_string(),
                details: errors.join("; "),
            });
        }

        if self.read_only && tool.descriptor.access == Access::Write {
            return Err(ToolError::ReadOnlyMode(name.to_string()));
        }

        Ok((tool.descriptor.handler)(self.context.clone(), arguments).await?)
    }
}

fn has_property(schema: &JsonObject, name: &str) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|props| props.contains_key(name))
}

fn remove_property(schema: &mut JsonObject, name: &str) {
    if let Some(Value::Object(props)) = schema.get_mut("properties") {
        props.remove(name);
    }
    if let Some(Value::Array(required)) = schema.get_mut("required") {
        required.retain(|v| v.as_str() != Some(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remove_property_updates_required() {
        let mut schema = json!({
            "type": "object",
            "properties": {"project_id": {"type": "string"}, "query": {"type": "string"}},
            "required": ["project_id", "query"]
        })
        .as_object()
        .cloned()
        .unwrap();

        assert!(has_property(&schema, PROJECT_ID));
        remove_property(&mut schema, PROJECT_ID);
        assert!(!has_property(&schema, PROJECT_ID));
        assert_eq!(schema["required"], json!(["query"]));
    }

    struct NothingPlatform;

    #[async_trait::async_trait]
    impl SupabasePlatform for NothingPlatform {}

    fn context() -> ToolContext {
        ToolContext {
            platform: Arc::new(NothingPlatform),
            query: Arc::new(PgQueryClient::new(reqwest::Client::new(), Default::default())),
            read_only: false,
        }
    }

    #[test]
    fn test_assemble_keeps_group_order() {
        let registry =
            ToolRegistry::assemble(&[FeatureGroup::Storage, FeatureGroup::Debugging], false, None, context()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "list_storage_buckets",
                "get_storage_config",
                "update_storage_config",
                "get_logs",
                "get_advisors"
            ]
        );
        assert_eq!(registry.group_of("get_logs"), Some(FeatureGroup::Debugging));
        assert_eq!(registry.group_of("describe_regions"), None);
    }

    #[test]
    fn test_assemble_rejects_duplicate_groups() {
        let err = ToolRegistry::assemble(&[FeatureGroup::Storage, FeatureGroup::Storage], false, None, context())
            .err().unwrap();
        assert!(err.to_string().contains("duplicate tool name: list_storage_buckets"));
    }

    #[test]
    fn test_project_scope_drops_account_group() {
        let registry = ToolRegistry::assemble(
            &[FeatureGroup::Account, FeatureGroup::Aliyun],
            false,
            Some("abcdefgh".into()),
            context(),
        )
        .unwrap();
        assert_eq!(registry.group_of("list_projects"), None);

        // Aliyun tools keep their own project_id
        let tool = registry.tools.iter().find(|t| t.descriptor.name == "get_supabase_project").unwrap();
        assert!(!tool.inject_project);
        assert!(has_property(&tool.listed.input_schema, PROJECT_ID));
    }

    #[tokio::test]
    async fn test_scoped_call_injects_project_id() {
        let registry =
            ToolRegistry::assemble(&[FeatureGroup::Storage], false, Some("scoped".into()), context()).unwrap();
        let tool = registry.tools.iter().find(|t| t.descriptor.name == "list_storage_buckets").unwrap();
        assert!(tool.inject_project);
        assert!(!has_property(&tool.listed.input_schema, PROJECT_ID));

        let result = registry.call_tool("list_storage_buckets", json!({})).await;
        assert_eq!(
            mcp_common::first_text(&result),
            Some("Error: operation 'list_storage_buckets' is not supported by this platform")
        );
    }

    #[test]
    fn test_no_params_schema_is_an_object() {
        let descriptor = tool("ping", "Ping", Access::Read, |_ctx, _: NoParams| async {
            Ok::<_, PlatformError>("pong")
        });
        assert_eq!(descriptor.schema.get("type"), Some(&json!("object")));
    }
}
