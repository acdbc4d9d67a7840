use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use super::ProjectIdParams;
use crate::platform::{DeployEdgeFunctionOptions, EdgeFunctionFile};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetEdgeFunctionParams {
    /// Project ref
    pub project_id: String,
    /// Function slug
    pub function_slug: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeployEdgeFunctionParams {
    /// Project ref
    pub project_id: String,
    /// Function name, also used as its slug
    pub name: String,
    /// Entrypoint file, relative to the function root
    #[serde(default = "default_entrypoint")]
    pub entrypoint_path: String,
    /// Import map file. Detected from deno.json or import_map.json when omitted
    #[serde(default)]
    pub import_map_path: Option<String>,
    /// Source files to upload
    pub files: Vec<EdgeFunctionFile>,
}

fn default_entrypoint() -> String {
    "index.ts".to_string()
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_edge_functions",
            "Lists all Edge Functions in a Supabase project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.list_edge_functions(&p.project_id).await },
        ),
        tool(
            "get_edge_function",
            "Retrieves file contents for an Edge Function in a Supabase project.",
            Access::Read,
            |ctx, p: GetEdgeFunctionParams| async move {
                ctx.platform
                    .get_edge_function(&p.project_id, &p.function_slug)
                    .await
            },
        ),
        tool(
            "deploy_edge_function",
            "Deploys an Edge Function to a Supabase project. A new version is created if the \
             function already exists.",
            Access::Write,
            |ctx, p: DeployEdgeFunctionParams| async move {
                let options = DeployEdgeFunctionOptions {
                    name: p.name,
                    entrypoint_path: p.entrypoint_path,
                    import_map_path: p.import_map_path,
                    files: p.files,
                };
                ctx.platform.deploy_edge_function(&p.project_id, options).await
            },
        ),
    ]
}
