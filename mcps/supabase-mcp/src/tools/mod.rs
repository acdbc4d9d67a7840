//! MCP tool tables, one module per feature group

mod account;
mod aliyun;
mod branching;
mod database;
mod debugging;
mod development;
mod feature;
mod functions;
mod registry;
mod storage;

pub use feature::FeatureGroup;
pub use registry::{tool, Access, NoParams, ToolContext, ToolDescriptor, ToolRegistry};

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

/// Input for tools that only need the project
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectIdParams {
    /// Project ref
    pub project_id: String,
}

/// Body returned by operations that have nothing else to report
fn success() -> Value {
    json!({ "success": true })
}
