use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use super::{success, ProjectIdParams};
use crate::platform::StorageConfig;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateStorageConfigParams {
    /// Project ref
    pub project_id: String,
    /// Full storage configuration; replaces the current one
    pub config: StorageConfig,
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_storage_buckets",
            "Lists all storage buckets in a Supabase project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.list_storage_buckets(&p.project_id).await },
        ),
        tool(
            "get_storage_config",
            "Gets the storage config for a Supabase project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.get_storage_config(&p.project_id).await },
        ),
        tool(
            "update_storage_config",
            "Updates the storage config for a Supabase project.",
            Access::Write,
            |ctx, p: UpdateStorageConfigParams| async move {
                ctx.platform
                    .update_storage_config(&p.project_id, p.config)
                    .await
                    .map(|()| success())
            },
        ),
    ]
}
