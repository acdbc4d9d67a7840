//! Development branch tools
//!
//! Branch operations other than list/create address the branch by its own ID,
//! not the parent project, so they are unaffected by project scoping.

use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use super::{success, ProjectIdParams};
use crate::platform::{CreateBranchOptions, ResetBranchOptions};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateBranchParams {
    /// Project ref
    pub project_id: String,
    /// Branch name
    #[serde(default = "default_branch_name")]
    pub name: String,
}

fn default_branch_name() -> String {
    "develop".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BranchIdParams {
    /// Branch ID
    pub branch_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResetBranchParams {
    /// Branch ID
    pub branch_id: String,
    /// Reset to this migration version; all migrations are reverted when omitted
    #[serde(default)]
    pub migration_version: Option<String>,
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_branches",
            "Lists all development branches of a Supabase project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.list_branches(&p.project_id).await },
        ),
        tool(
            "create_branch",
            "Creates a development branch on a Supabase project.",
            Access::Write,
            |ctx, p: CreateBranchParams| async move {
                let options = CreateBranchOptions { name: p.name };
                ctx.platform.create_branch(&p.project_id, options).await
            },
        ),
        tool(
            "delete_branch",
            "Deletes a development branch.",
            Access::Write,
            |ctx, p: BranchIdParams| async move {
                ctx.platform.delete_branch(&p.branch_id).await.map(|()| success())
            },
        ),
        tool(
            "merge_branch",
            "Merges migrations and edge functions from a development branch to production.",
            Access::Write,
            |ctx, p: BranchIdParams| async move {
                ctx.platform.merge_branch(&p.branch_id).await.map(|()| success())
            },
        ),
        tool(
            "reset_branch",
            "Resets migrations of a development branch. Untracked changes are lost.",
            Access::Write,
            |ctx, p: ResetBranchParams| async move {
                let options = ResetBranchOptions {
                    migration_version: p.migration_version,
                };
                ctx.platform
                    .reset_branch(&p.branch_id, options)
                    .await
                    .map(|()| success())
            },
        ),
        tool(
            "rebase_branch",
            "Rebases a development branch on production, applying newer migrations from production.",
            Access::Write,
            |ctx, p: BranchIdParams| async move {
                ctx.platform.rebase_branch(&p.branch_id).await.map(|()| success())
            },
        ),
    ]
}
