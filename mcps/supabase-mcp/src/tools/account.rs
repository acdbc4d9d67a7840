use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, NoParams, ToolDescriptor};
use super::{success, ProjectIdParams};
use crate::platform::CreateProjectOptions;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrganizationParams {
    /// Organization ID (slug)
    pub id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateProjectParams {
    /// Project name
    pub name: String,
    /// Organization to create the project in
    pub organization_id: String,
    /// Region, e.g. "us-east-1"
    #[serde(default)]
    pub region: Option<String>,
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_organizations",
            "Lists all organizations that the user is a member of.",
            Access::Read,
            |ctx, _: NoParams| async move { ctx.platform.list_organizations().await },
        ),
        tool(
            "get_organization",
            "Gets details for an organization.",
            Access::Read,
            |ctx, p: OrganizationParams| async move { ctx.platform.get_organization(&p.id).await },
        ),
        tool(
            "list_projects",
            "Lists all Supabase projects for the user.",
            Access::Read,
            |ctx, _: NoParams| async move { ctx.platform.list_projects().await },
        ),
        tool(
            "get_project",
            "Gets details for a Supabase project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.get_project(&p.project_id).await },
        ),
        tool(
            "create_project",
            "Creates a new Supabase project.",
            Access::Write,
            |ctx, p: CreateProjectParams| async move {
                let options = CreateProjectOptions {
                    name: p.name,
                    organization_id: p.organization_id,
                    region: p.region,
                    db_pass: None,
                };
                ctx.platform.create_project(options).await
            },
        ),
        tool(
            "pause_project",
            "Pauses a Supabase project.",
            Access::Write,
            |ctx, p: ProjectIdParams| async move {
                ctx.platform.pause_project(&p.project_id).await.map(|()| success())
            },
        ),
        tool(
            "restore_project",
            "Restores a paused Supabase project.",
            Access::Write,
            |ctx, p: ProjectIdParams| async move {
                ctx.platform.restore_project(&p.project_id).await.map(|()| success())
            },
        ),
    ]
}
