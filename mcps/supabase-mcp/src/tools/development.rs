use super::registry::{tool, Access, ToolDescriptor};
use super::ProjectIdParams;

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "get_project_url",
            "Gets the API URL for a project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.get_project_url(&p.project_id).await },
        ),
        tool(
            "get_anon_key",
            "Gets the anonymous API key for a project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move { ctx.platform.get_anon_key(&p.project_id).await },
        ),
        tool(
            "generate_typescript_types",
            "Generates TypeScript types for a project.",
            Access::Read,
            |ctx, p: ProjectIdParams| async move {
                ctx.platform.generate_typescript_types(&p.project_id).await
            },
        ),
    ]
}
