//! Aliyun-hosted Supabase tools
//!
//! Project lifecycle and network discovery go through the platform's Aliyun
//! backend. `execute_sql` and `list_table` talk to the project's `/pg/query`
//! endpoint directly.

use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{tool, Access, ToolDescriptor};
use crate::platform::{
    CreateProjectRequest, DescribeRegionsRequest, DescribeVSwitchesRequest, DescribeVpcsRequest,
    ListProjectsRequest, ModifySecurityIpsRequest, ProjectRequest, ResetPasswordRequest,
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSqlParams {
    /// SQL to run
    pub query: String,
    /// Project base URL, e.g. "http://1.2.3.4". Defaults to the configured URL
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// Service role key. Defaults to the configured key
    #[serde(default)]
    pub service_role_key: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTableParams {
    /// Schemas to include. Defaults to ["public"]
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Project base URL. Defaults to the configured URL
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// Service role key. Defaults to the configured key
    #[serde(default)]
    pub service_role_key: Option<String>,
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        tool(
            "list_supabase_projects",
            "Lists the Supabase projects in an Aliyun region.",
            Access::Read,
            |ctx, p: ListProjectsRequest| async move { ctx.platform.list_aliyun_projects(p).await },
        ),
        tool(
            "get_supabase_project",
            "Gets details for a Supabase project on Aliyun.",
            Access::Read,
            |ctx, p: ProjectRequest| async move { ctx.platform.get_aliyun_project(p).await },
        ),
        tool(
            "create_supabase_project",
            "Creates a Supabase project on Aliyun. Use describe_regions, describe_rds_vpcs and \
             describe_rds_vswitches first to pick a zone, VPC and VSwitch.",
            Access::Write,
            |ctx, p: CreateProjectRequest| async move { ctx.platform.create_aliyun_project(p).await },
        ),
        tool(
            "delete_supabase_project",
            "Deletes a Supabase project on Aliyun. This cannot be undone.",
            Access::Write,
            |ctx, p: ProjectRequest| async move { ctx.platform.delete_aliyun_project(p).await },
        ),
        tool(
            "reset_supabase_project_password",
            "Resets the dashboard password of a Supabase project on Aliyun.",
            Access::Write,
            |ctx, p: ResetPasswordRequest| async move { ctx.platform.reset_project_password(p).await },
        ),
        tool(
            "modify_supabase_project_security_ips",
            "Replaces the IP whitelist of a Supabase project on Aliyun.",
            Access::Write,
            |ctx, p: ModifySecurityIpsRequest| async move { ctx.platform.modify_security_ips(p).await },
        ),
        tool(
            "describe_regions",
            "Lists the Aliyun regions and zones where projects can be created.",
            Access::Read,
            |ctx, p: DescribeRegionsRequest| async move { ctx.platform.describe_regions(p).await },
        ),
        tool(
            "describe_rds_vpcs",
            "Lists the VPCs available to RDS in a region.",
            Access::Read,
            |ctx, p: DescribeVpcsRequest| async move { ctx.platform.describe_rds_vpcs(p).await },
        ),
        tool(
            "describe_rds_vswitches",
            "Lists the VSwitches of a VPC.",
            Access::Read,
            |ctx, p: DescribeVSwitchesRequest| async move { ctx.platform.describe_rds_vswitches(p).await },
        ),
        tool(
            "get_supabase_project_api_keys",
            "Gets the anon and service role keys of a Supabase project on Aliyun.",
            Access::Read,
            |ctx, p: ProjectRequest| async move { ctx.platform.get_project_api_keys(p).await },
        ),
        tool(
            "get_supabase_project_dashboard_account",
            "Gets the dashboard login account of a Supabase project on Aliyun.",
            Access::Read,
            |ctx, p: ProjectRequest| async move { ctx.platform.get_project_dashboard_account(p).await },
        ),
        tool(
            "execute_sql",
            "Executes raw SQL against a Supabase project through its /pg/query endpoint.",
            Access::Write,
            |ctx, p: ExecuteSqlParams| async move {
                let target = ctx.query.target(p.supabase_url, p.service_role_key)?;
                ctx.query.query(&target, &p.query).await
            },
        ),
        tool(
            "list_table",
            "Lists tables and views in the given schemas through the /pg/query endpoint.",
            Access::Read,
            |ctx, p: ListTableParams| async move {
                let target = ctx.query.target(p.supabase_url, p.service_role_key)?;
                ctx.query.list_tables(&target, &p.schemas).await
            },
        ),
    ]
}
