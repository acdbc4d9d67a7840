//! Platform abstraction over the cloud management APIs
//!
//! [`SupabasePlatform`] is the single interface the tool registry talks to.
//! Every method has a default body returning [`PlatformError::Unsupported`],
//! so a backend implements only the capabilities it has. [`ApiPlatform`] is
//! the production implementation and covers both operation families:
//!
//! - **Management API** (`management`): Supabase's REST API, one endpoint per operation
//! - **Aliyun** (`aliyun`): signed RPC calls against Aliyun's RDS services

pub mod aliyun;
mod api;
pub mod management;
mod types;

pub use aliyun::requests::{
    CreateProjectRequest, DescribeRegionsRequest, DescribeVSwitchesRequest, DescribeVpcsRequest,
    ListProjectsRequest, ModifySecurityIpsRequest, ProjectRequest, ResetPasswordRequest,
};
pub use aliyun::types::{
    AliyunProject, AliyunProjectList, ApiKeys, DashboardAccount, OperationResult, Region, VSwitch,
    Vpc, Zone,
};
pub use api::{build_http_client, ApiPlatform};
pub use types::*;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;

use crate::error::{PlatformError, PlatformResult};

/// Identity the MCP client reported during initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub version: String,
}

/// Outbound `User-Agent`, enriched with the client identity once known
#[derive(Debug)]
pub struct UserAgent(RwLock<String>);

impl UserAgent {
    pub fn new() -> Self {
        Self(RwLock::new(Self::base()))
    }

    fn base() -> String {
        format!("supabase-mcp/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn set_identity(&self, identity: &ClientIdentity) {
        let value = format!("{} ({}/{})", Self::base(), identity.name, identity.version);
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = value;
    }

    pub fn current(&self) -> String {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability set exposed to the tool registry
///
/// Implementations must be safe to call concurrently; the registry issues
/// tool calls without ordering guarantees between them.
#[async_trait]
pub trait SupabasePlatform: Send + Sync {
    /// Called once when the MCP session is initialized
    fn init(&self, _identity: &ClientIdentity) {}

    // ------------------------------------------------------------------
    // Account
    // ------------------------------------------------------------------

    async fn list_organizations(&self) -> PlatformResult<Vec<Organization>> {
        Err(PlatformError::Unsupported("list_organizations"))
    }

    async fn get_organization(&self, _slug: &str) -> PlatformResult<Organization> {
        Err(PlatformError::Unsupported("get_organization"))
    }

    async fn list_projects(&self) -> PlatformResult<Vec<Project>> {
        Err(PlatformError::Unsupported("list_projects"))
    }

    async fn get_project(&self, _project_id: &str) -> PlatformResult<Project> {
        Err(PlatformError::Unsupported("get_project"))
    }

    async fn create_project(&self, _options: CreateProjectOptions) -> PlatformResult<Project> {
        Err(PlatformError::Unsupported("create_project"))
    }

    async fn pause_project(&self, _project_id: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("pause_project"))
    }

    async fn restore_project(&self, _project_id: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("restore_project"))
    }

    // ------------------------------------------------------------------
    // Database
    // ------------------------------------------------------------------

    async fn execute_sql(&self, _project_id: &str, _options: ExecuteSqlOptions) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("execute_sql"))
    }

    async fn list_migrations(&self, _project_id: &str) -> PlatformResult<Vec<Migration>> {
        Err(PlatformError::Unsupported("list_migrations"))
    }

    async fn apply_migration(
        &self,
        _project_id: &str,
        _options: ApplyMigrationOptions,
    ) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("apply_migration"))
    }

    // ------------------------------------------------------------------
    // Debugging
    // ------------------------------------------------------------------

    async fn get_logs(&self, _project_id: &str, _options: GetLogsOptions) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("get_logs"))
    }

    async fn get_security_advisors(&self, _project_id: &str) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("get_security_advisors"))
    }

    async fn get_performance_advisors(&self, _project_id: &str) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("get_performance_advisors"))
    }

    // ------------------------------------------------------------------
    // Development
    // ------------------------------------------------------------------

    async fn get_project_url(&self, _project_id: &str) -> PlatformResult<String> {
        Err(PlatformError::Unsupported("get_project_url"))
    }

    async fn get_anon_key(&self, _project_id: &str) -> PlatformResult<String> {
        Err(PlatformError::Unsupported("get_anon_key"))
    }

    async fn generate_typescript_types(&self, _project_id: &str) -> PlatformResult<Value> {
        Err(PlatformError::Unsupported("generate_typescript_types"))
    }

    // ------------------------------------------------------------------
    // Edge Functions
    // ------------------------------------------------------------------

    async fn list_edge_functions(&self, _project_id: &str) -> PlatformResult<Vec<EdgeFunction>> {
        Err(PlatformError::Unsupported("list_edge_functions"))
    }

    async fn get_edge_function(
        &self,
        _project_id: &str,
        _function_slug: &str,
    ) -> PlatformResult<EdgeFunctionWithBody> {
        Err(PlatformError::Unsupported("get_edge_function"))
    }

    async fn deploy_edge_function(
        &self,
        _project_id: &str,
        _options: DeployEdgeFunctionOptions,
    ) -> PlatformResult<EdgeFunction> {
        Err(PlatformError::Unsupported("deploy_edge_function"))
    }

    // ------------------------------------------------------------------
    // Branching
    // ------------------------------------------------------------------

    async fn list_branches(&self, _project_id: &str) -> PlatformResult<Vec<Branch>> {
        Err(PlatformError::Unsupported("list_branches"))
    }

    async fn create_branch(&self, _project_id: &str, _options: CreateBranchOptions) -> PlatformResult<Branch> {
        Err(PlatformError::Unsupported("create_branch"))
    }

    async fn delete_branch(&self, _branch_id: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("delete_branch"))
    }

    async fn merge_branch(&self, _branch_id: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("merge_branch"))
    }

    async fn reset_branch(&self, _branch_id: &str, _options: ResetBranchOptions) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("reset_branch"))
    }

    async fn rebase_branch(&self, _branch_id: &str) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("rebase_branch"))
    }

    // ------------------------------------------------------------------
    // Storage
    // ------------------------------------------------------------------

    async fn list_storage_buckets(&self, _project_id: &str) -> PlatformResult<Vec<StorageBucket>> {
        Err(PlatformError::Unsupported("list_storage_buckets"))
    }

    async fn get_storage_config(&self, _project_id: &str) -> PlatformResult<StorageConfig> {
        Err(PlatformError::Unsupported("get_storage_config"))
    }

    async fn update_storage_config(&self, _project_id: &str, _config: StorageConfig) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("update_storage_config"))
    }

    // ------------------------------------------------------------------
    // Aliyun
    // ------------------------------------------------------------------

    async fn list_aliyun_projects(&self, _request: ListProjectsRequest) -> PlatformResult<AliyunProjectList> {
        Err(PlatformError::Unsupported("list_aliyun_projects"))
    }

    async fn get_aliyun_project(&self, _request: ProjectRequest) -> PlatformResult<AliyunProject> {
        Err(PlatformError::Unsupported("get_aliyun_project"))
    }

    async fn create_aliyun_project(&self, _request: CreateProjectRequest) -> PlatformResult<OperationResult> {
        Err(PlatformError::Unsupported("create_aliyun_project"))
    }

    async fn delete_aliyun_project(&self, _request: ProjectRequest) -> PlatformResult<OperationResult> {
        Err(PlatformError::Unsupported("delete_aliyun_project"))
    }

    async fn reset_project_password(&self, _request: ResetPasswordRequest) -> PlatformResult<OperationResult> {
        Err(PlatformError::Unsupported("reset_project_password"))
    }

    async fn modify_security_ips(&self, _request: ModifySecurityIpsRequest) -> PlatformResult<OperationResult> {
        Err(PlatformError::Unsupported("modify_security_ips"))
    }

    async fn describe_regions(&self, _request: DescribeRegionsRequest) -> PlatformResult<Vec<Region>> {
        Err(PlatformError::Unsupported("describe_regions"))
    }

    async fn describe_rds_vpcs(&self, _request: DescribeVpcsRequest) -> PlatformResult<Vec<Vpc>> {
        Err(PlatformError::Unsupported("describe_rds_vpcs"))
    }

    async fn describe_rds_vswitches(&self, _request: DescribeVSwitchesRequest) -> PlatformResult<Vec<VSwitch>> {
        Err(PlatformError::Unsupported("describe_rds_vswitches"))
    }

    async fn get_project_api_keys(&self, _request: ProjectRequest) -> PlatformResult<ApiKeys> {
        Err(PlatformError::Unsupported("get_project_api_keys"))
    }

    async fn get_project_dashboard_account(&self, _request: ProjectRequest) -> PlatformResult<DashboardAccount> {
        Err(PlatformError::Unsupported("get_project_dashboard_account"))
    }
}
