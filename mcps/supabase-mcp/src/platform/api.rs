//! Production [`SupabasePlatform`] backed by the Management API and Aliyun

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::aliyun::AliyunBackend;
use super::management::ManagementApi;
use super::*;
use crate::config::PlatformOptions;
use crate::error::{PlatformError, PlatformResult};

/// Owns the shared HTTP client and both backends
pub struct ApiPlatform {
    user_agent: Arc<UserAgent>,
    management: ManagementApi,
    aliyun: AliyunBackend,
}

impl ApiPlatform {
    /// Build both backends on top of `http`
    pub fn new(http: Client, options: PlatformOptions) -> Self {
        let user_agent = Arc::new(UserAgent::new());

        Self {
            management: ManagementApi::new(http.clone(), &options, Arc::clone(&user_agent)),
            aliyun: AliyunBackend::new(http, options, Arc::clone(&user_agent)),
            user_agent,
        }
    }
}

/// Shared client with the configured request timeout
pub fn build_http_client(options: &PlatformOptions) -> PlatformResult<Client> {
    Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|e| PlatformError::Config(format!("failed to build HTTP client: {}", e)))
}

#[async_trait]
impl SupabasePlatform for ApiPlatform {
    fn init(&self, identity: &ClientIdentity) {
        info!(client = %identity.name, version = %identity.version, "platform initialized");
        self.user_agent.set_identity(identity);
    }

    async fn list_organizations(&self) -> PlatformResult<Vec<Organization>> {
        self.management.list_organizations().await
    }

    async fn get_organization(&self, slug: &str) -> PlatformResult<Organization> {
        self.management.get_organization(slug).await
    }

    async fn list_projects(&self) -> PlatformResult<Vec<Project>> {
        self.management.list_projects().await
    }

    async fn get_project(&self, project_id: &str) -> PlatformResult<Project> {
        self.management.get_project(project_id).await
    }

    async fn create_project(&self, options: CreateProjectOptions) -> PlatformResult<Project> {
        self.management.create_project(options).await
    }

    async fn pause_project(&self, project_id: &str) -> PlatformResult<()> {
        self.management.pause_project(project_id).await
    }

    async fn restore_project(&self, project_id: &str) -> PlatformResult<()> {
        self.management.restore_project(project_id).await
    }

    async fn execute_sql(&self, project_id: &str, options: ExecuteSqlOptions) -> PlatformResult<Value> {
        self.management.execute_sql(project_id, options).await
    }

    async fn list_migrations(&self, project_id: &str) -> PlatformResult<Vec<Migration>> {
        self.management.list_migrations(project_id).await
    }

    async fn apply_migration(&self, project_id: &str, options: ApplyMigrationOptions) -> PlatformResult<Value> {
        self.management.apply_migration(project_id, options).await
    }

    async fn get_logs(&self, project_id: &str, options: GetLogsOptions) -> PlatformResult<Value> {
        self.management.get_logs(project_id, options).await
    }

    async fn get_security_advisors(&self, project_id: &str) -> PlatformResult<Value> {
        self.management.get_security_advisors(project_id).await
    }

    async fn get_performance_advisors(&self, project_id: &str) -> PlatformResult<Value> {
        self.management.get_performance_advisors(project_id).await
    }

    async fn get_project_url(&self, project_id: &str) -> PlatformResult<String> {
        self.management.project_url(project_id)
    }

    async fn get_anon_key(&self, project_id: &str) -> PlatformResult<String> {
        self.management.get_anon_key(project_id).await
    }

    async fn generate_typescript_types(&self, project_id: &str) -> PlatformResult<Value> {
        self.management.generate_typescript_types(project_id).await
    }

    async fn list_edge_functions(&self, project_id: &str) -> PlatformResult<Vec<EdgeFunction>> {
        self.management.list_edge_functions(project_id).await
    }

    async fn get_edge_function(&self, project_id: &str, function_slug: &str) -> PlatformResult<EdgeFunctionWithBody> {
        self.management.get_edge_function(project_id, function_slug).await
    }

    async fn deploy_edge_function(
        &self,
        project_id: &str,
        options: DeployEdgeFunctionOptions,
    ) -> PlatformResult<EdgeFunction> {
        self.management.deploy_edge_function(project_id, options).await
    }

    async fn list_branches(&self, project_id: &str) -> PlatformResult<Vec<Branch>> {
        self.management.list_branches(project_id).await
    }

    async fn create_branch(&self, project_id: &str, options: CreateBranchOptions) -> PlatformResult<Branch> {
        self.management.create_branch(project_id, options).await
    }

    async fn delete_branch(&self, branch_id: &str) -> PlatformResult<()> {
        self.management.delete_branch(branch_id).await
    }

    async fn merge_branch(&self, branch_id: &str) -> PlatformResult<()> {
        self.management.merge_branch(branch_id).await
    }

    async fn reset_branch(&self, branch_id: &str, options: ResetBranchOptions) -> PlatformResult<()> {
        self.management.reset_branch(branch_id, options).await
    }

    async fn rebase_branch(&self, branch_id: &str) -> PlatformResult<()> {
        self.management.rebase_branch(branch_id).await
    }

    async fn list_storage_buckets(&self, project_id: &str) -> PlatformResult<Vec<StorageBucket>> {
        self.management.list_storage_buckets(project_id).await
    }

    async fn get_storage_config(&self, project_id: &str) -> PlatformResult<StorageConfig> {
        self.management.get_storage_config(project_id).await
    }

    async fn update_storage_config(&self, project_id: &str, config: StorageConfig) -> PlatformResult<()> {
        self.management.update_storage_config(project_id, config).await
    }

    async fn list_aliyun_projects(&self, request: ListProjectsRequest) -> PlatformResult<AliyunProjectList> {
        self.aliyun.list_projects(&request).await
    }

    async fn get_aliyun_project(&self, request: ProjectRequest) -> PlatformResult<AliyunProject> {
        self.aliyun.get_project(&request).await
    }

    async fn create_aliyun_project(&self, request: CreateProjectRequest) -> PlatformResult<OperationResult> {
        self.aliyun.create_project(&request).await
    }

    async fn delete_aliyun_project(&self, request: ProjectRequest) -> PlatformResult<OperationResult> {
        self.aliyun.delete_project(&request).await
    }

    async fn reset_project_password(&self, request: ResetPasswordRequest) -> PlatformResult<OperationResult> {
        self.aliyun.reset_password(&request).await
    }

    async fn modify_security_ips(&self, request: ModifySecurityIpsRequest) -> PlatformResult<OperationResult> {
        self.aliyun.modify_security_ips(&request).await
    }

    async fn describe_regions(&self, request: DescribeRegionsRequest) -> PlatformResult<Vec<Region>> {
        self.aliyun.describe_regions(&request).await
    }

    async fn describe_rds_vpcs(&self, request: DescribeVpcsRequest) -> PlatformResult<Vec<Vpc>> {
        self.aliyun.describe_vpcs(&request).await
    }

    async fn describe_rds_vswitches(&self, request: DescribeVSwitchesRequest) -> PlatformResult<Vec<VSwitch>> {
        self.aliyun.describe_vswitches(&request).await
    }

    async fn get_project_api_keys(&self, request: ProjectRequest) -> PlatformResult<ApiKeys> {
        self.aliyun.get_api_keys(&request).await
    }

    async fn get_project_dashboard_account(&self, request: ProjectRequest) -> PlatformResult<DashboardAccount> {
        self.aliyun.get_dashboard_account(&request).await
    }
}
