//! Aliyun backend for Supabase instances hosted on RDS AI
//!
//! Every operation follows the same path:
//! 1. validate the request struct (no network traffic on failure)
//! 2. fetch or build the RPC client for the resolved region
//! 3. sign and send the action
//! 4. decode the PascalCase body into a camelCase output type
//!
//! RPC clients are cached per region for the lifetime of the backend.

pub mod client;
pub mod requests;
pub mod signature;
pub mod types;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use self::client::{Product, RpcAction, RpcClient};
use self::requests::*;
use self::types::*;
use super::UserAgent;
use crate::config::PlatformOptions;
use crate::error::{PlatformError, PlatformResult};

const DESCRIBE_APP_INSTANCES: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "DescribeAppInstances",
    context: "Failed to list Supabase projects",
};
const DESCRIBE_APP_INSTANCE_ATTRIBUTE: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "DescribeAppInstanceAttribute",
    context: "Failed to fetch Supabase project",
};
const CREATE_APP_INSTANCE: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "CreateAppInstance",
    context: "Failed to create Supabase project",
};
const DELETE_APP_INSTANCE: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "DeleteAppInstance",
    context: "Failed to delete Supabase project",
};
const RESET_INSTANCE_PASSWORD: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "ResetInstancePassword",
    context: "Failed to reset Supabase project password",
};
const MODIFY_INSTANCE_IP_WHITELIST: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "ModifyInstanceIpWhitelist",
    context: "Failed to modify Supabase project security IPs",
};
const DESCRIBE_INSTANCE_AUTH_INFO: RpcAction = RpcAction {
    product: Product::RdsAi,
    name: "DescribeInstanceAuthInfo",
    context: "Failed to fetch Supabase project API keys",
};
const DESCRIBE_REGIONS: RpcAction = RpcAction {
    product: Product::Rds,
    name: "DescribeRegions",
    context: "Failed to describe regions",
};
const DESCRIBE_RDS_VPCS: RpcAction = RpcAction {
    product: Product::Rds,
    name: "DescribeRdsVpcs",
    context: "Failed to describe VPCs",
};
const DESCRIBE_RDS_VSWITCHES: RpcAction = RpcAction {
    product: Product::Rds,
    name: "DescribeRdsVSwitchs",
    context: "Failed to describe VSwitches",
};

pub struct AliyunBackend {
    http: Client,
    options: PlatformOptions,
    user_agent: Arc<UserAgent>,
    clients: Mutex<HashMap<String, Arc<RpcClient>>>,
}

impl AliyunBackend {
    pub fn new(http: Client, options: PlatformOptions, user_agent: Arc<UserAgent>) -> Self {
        Self {
            http,
            options,
            user_agent,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Get the region's client, building it on first use
    ///
    /// The lock is held across construction, so concurrent first calls for
    /// one region end up sharing a single client.
    async fn client(&self, region: &str) -> PlatformResult<Arc<RpcClient>> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(region) {
            return Ok(Arc::clone(client));
        }

        let credential = self.options.aliyun_credential()?;
        let client = Arc::new(RpcClient::new(
            self.http.clone(),
            credential,
            region,
            self.options.aliyun_endpoint.as_deref(),
        )?);
        debug!(region, "created Aliyun RPC client");
        clients.insert(region.to_string(), Arc::clone(&client));
        Ok(client)
    }

    async fn invoke<R, T>(&self, action: RpcAction, request: &R) -> PlatformResult<T>
    where
        R: RpcRequest,
        T: DeserializeOwned,
    {
        request.validate()?;

        let region = self.options.region(request.region_id()).to_string();
        let client = self.client(&region).await?;

        let mut params = request.params();
        params.insert("RegionId".to_string(), region);

        let body = client.call(action, &params, &self.user_agent.current()).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list_projects(&self, request: &ListProjectsRequest) -> PlatformResult<AliyunProjectList> {
        let raw: RawAppInstanceList = self.invoke(DESCRIBE_APP_INSTANCES, request).await?;
        Ok(raw.into())
    }

    async fn describe_project(&self, request: &ProjectRequest) -> PlatformResult<RawAppInstance> {
        self.invoke(DESCRIBE_APP_INSTANCE_ATTRIBUTE, request).await
    }

    pub async fn get_project(&self, request: &ProjectRequest) -> PlatformResult<AliyunProject> {
        Ok(self.describe_project(request).await?.into())
    }

    pub async fn create_project(&self, request: &CreateProjectRequest) -> PlatformResult<OperationResult> {
        let raw: RawOperation = self.invoke(CREATE_APP_INSTANCE, request).await?;
        Ok(raw.into())
    }

    pub async fn delete_project(&self, request: &ProjectRequest) -> PlatformResult<OperationResult> {
        let raw: RawOperation = self.invoke(DELETE_APP_INSTANCE, request).await?;
        let mut result = OperationResult::from(raw);
        result.project_id.get_or_insert_with(|| request.project_id.clone());
        Ok(result)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> PlatformResult<OperationResult> {
        let raw: RawOperation = self.invoke(RESET_INSTANCE_PASSWORD, request).await?;
        Ok(OperationResult {
            project_id: Some(request.project_id.clone()),
            ..OperationResult::from(raw)
        })
    }

    pub async fn modify_security_ips(&self, request: &ModifySecurityIpsRequest) -> PlatformResult<OperationResult> {
        let raw: RawOperation = self.invoke(MODIFY_INSTANCE_IP_WHITELIST, request).await?;
        Ok(OperationResult {
            project_id: Some(request.project_id.clone()),
            ..OperationResult::from(raw)
        })
    }

    pub async fn describe_regions(&self, request: &DescribeRegionsRequest) -> PlatformResult<Vec<Region>> {
        let raw: RawRegions = self.invoke(DESCRIBE_REGIONS, request).await?;
        Ok(group_regions(raw.regions.rows))
    }

    pub async fn describe_vpcs(&self, request: &DescribeVpcsRequest) -> PlatformResult<Vec<Vpc>> {
        let raw: RawVpcs = self.invoke(DESCRIBE_RDS_VPCS, request).await?;
        Ok(raw.vpcs.items.into_iter().map(Into::into).collect())
    }

    pub async fn describe_vswitches(&self, request: &DescribeVSwitchesRequest) -> PlatformResult<Vec<VSwitch>> {
        let raw: RawVSwitches = self.invoke(DESCRIBE_RDS_VSWITCHES, request).await?;
        Ok(raw.vswitches.items.into_iter().map(Into::into).collect())
    }

    pub async fn get_api_keys(&self, request: &ProjectRequest) -> PlatformResult<ApiKeys> {
        let raw: RawAuthInfo = self.invoke(DESCRIBE_INSTANCE_AUTH_INFO, request).await?;
        let keys = raw.api_keys;

        let anon_key = keys
            .as_ref()
            .and_then(|k| k.anon_key.clone())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PlatformError::NotFound("anon key".to_string()))?;
        let service_role_key = keys.and_then(|k| k.service_key).filter(|k| !k.is_empty());

        Ok(ApiKeys {
            anon_key,
            service_role_key,
        })
    }

    pub async fn get_dashboard_account(&self, request: &ProjectRequest) -> PlatformResult<DashboardAccount> {
        let raw = self.describe_project(request).await?;
        let username = raw
            .dashboard_username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PlatformError::NotFound("dashboard account".to_string()))?;

        let dashboard_url = raw
            .public_connection_string
            .or(raw.vpc_connection_string)
            .map(|host| {
                if host.starts_with("http://") || host.starts_with("https://") {
                    host
                } else {
                    format!("http://{}", host)
                }
            });

        Ok(DashboardAccount {
            username,
            dashboard_url,
        })
    }
}
