//! Per-operation request structs for the Aliyun backend
//!
//! Each struct doubles as the tool's input schema. `validate` runs before any
//! network traffic; `params` produces the RPC parameters minus `RegionId`,
//! which the backend adds after resolving the region.

use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};

pub type RpcParams = BTreeMap<String, String>;

const APP_TYPE: &str = "supabase";
const DEFAULT_INSTANCE_CLASS: &str = "rdsai.supabase.basic";

pub trait RpcRequest {
    fn region_id(&self) -> Option<&str>;

    fn validate(&self) -> PlatformResult<()> {
        Ok(())
    }

    fn params(&self) -> RpcParams;
}

fn require(field: &str, value: &str) -> PlatformResult<()> {
    if value.trim().is_empty() {
        Err(PlatformError::missing_field(field))
    } else {
        Ok(())
    }
}

fn params<const N: usize>(pairs: [(&str, &str); N]) -> RpcParams {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn insert_opt(params: &mut RpcParams, key: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value.to_string());
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListProjectsRequest {
    /// Region ID, e.g. "cn-hangzhou". Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// Page number, starting at 1
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Page size
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl RpcRequest for ListProjectsRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn params(&self) -> RpcParams {
        let mut p = params([("AppType", APP_TYPE)]);
        insert_opt(&mut p, "PageNumber", self.page_number);
        insert_opt(&mut p, "PageSize", self.page_size);
        p
    }
}

/// Reference to a single Supabase project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProjectRequest {
    /// Project (instance) ID
    pub project_id: String,
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
}

impl RpcRequest for ProjectRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn validate(&self) -> PlatformResult<()> {
        require("project_id", &self.project_id)
    }

    fn params(&self) -> RpcParams {
        params([("InstanceName", self.project_id.as_str())])
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateProjectRequest {
    /// Display name of the new project
    pub project_name: String,
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// Zone ID, e.g. "cn-hangzhou-i"
    pub zone_id: String,
    /// VPC the project is attached to
    pub vpc_id: String,
    /// VSwitch inside the VPC
    pub vswitch_id: String,
    /// Instance class. Defaults to "rdsai.supabase.basic"
    #[serde(default)]
    pub instance_class: Option<String>,
    /// Password for the Supabase dashboard
    pub dashboard_password: String,
    /// Password for the database superuser
    pub database_password: String,
    /// Expose the project on a public endpoint
    #[serde(default)]
    pub public_network_access_enabled: Option<bool>,
    /// Idempotency token. Generated when omitted
    #[serde(default)]
    pub client_token: Option<String>,
}

impl RpcRequest for CreateProjectRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn validate(&self) -> PlatformResult<()> {
        require("project_name", &self.project_name)?;
        require("zone_id", &self.zone_id)?;
        require("vpc_id", &self.vpc_id)?;
        require("vswitch_id", &self.vswitch_id)?;
        require("dashboard_password", &self.dashboard_password)?;
        require("database_password", &self.database_password)
    }

    fn params(&self) -> RpcParams {
        let mut p = params([
            ("AppName", self.project_name.as_str()),
            ("AppType", APP_TYPE),
            ("ZoneId", self.zone_id.as_str()),
            ("VpcId", self.vpc_id.as_str()),
            ("VSwitchId", self.vswitch_id.as_str()),
            (
                "InstanceClass",
                self.instance_class.as_deref().unwrap_or(DEFAULT_INSTANCE_CLASS),
            ),
            ("DashboardPassword", self.dashboard_password.as_str()),
            ("DatabasePassword", self.database_password.as_str()),
        ]);
        insert_opt(&mut p, "PublicNetworkAccessEnabled", self.public_network_access_enabled);
        let token = self
            .client_token
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        p.insert("ClientToken".to_string(), token);
        p
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResetPasswordRequest {
    /// Project (instance) ID
    pub project_id: String,
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// New dashboard password
    pub account_password: String,
}

impl RpcRequest for ResetPasswordRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn validate(&self) -> PlatformResult<()> {
        require("project_id", &self.project_id)?;
        require("account_password", &self.account_password)
    }

    fn params(&self) -> RpcParams {
        params([
            ("InstanceName", self.project_id.as_str()),
            ("DashboardPassword", self.account_password.as_str()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModifySecurityIpsRequest {
    /// Project (instance) ID
    pub project_id: String,
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// Comma-separated IPs or CIDR blocks, e.g. "10.0.0.1,192.168.0.0/24".
    /// Replaces the current whitelist
    pub security_ip_list: String,
}

impl ModifySecurityIpsRequest {
    /// Entries of `security_ip_list`, trimmed, empties dropped, order kept
    pub fn entries(&self) -> Vec<&str> {
        self.security_ip_list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl RpcRequest for ModifySecurityIpsRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn validate(&self) -> PlatformResult<()> {
        require("project_id", &self.project_id)?;
        if self.entries().is_empty() {
            return Err(PlatformError::missing_field("security_ip_list"));
        }
        Ok(())
    }

    fn params(&self) -> RpcParams {
        let whitelist = self.entries().join(",");
        params([
            ("InstanceName", self.project_id.as_str()),
            ("IpWhitelist", whitelist.as_str()),
            ("GroupName", "default"),
            ("ModifyMode", "Cover"),
        ])
    }
}

// ============================================================================
// Network Discovery
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DescribeRegionsRequest {
    /// Language of the localized names: "zh-CN" or "en-US"
    #[serde(default)]
    pub accept_language: Option<String>,
}

impl RpcRequest for DescribeRegionsRequest {
    fn region_id(&self) -> Option<&str> {
        None
    }

    fn params(&self) -> RpcParams {
        let mut p = RpcParams::new();
        insert_opt(&mut p, "AcceptLanguage", self.accept_language.as_deref());
        p
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DescribeVpcsRequest {
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// Only VPCs with a VSwitch in this zone
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl RpcRequest for DescribeVpcsRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn params(&self) -> RpcParams {
        let mut p = RpcParams::new();
        insert_opt(&mut p, "ZoneId", self.zone_id.as_deref());
        p
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeVSwitchesRequest {
    /// Region ID. Defaults to the configured region
    #[serde(default)]
    pub region_id: Option<String>,
    /// VPC to list VSwitches for
    pub vpc_id: String,
    /// Only VSwitches in this zone
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl RpcRequest for DescribeVSwitchesRequest {
    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn validate(&self) -> PlatformResult<()> {
        require("vpc_id", &self.vpc_id)
    }

    fn params(&self) -> RpcParams {
        let mut p = params([("VpcId", self.vpc_id.as_str())]);
        insert_opt(&mut p, "ZoneId", self.zone_id.as_deref());
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateProjectRequest {
        CreateProjectRequest {
            project_name: "demo".into(),
            region_id: None,
            zone_id: "cn-hangzhou-i".into(),
            vpc_id: "vpc-1".into(),
            vswitch_id: "vsw-1".into(),
            instance_class: None,
            dashboard_password: "Dash#123".into(),
            database_password: "Db#12345".into(),
            public_network_access_enabled: Some(true),
            client_token: Some("token-1".into()),
        }
    }

    #[test]
    fn test_security_ips_are_trimmed_and_filtered() {
        let request = ModifySecurityIpsRequest {
            project_id: "ra-supabase-1".into(),
            region_id: None,
            security_ip_list: "10.0.0.1, 10.0.0.2/24 ,,".into(),
        };

        assert_eq!(request.entries(), vec!["10.0.0.1", "10.0.0.2/24"]);
        assert_eq!(request.params()["IpWhitelist"], "10.0.0.1,10.0.0.2/24");
        assert_eq!(request.params()["ModifyMode"], "Cover");
    }

    #[test]
    fn test_empty_security_ip_list_is_rejected() {
        let request = ModifySecurityIpsRequest {
            project_id: "ra-supabase-1".into(),
            region_id: None,
            security_ip_list: " , ".into(),
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("security_ip_list"));
    }

    #[test]
    fn test_create_requires_vpc_id() {
        let mut request = create_request();
        assert!(request.validate().is_ok());

        request.vpc_id = "  ".into();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, PlatformError::Validation(ref m) if m.contains("vpc_id")));
    }

    #[test]
    fn test_create_params() {
        let params = create_request().params();
        assert_eq!(params["AppName"], "demo");
        assert_eq!(params["AppType"], "supabase");
        assert_eq!(params["InstanceClass"], DEFAULT_INSTANCE_CLASS);
        assert_eq!(params["PublicNetworkAccessEnabled"], "true");
        assert_eq!(params["ClientToken"], "token-1");
        assert!(!params.contains_key("RegionId"));
    }

    #[test]
    fn test_optional_params_are_omitted() {
        let params = ListProjectsRequest::default().params();
        assert_eq!(params.len(), 1);
        assert_eq!(params["AppType"], "supabase");

        assert!(DescribeVpcsRequest::default().params().is_empty());
    }
}
