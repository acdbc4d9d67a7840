//! Aliyun response shapes
//!
//! `Raw*` types mirror the PascalCase RPC bodies. The public types are what
//! tools return, serialized in camelCase.

use serde::{Deserialize, Serialize};

// ============================================================================
// Normalized Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliyunProject {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vswitch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_instance_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_connection_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_connection_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliyunProjectList {
    pub projects: Vec<AliyunProject>,
    pub total_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

/// Outcome of a mutating RPC
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub zone_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub vpc_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VSwitch {
    pub vswitch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vswitch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_ip_count: Option<u64>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    pub anon_key: String,
    /// Null when the instance reports no service key
    pub service_role_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAccount {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}

// ============================================================================
// Raw RPC Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawAppInstance {
    pub instance_name: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub instance_class: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default, rename = "VSwitchId")]
    pub vswitch_id: Option<String>,
    #[serde(default, rename = "DBInstanceName")]
    pub db_instance_name: Option<String>,
    #[serde(default)]
    pub public_connection_string: Option<String>,
    #[serde(default)]
    pub vpc_connection_string: Option<String>,
    #[serde(default)]
    pub dashboard_username: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl From<RawAppInstance> for AliyunProject {
    fn from(raw: RawAppInstance) -> Self {
        Self {
            project_id: raw.instance_name,
            project_name: raw.app_name,
            status: raw.status,
            region_id: raw.region_id,
            zone_id: raw.zone_id,
            instance_class: raw.instance_class,
            vpc_id: raw.vpc_id,
            vswitch_id: raw.vswitch_id,
            db_instance_name: raw.db_instance_name,
            public_connection_string: raw.public_connection_string,
            vpc_connection_string: raw.vpc_connection_string,
            created_at: raw.create_time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawAppInstanceList {
    #[serde(default)]
    pub instances: Vec<RawAppInstance>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub page_number: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl From<RawAppInstanceList> for AliyunProjectList {
    fn from(raw: RawAppInstanceList) -> Self {
        let projects: Vec<AliyunProject> = raw.instances.into_iter().map(Into::into).collect();
        Self {
            total_count: raw.total_count.unwrap_or(projects.len() as u64),
            projects,
            page_number: raw.page_number,
            page_size: raw.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawOperation {
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl From<RawOperation> for OperationResult {
    fn from(raw: RawOperation) -> Self {
        Self {
            project_id: raw.instance_name,
            request_id: raw.request_id,
            order_id: raw.order_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawRegions {
    pub regions: RawRegionRows,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRegionRows {
    #[serde(rename = "RDSRegion", default)]
    pub rows: Vec<RawRegionRow>,
}

/// One row per (region, zone) pair
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawRegionRow {
    pub region_id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
}

/// Fold per-zone rows into one entry per region, keeping first-seen order
pub(crate) fn group_regions(rows: Vec<RawRegionRow>) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::new();
    for row in rows {
        let index = match regions.iter().position(|r| r.region_id == row.region_id) {
            Some(index) => index,
            None => {
                regions.push(Region {
                    region_id: row.region_id.clone(),
                    local_name: row.local_name.clone(),
                    zones: Vec::new(),
                });
                regions.len() - 1
            }
        };

        let region = &mut regions[index];
        if region.local_name.is_none() {
            region.local_name = row.local_name;
        }
        if let Some(zone_id) = row.zone_id {
            if !region.zones.iter().any(|z| z.zone_id == zone_id) {
                region.zones.push(Zone {
                    zone_id,
                    zone_name: row.zone_name,
                });
            }
        }
    }
    regions
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawVpcs {
    pub vpcs: RawVpcItems,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVpcItems {
    #[serde(rename = "VpcItem", default)]
    pub items: Vec<RawVpc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawVpc {
    pub vpc_id: String,
    #[serde(default)]
    pub vpc_name: Option<String>,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<RawVpc> for Vpc {
    fn from(raw: RawVpc) -> Self {
        Self {
            vpc_id: raw.vpc_id,
            vpc_name: raw.vpc_name,
            cidr_block: raw.cidr_block,
            region_id: raw.region_id,
            is_default: raw.is_default,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVSwitches {
    #[serde(rename = "VSwitches")]
    pub vswitches: RawVSwitchItems,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVSwitchItems {
    #[serde(rename = "VSwitch", default)]
    pub items: Vec<RawVSwitch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawVSwitch {
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    #[serde(default, rename = "VSwitchName")]
    pub vswitch_name: Option<String>,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub iz_no: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub available_ip_address_count: Option<u64>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<RawVSwitch> for VSwitch {
    fn from(raw: RawVSwitch) -> Self {
        Self {
            vswitch_id: raw.vswitch_id,
            vswitch_name: raw.vswitch_name,
            cidr_block: raw.cidr_block,
            zone_id: raw.iz_no,
            status: raw.status,
            available_ip_count: raw.available_ip_address_count,
            is_default: raw.is_default,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawAuthInfo {
    #[serde(default)]
    pub api_keys: Option<RawApiKeys>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawApiKeys {
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub service_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_regions_folds_zone_rows() {
        let raw: RawRegions = serde_json::from_value(json!({
            "Regions": {"RDSRegion": [
                {"RegionId": "cn-hangzhou", "ZoneId": "cn-hangzhou-h", "LocalName": "华东1（杭州）", "ZoneName": "Hangzhou H"},
                {"RegionId": "cn-beijing", "ZoneId": "cn-beijing-a", "LocalName": "华北2（北京）"},
                {"RegionId": "cn-hangzhou", "ZoneId": "cn-hangzhou-i"},
                {"RegionId": "cn-hangzhou", "ZoneId": "cn-hangzhou-i"}
            ]}
        }))
        .unwrap();

        let regions = group_regions(raw.regions.rows);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region_id, "cn-hangzhou");
        assert_eq!(regions[0].zones.len(), 2);
        assert_eq!(regions[0].zones[0].zone_name.as_deref(), Some("Hangzhou H"));
        assert_eq!(regions[1].zones[0].zone_id, "cn-beijing-a");
    }

    #[test]
    fn test_app_instance_normalizes_to_camel_case() {
        let raw: RawAppInstance = serde_json::from_value(json!({
            "InstanceName": "ra-supabase-8moov5lxba****",
            "AppName": "demo",
            "Status": "Running",
            "VSwitchId": "vsw-1",
            "DBInstanceName": "pgm-1"
        }))
        .unwrap();

        let value = serde_json::to_value(AliyunProject::from(raw)).unwrap();
        assert_eq!(value["projectId"], "ra-supabase-8moov5lxba****");
        assert_eq!(value["projectName"], "demo");
        assert_eq!(value["vswitchId"], "vsw-1");
        assert_eq!(value["dbInstanceName"], "pgm-1");
        assert!(value.get("zoneId").is_none());
    }

    #[test]
    fn test_project_list_total_defaults_to_len() {
        let raw: RawAppInstanceList = serde_json::from_value(json!({
            "Instances": [{"InstanceName": "a"}, {"InstanceName": "b"}]
        }))
        .unwrap();
        let list = AliyunProjectList::from(raw);
        assert_eq!(list.total_count, 2);
    }
}
