//! Data types exchanged with the Supabase Management API

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Account
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_release_channels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub organization_id: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProjectOptions {
    pub name: String,
    pub organization_id: String,
    pub region: Option<String>,
    pub db_pass: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub name: String,
    pub api_key: String,
}

// ============================================================================
// Database
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExecuteSqlOptions {
    pub query: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Migration {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyMigrationOptions {
    pub name: String,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct GetLogsOptions {
    pub sql: String,
    pub iso_timestamp_start: Option<String>,
    pub iso_timestamp_end: Option<String>,
}

// ============================================================================
// Edge Functions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeFunction {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_jwt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_map: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_map_path: Option<String>,
}

/// A single source file of an edge function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeFunctionFile {
    /// Path relative to the function root, e.g. "index.ts"
    pub name: String,
    /// File contents
    pub content: String,
}

/// Function metadata plus its source files, with paths relative to the function root
#[derive(Debug, Clone, Serialize)]
pub struct EdgeFunctionWithBody {
    #[serde(flatten)]
    pub function: EdgeFunction,
    pub files: Vec<EdgeFunctionFile>,
}

#[derive(Debug, Clone)]
pub struct DeployEdgeFunctionOptions {
    pub name: String,
    pub entrypoint_path: String,
    pub import_map_path: Option<String>,
    pub files: Vec<EdgeFunctionFile>,
}

// ============================================================================
// Branching
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_project_ref: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateBranchOptions {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResetBranchOptions {
    pub migration_version: Option<String>,
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBucket {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Maximum upload size in bytes
    pub file_size_limit: u64,
    pub features: StorageFeatures,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageFeatures {
    pub image_transformation: FeatureToggle,
    pub s3_protocol: FeatureToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureToggle {
    pub enabled: bool,
}
