//! Configuration for the Supabase MCP server
//!
//! Values are layered lowest to highest:
//! 1. `~/.binks/supabase.toml` (or `SUPABASE_MCP_CONFIG_PATH`)
//! 2. Environment variables
//! 3. Command-line flags
//!
//! Credentials are kept as opaque strings here. The Aliyun pair is only split
//! when an Aliyun operation actually needs it, so Supabase-only sessions never
//! require an Aliyun token.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PlatformError, PlatformResult};
use crate::tools::FeatureGroup;

pub const SUPABASE_ACCESS_TOKEN_ENV: &str = "SUPABASE_ACCESS_TOKEN";
pub const ALIYUN_ACCESS_TOKEN_ENV: &str = "ALIYUN_ACCESS_TOKEN";
pub const DEFAULT_API_URL: &str = "https://api.supabase.com";
pub const DEFAULT_ALIYUN_REGION: &str = "cn-hangzhou";
pub const DEFAULT_FEATURES: &str = "aliyun";

// ============================================================================
// Command Line
// ============================================================================

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "supabase-mcp")]
#[command(version, about = "MCP server for Supabase and Aliyun-hosted Supabase project management")]
pub struct Args {
    /// Supabase personal access token for the Management API
    #[arg(long, env = SUPABASE_ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Aliyun access key pair as "accessKeyId|accessKeySecret"
    #[arg(long, env = ALIYUN_ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub aliyun_access_token: Option<String>,

    /// Scope every project tool to this project ref
    #[arg(long)]
    pub project_ref: Option<String>,

    /// Reject tools that modify resources
    #[arg(long)]
    pub read_only: bool,

    /// Management API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Comma-separated feature groups to enable
    #[arg(long, default_value = DEFAULT_FEATURES)]
    pub features: String,

    /// Default Aliyun region for operations that do not name one
    #[arg(long, env = "ALIYUN_REGION")]
    pub aliyun_region: Option<String>,

    /// Override the Aliyun RPC endpoint (scheme and host)
    #[arg(long, env = "ALIYUN_ENDPOINT")]
    pub aliyun_endpoint: Option<String>,

    /// Default base URL for the /pg/query tools
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Default service role key for the /pg/query tools
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub service_role_key: Option<String>,
}

// ============================================================================
// Config File
// ============================================================================

/// Settings read from the optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub aliyun: AliyunConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Upper bound for every outbound request, in seconds
    /// Default: 30
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AliyunConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Clone, Default, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub service_role_key: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_region() -> String {
    DEFAULT_ALIYUN_REGION.to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for AliyunConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
        }
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("url", &self.url)
            .field("service_role_key", &redacted(&self.service_role_key))
            .finish()
    }
}

impl FileConfig {
    /// Load configuration from file, falling back to defaults when absent
    ///
    /// Looks for config in:
    /// 1. `SUPABASE_MCP_CONFIG_PATH` environment variable
    /// 2. `~/.binks/supabase.toml`
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SUPABASE_MCP_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".binks").join("supabase.toml"))
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Aliyun access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct AliyunCredential {
    pub access_key_id: String,
    access_key_secret: String,
}

impl AliyunCredential {
    /// Split an `accessKeyId|accessKeySecret` token
    ///
    /// Exactly one `|` and two non-empty halves are required.
    pub fn parse(token: &str) -> PlatformResult<Self> {
        let mut parts = token.split('|');
        let (Some(id), Some(secret), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(PlatformError::Config(format!(
                "{} must have the form 'accessKeyId|accessKeySecret' with exactly one '|'",
                ALIYUN_ACCESS_TOKEN_ENV
            )));
        };

        let (id, secret) = (id.trim(), secret.trim());
        if id.is_empty() || secret.is_empty() {
            return Err(PlatformError::Config(format!(
                "{} has an empty access key id or secret",
                ALIYUN_ACCESS_TOKEN_ENV
            )));
        }

        Ok(Self {
            access_key_id: id.to_string(),
            access_key_secret: secret.to_string(),
        })
    }

    pub fn secret(&self) -> &str {
        &self.access_key_secret
    }
}

impl fmt::Debug for AliyunCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliyunCredential")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

// ============================================================================
// Resolved Options
// ============================================================================

/// Everything the platform adapter needs to reach its backends
#[derive(Clone)]
pub struct PlatformOptions {
    pub access_token: Option<String>,
    pub api_url: String,
    pub aliyun_access_token: Option<String>,
    pub aliyun_region: String,
    pub aliyun_endpoint: Option<String>,
    pub timeout: Duration,
}

impl PlatformOptions {
    /// Build options from a management token and optional API base URL
    pub fn new(access_token: Option<String>, api_url: Option<String>) -> Self {
        Self {
            access_token,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            aliyun_access_token: None,
            aliyun_region: default_region(),
            aliyun_endpoint: None,
            timeout: Duration::from_secs(default_timeout()),
        }
    }

    /// Parse the Aliyun credential on demand
    ///
    /// Fails with a [`PlatformError::Config`] naming the environment variable
    /// when no token was supplied.
    pub fn aliyun_credential(&self) -> PlatformResult<AliyunCredential> {
        let token = self.aliyun_access_token.as_deref().ok_or_else(|| {
            PlatformError::Config(format!(
                "{} is not set; Aliyun operations need an 'accessKeyId|accessKeySecret' token",
                ALIYUN_ACCESS_TOKEN_ENV
            ))
        })?;
        AliyunCredential::parse(token)
    }

    /// Pick the caller's region, or the configured default
    pub fn region<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(region) if !region.is_empty() => region,
            _ => &self.aliyun_region,
        }
    }
}

impl fmt::Debug for PlatformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformOptions")
            .field("access_token", &redacted(&self.access_token))
            .field("api_url", &self.api_url)
            .field("aliyun_access_token", &redacted(&self.aliyun_access_token))
            .field("aliyun_region", &self.aliyun_region)
            .field("aliyun_endpoint", &self.aliyun_endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Defaults for the `/pg/query` tools
#[derive(Clone, Default)]
pub struct QueryOptions {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("url", &self.url)
            .field("service_role_key", &redacted(&self.service_role_key))
            .finish()
    }
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub features: Vec<FeatureGroup>,
    pub read_only: bool,
    pub project_ref: Option<String>,
    pub platform: PlatformOptions,
    pub query: QueryOptions,
}

impl ServerConfig {
    /// Merge command-line/environment values over the file config
    pub fn resolve(args: Args, file: FileConfig) -> Self {
        let platform = PlatformOptions {
            aliyun_access_token: args.aliyun_access_token,
            aliyun_region: args.aliyun_region.unwrap_or(file.aliyun.region),
            aliyun_endpoint: args.aliyun_endpoint.or(file.aliyun.endpoint),
            timeout: Duration::from_secs(file.http.timeout_secs),
            ..PlatformOptions::new(args.access_token, args.api_url)
        };

        Self {
            features: FeatureGroup::parse_list(&args.features),
            read_only: args.read_only,
            project_ref: args.project_ref,
            platform,
            query: QueryOptions {
                url: args.supabase_url.or(file.query.url),
                service_role_key: args.service_role_key.or(file.query.service_role_key),
            },
        }
    }

    /// Fail fast when a Management API feature group has no token
    ///
    /// Aliyun credentials are deliberately not checked here; they are
    /// resolved when the first Aliyun operation runs.
    pub fn check_credentials(&self) -> PlatformResult<()> {
        let needs_management: Vec<&str> = self
            .features
            .iter()
            .filter(|f| f.uses_management_api())
            .map(|f| f.as_str())
            .collect();

        if !needs_management.is_empty() && self.platform.access_token.is_none() {
            return Err(PlatformError::Config(format!(
                "{} is required for features: {}",
                SUPABASE_ACCESS_TOKEN_ENV,
                needs_management.join(", ")
            )));
        }
        Ok(())
    }
}
