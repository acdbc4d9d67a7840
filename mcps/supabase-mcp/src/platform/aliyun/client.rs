//! Region-scoped Aliyun RPC client

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use super::signature::{authorization, canonical_query, canonical_request, sha256_hex, sign};
use crate::config::AliyunCredential;
use crate::error::{PlatformError, PlatformResult};

/// Aliyun products this server talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// RDS AI application service, which hosts the Supabase instances
    RdsAi,
    /// Classic RDS, used for region and network discovery
    Rds,
}

impl Product {
    pub fn version(self) -> &'static str {
        match self {
            Self::RdsAi => "2025-05-07",
            Self::Rds => "2014-08-15",
        }
    }

    fn host_prefix(self) -> &'static str {
        match self {
            Self::RdsAi => "rdsai",
            Self::Rds => "rds",
        }
    }

    pub fn default_endpoint(self, region: &str) -> String {
        format!("https://{}.{}.aliyuncs.com", self.host_prefix(), region)
    }
}

/// One RPC action plus the context used when it fails
#[derive(Debug, Clone, Copy)]
pub struct RpcAction {
    pub product: Product,
    pub name: &'static str,
    pub context: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RpcErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Signs and sends RPC calls for a single region
pub struct RpcClient {
    http: Client,
    credential: AliyunCredential,
    region: String,
    endpoint: Option<Url>,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("credential", &self.credential)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RpcClient {
    pub fn new(
        http: Client,
        credential: AliyunCredential,
        region: &str,
        endpoint: Option<&str>,
    ) -> PlatformResult<Self> {
        let endpoint = endpoint
            .map(|e| {
                Url::parse(e).map_err(|err| PlatformError::Config(format!("invalid Aliyun endpoint {}: {}", e, err)))
            })
            .transpose()?;

        Ok(Self {
            http,
            credential,
            region: region.to_string(),
            endpoint,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn base_url(&self, product: Product) -> PlatformResult<Url> {
        match &self.endpoint {
            Some(url) => Ok(url.clone()),
            None => {
                let endpoint = product.default_endpoint(&self.region);
                Url::parse(&endpoint)
                    .map_err(|e| PlatformError::Config(format!("invalid Aliyun endpoint {}: {}", endpoint, e)))
            }
        }
    }

    /// Invoke `action` with `params` and return the decoded response body
    ///
    /// Parameters travel in the query string; the body is empty.
    #[instrument(level = "debug", skip(self, params, user_agent), fields(region = %self.region, action = action.name))]
    pub async fn call(
        &self,
        action: RpcAction,
        params: &BTreeMap<String, String>,
        user_agent: &str,
    ) -> PlatformResult<Value> {
        let base = self.base_url(action.product)?;
        let host = match (base.host_str(), base.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(PlatformError::Config(format!("Aliyun endpoint {} has no host", base))),
        };

        let query = canonical_query(params);
        let payload_hash = sha256_hex(b"");

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), host);
        headers.insert("x-acs-action".to_string(), action.name.to_string());
        headers.insert("x-acs-content-sha256".to_string(), payload_hash.clone());
        headers.insert(
            "x-acs-date".to_string(),
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        );
        headers.insert("x-acs-signature-nonce".to_string(), Uuid::new_v4().to_string());
        headers.insert("x-acs-version".to_string(), action.product.version().to_string());

        let (canonical, signed_headers) = canonical_request("POST", "/", &query, &headers, &payload_hash);
        let signature = sign(self.credential.secret(), &canonical)?;

        let origin = base.as_str().trim_end_matches('/');
        let url = if query.is_empty() {
            format!("{}/", origin)
        } else {
            format!("{}/?{}", origin, query)
        };

        let mut request = self
            .http
            .post(url)
            .header(
                AUTHORIZATION,
                authorization(&self.credential.access_key_id, &signed_headers, &signature),
            )
            .header(USER_AGENT, user_agent);
        for (name, value) in headers.iter().filter(|(name, _)| name.as_str() != "host") {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::upstream(action.context, None, e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::upstream(action.context, Some(status.as_u16()), e.to_string()))?;
        debug!(status = status.as_u16(), "Aliyun RPC response");

        if !status.is_success() {
            return Err(PlatformError::upstream(
                action.context,
                Some(status.as_u16()),
                rpc_error_message(&text),
            ));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// `"{Code}: {Message}"` from an RPC error body, else the raw text
fn rpc_error_message(body: &str) -> String {
    match serde_json::from_str::<RpcErrorBody>(body) {
        Ok(RpcErrorBody {
            code: Some(code),
            message: Some(message),
        }) => format!("{}: {}", code, message),
        Ok(RpcErrorBody {
            code: Some(text), ..
        })
        | Ok(RpcErrorBody {
            message: Some(text), ..
        }) => text,
        _ => body.trim().to_string(),
    }
}
