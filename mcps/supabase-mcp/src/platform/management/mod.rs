//! Supabase Management API backend
//!
//! Thin REST client: one method per endpoint, each tagged with the failure
//! context that prefixes upstream error messages.

mod account;
mod branches;
mod database;
mod functions;
pub mod paths;
mod storage;

use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::UserAgent;
use crate::config::{PlatformOptions, SUPABASE_ACCESS_TOKEN_ENV};
use crate::error::{PlatformError, PlatformResult};

/// REST client for `https://api.supabase.com` (or a configured base URL)
pub struct ManagementApi {
    http: Client,
    base_url: String,
    access_token: Option<String>,
    user_agent: Arc<UserAgent>,
}

impl ManagementApi {
    pub fn new(http: Client, options: &PlatformOptions, user_agent: Arc<UserAgent>) -> Self {
        Self {
            http,
            base_url: options.api_url.trim_end_matches('/').to_string(),
            access_token: options.access_token.clone(),
            user_agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> PlatformResult<RequestBuilder> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            PlatformError::Config(format!("{} is not set", SUPABASE_ACCESS_TOKEN_ENV))
        })?;

        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(USER_AGENT, self.user_agent.current()))
    }

    /// Send a request, turning transport failures and non-2xx answers into
    /// [`PlatformError::Upstream`] tagged with `context`
    async fn send(&self, builder: RequestBuilder, context: &str) -> PlatformResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PlatformError::upstream(context, None, e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Management API response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(PlatformError::upstream(
            context,
            Some(status.as_u16()),
            error_message(&body, status.canonical_reason()),
        ))
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder, context: &str) -> PlatformResult<T> {
        let response = self.send(builder, context).await?;
        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::upstream(context, None, e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, context: &str) -> PlatformResult<T> {
        let builder = self.request(Method::GET, path)?;
        self.json(builder, context).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> PlatformResult<T> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.json(builder, context).await
    }

    /// POST whose response body is ignored
    async fn post_action(&self, path: &str, body: Option<&Value>, context: &str) -> PlatformResult<()> {
        let mut builder = self.request(Method::POST, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, context).await.map(drop)
    }
}

/// Pick the `message` field of a JSON error body, else the raw text
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("empty response").to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Project not found"}"#, Some("Not Found")),
            "Project not found"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_text() {
        assert_eq!(error_message("upstream exploded", None), "upstream exploded");
        assert_eq!(error_message(r#"{"error":"x"}"#, None), r#"{"error":"x"}"#);
        assert_eq!(error_message("", Some("Bad Gateway")), "Bad Gateway");
    }
}
