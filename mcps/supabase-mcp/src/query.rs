//! Direct SQL over a project's `/pg/query` endpoint
//!
//! Used by the Aliyun `execute_sql` and `list_table` tools. The SQL text is
//! sent as a JSON string, so quoting inside the statement needs no special
//! handling on this side.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::instrument;

use crate::config::QueryOptions;
use crate::error::{PlatformError, PlatformResult};

const CONTEXT: &str = "Failed to execute SQL query";

/// Base URL plus service role key for one call
#[derive(Clone)]
pub struct QueryTarget {
    pub url: String,
    service_role_key: String,
}

impl std::fmt::Debug for QueryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryTarget")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

pub struct PgQueryClient {
    http: Client,
    defaults: QueryOptions,
}

impl PgQueryClient {
    pub fn new(http: Client, defaults: QueryOptions) -> Self {
        Self { http, defaults }
    }

    /// Resolve per-call overrides against the configured defaults
    pub fn target(&self, url: Option<String>, service_role_key: Option<String>) -> PlatformResult<QueryTarget> {
        let url = non_empty(url)
            .or_else(|| non_empty(self.defaults.url.clone()))
            .ok_or_else(|| PlatformError::missing_field("supabase_url"))?;
        let service_role_key = non_empty(service_role_key)
            .or_else(|| non_empty(self.defaults.service_role_key.clone()))
            .ok_or_else(|| PlatformError::missing_field("service_role_key"))?;

        Ok(QueryTarget {
            url: url.trim_end_matches('/').to_string(),
            service_role_key,
        })
    }

    #[instrument(level = "debug", skip(self, sql), fields(url = %target.url))]
    pub async fn query(&self, target: &QueryTarget, sql: &str) -> PlatformResult<Value> {
        let response = self
            .http
            .post(format!("{}/pg/query", target.url))
            .header("apikey", &target.service_role_key)
            .json(&json!({ "query": sql }))
            .send()
            .await
            .map_err(|e| PlatformError::upstream(CONTEXT, None, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::upstream(CONTEXT, Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| text.trim().to_string());
            return Err(PlatformError::upstream(CONTEXT, Some(status.as_u16()), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// List tables and views in `schemas`
    pub async fn list_tables(&self, target: &QueryTarget, schemas: &[String]) -> PlatformResult<Value> {
        self.query(target, &list_tables_sql(schemas)).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Quote a value as a SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn list_tables_sql(schemas: &[String]) -> String {
    let schemas = if schemas.is_empty() {
        quote_literal("public")
    } else {
        schemas
            .iter()
            .map(|s| quote_literal(s))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "SELECT table_schema AS schema, table_name AS name, table_type AS type \
         FROM information_schema.tables \
         WHERE table_schema IN ({}) \
         ORDER BY table_schema, table_name",
        schemas
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(defaults: QueryOptions) -> PgQueryClient {
        PgQueryClient::new(Client::new(), defaults)
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("public"), "'public'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_list_tables_sql() {
        let sql = list_tables_sql(&["public".into(), "x'); drop".into()]);
        assert!(sql.contains("IN ('public', 'x''); drop')"));
        assert!(list_tables_sql(&[]).contains("IN ('public')"));
    }

    #[test]
    fn test_target_prefers_call_arguments() {
        let client = client(QueryOptions {
            url: Some("https://default.example".into()),
            service_role_key: Some("default-key".into()),
        });

        let target = client
            .target(Some("https://abc.example/".into()), None)
            .unwrap();
        assert_eq!(target.url, "https://abc.example");
        assert_eq!(target.service_role_key, "default-key");
    }

    #[test]
    fn test_target_requires_url_and_key() {
        let client = client(QueryOptions::default());

        let err = client.target(None, Some("key".into())).unwrap_err();
        assert!(err.to_string().contains("supabase_url"));

        let err = client.target(Some("https://abc.example".into()), Some(" ".into())).unwrap_err();
        assert!(err.to_string().contains("service_role_key"));
    }
}
