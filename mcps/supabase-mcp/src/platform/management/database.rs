//! Database, migration, log and advisor endpoints

use reqwest::Method;
use serde_json::{json, Value};

use super::ManagementApi;
use crate::error::PlatformResult;
use crate::platform::{ApplyMigrationOptions, ExecuteSqlOptions, GetLogsOptions, Migration};

impl ManagementApi {
    pub async fn execute_sql(&self, project_id: &str, options: ExecuteSqlOptions) -> PlatformResult<Value> {
        let body = json!({
            "query": options.query,
            "read_only": options.read_only,
        });
        self.post(
            &format!("/v1/projects/{}/database/query", project_id),
            &body,
            "Failed to execute SQL query",
        )
        .await
    }

    pub async fn list_migrations(&self, project_id: &str) -> PlatformResult<Vec<Migration>> {
        self.get(
            &format!("/v1/projects/{}/database/migrations", project_id),
            "Failed to fetch migrations",
        )
        .await
    }

    pub async fn apply_migration(
        &self,
        project_id: &str,
        options: ApplyMigrationOptions,
    ) -> PlatformResult<Value> {
        self.post(
            &format!("/v1/projects/{}/database/migrations", project_id),
            &options,
            "Failed to apply migration",
        )
        .await
    }

    pub async fn get_logs(&self, project_id: &str, options: GetLogsOptions) -> PlatformResult<Value> {
        let mut query = vec![("sql", options.sql)];
        if let Some(start) = options.iso_timestamp_start {
            query.push(("iso_timestamp_start", start));
        }
        if let Some(end) = options.iso_timestamp_end {
            query.push(("iso_timestamp_end", end));
        }

        let builder = self
            .request(
                Method::GET,
                &format!("/v1/projects/{}/analytics/endpoints/logs.all", project_id),
            )?
            .query(&query);
        self.json(builder, "Failed to fetch logs").await
    }

    pub async fn get_security_advisors(&self, project_id: &str) -> PlatformResult<Value> {
        self.get(
            &format!("/v1/projects/{}/advisors/security", project_id),
            "Failed to fetch security advisors",
        )
        .await
    }

    pub async fn get_performance_advisors(&self, project_id: &str) -> PlatformResult<Value> {
        self.get(
            &format!("/v1/projects/{}/advisors/performance", project_id),
            "Failed to fetch performance advisors",
        )
        .await
    }
}
