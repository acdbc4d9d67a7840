//! Organizations, projects, and project-level development endpoints

use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use super::ManagementApi;
use crate::error::{PlatformError, PlatformResult};
use crate::platform::{ApiKey, CreateProjectOptions, Organization, Project};

const DEFAULT_PROJECT_REGION: &str = "us-east-1";

impl ManagementApi {
    pub async fn list_organizations(&self) -> PlatformResult<Vec<Organization>> {
        self.get("/v1/organizations", "Failed to fetch organizations").await
    }

    pub async fn get_organization(&self, slug: &str) -> PlatformResult<Organization> {
        self.get(&format!("/v1/organizations/{}", slug), "Failed to fetch organization")
            .await
    }

    pub async fn list_projects(&self) -> PlatformResult<Vec<Project>> {
        self.get("/v1/projects", "Failed to fetch projects").await
    }

    pub async fn get_project(&self, project_id: &str) -> PlatformResult<Project> {
        self.get(&format!("/v1/projects/{}", project_id), "Failed to fetch project")
            .await
    }

    pub async fn create_project(&self, options: CreateProjectOptions) -> PlatformResult<Project> {
        // The API requires a database password
        let db_pass = options
            .db_pass
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let body = json!({
            "name": options.name,
            "organization_id": options.organization_id,
            "region": options.region.as_deref().unwrap_or(DEFAULT_PROJECT_REGION),
            "db_pass": db_pass,
        });
        self.post("/v1/projects", &body, "Failed to create project").await
    }

    pub async fn pause_project(&self, project_id: &str) -> PlatformResult<()> {
        self.post_action(
            &format!("/v1/projects/{}/pause", project_id),
            None,
            "Failed to pause project",
        )
        .await
    }

    pub async fn restore_project(&self, project_id: &str) -> PlatformResult<()> {
        self.post_action(
            &format!("/v1/projects/{}/restore", project_id),
            None,
            "Failed to restore project",
        )
        .await
    }

    pub fn project_url(&self, project_id: &str) -> PlatformResult<String> {
        let url = Url::parse(self.base_url())
            .map_err(|e| PlatformError::Config(format!("invalid API URL {}: {}", self.base_url(), e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| PlatformError::Config(format!("API URL {} has no host", self.base_url())))?;

        Ok(format!("https://{}.{}", project_id, project_domain(host)))
    }

    pub async fn get_anon_key(&self, project_id: &str) -> PlatformResult<String> {
        let keys: Vec<ApiKey> = self
            .get(
                &format!("/v1/projects/{}/api-keys", project_id),
                "Failed to fetch API keys",
            )
            .await?;

        keys.into_iter()
            .find(|key| key.name == "anon")
            .map(|key| key.api_key)
            .ok_or_else(|| PlatformError::NotFound("anon key".to_string()))
    }

    pub async fn generate_typescript_types(&self, project_id: &str) -> PlatformResult<Value> {
        self.get(
            &format!("/v1/projects/{}/types/typescript", project_id),
            "Failed to fetch TypeScript types",
        )
        .await
    }
}

/// Map the Management API host to the domain projects are served from
fn project_domain(api_host: &str) -> &str {
    match api_host {
        "api.supabase.com" => "supabase.co",
        "api.supabase.green" => "supabase.green",
        other => other.strip_prefix("api.").unwrap_or(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_domain() {
        assert_eq!(project_domain("api.supabase.com"), "supabase.co");
        assert_eq!(project_domain("api.supabase.green"), "supabase.green");
        assert_eq!(project_domain("api.example.dev"), "example.dev");
        assert_eq!(project_domain("localhost"), "localhost");
    }
}
