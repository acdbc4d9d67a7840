//! Development branch endpoints

use reqwest::Method;
use serde_json::json;

use super::ManagementApi;
use crate::error::PlatformResult;
use crate::platform::{Branch, CreateBranchOptions, ResetBranchOptions};

impl ManagementApi {
    pub async fn list_branches(&self, project_id: &str) -> PlatformResult<Vec<Branch>> {
        self.get(
            &format!("/v1/projects/{}/branches", project_id),
            "Failed to list branches",
        )
        .await
    }

    pub async fn create_branch(&self, project_id: &str, options: CreateBranchOptions) -> PlatformResult<Branch> {
        self.post(
            &format!("/v1/projects/{}/branches", project_id),
            &json!({ "branch_name": options.name }),
            "Failed to create branch",
        )
        .await
    }

    pub async fn delete_branch(&self, branch_id: &str) -> PlatformResult<()> {
        let builder = self.request(Method::DELETE, &format!("/v1/branches/{}", branch_id))?;
        self.send(builder, "Failed to delete branch").await.map(drop)
    }

    pub async fn merge_branch(&self, branch_id: &str) -> PlatformResult<()> {
        self.post_action(
            &format!("/v1/branches/{}/merge", branch_id),
            Some(&json!({})),
            "Failed to merge branch",
        )
        .await
    }

    pub async fn reset_branch(&self, branch_id: &str, options: ResetBranchOptions) -> PlatformResult<()> {
        let body = match options.migration_version {
            Some(version) => json!({ "migration_version": version }),
            None => json!({}),
        };
        self.post_action(
            &format!("/v1/branches/{}/reset", branch_id),
            Some(&body),
            "Failed to reset branch",
        )
        .await
    }

    pub async fn rebase_branch(&self, branch_id: &str) -> PlatformResult<()> {
        self.post_action(
            &format!("/v1/branches/{}/push", branch_id),
            Some(&json!({})),
            "Failed to rebase branch",
        )
        .await
    }
}
