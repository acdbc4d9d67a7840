use reqwest::Method;

use super::ManagementApi;
use crate::error::PlatformResult;
use crate::platform::{StorageBucket, StorageConfig};

impl ManagementApi {
    pub async fn list_storage_buckets(&self, project_id: &str) -> PlatformResult<Vec<StorageBucket>> {
        self.get(
            &format!("/v1/projects/{}/storage/buckets", project_id),
            "Failed to list storage buckets",
        )
        .await
    }

    pub async fn get_storage_config(&self, project_id: &str) -> PlatformResult<StorageConfig> {
        self.get(
            &format!("/v1/projects/{}/config/storage", project_id),
            "Failed to get storage config",
        )
        .await
    }

    pub async fn update_storage_config(&self, project_id: &str, config: StorageConfig) -> PlatformResult<()> {
        let builder = self
            .request(Method::PATCH, &format!("/v1/projects/{}/config/storage", project_id))?
            .json(&config);
        self.send(builder, "Failed to update storage config").await.map(drop)
    }
}
