//! Edge function listing, retrieval and deployment
//!
//! Function bodies travel as `multipart/form-data` in both directions:
//! retrieval demultiplexes the response with `multer`, deployment builds a
//! `reqwest` multipart form.

use multer::Multipart;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use super::paths::{deployment_prefix, relative_path};
use super::ManagementApi;
use crate::error::{PlatformError, PlatformResult};
use crate::platform::{DeployEdgeFunctionOptions, EdgeFunction, EdgeFunctionFile, EdgeFunctionWithBody};

const FETCH_CONTEXT: &str = "Failed to fetch Edge Function";
const DEPLOY_CONTEXT: &str = "Failed to deploy Edge Function";

/// File names picked up as the import map when none is given
const IMPORT_MAP_CANDIDATES: [&str; 2] = ["deno.json", "import_map.json"];

impl ManagementApi {
    pub async fn list_edge_functions(&self, project_id: &str) -> PlatformResult<Vec<EdgeFunction>> {
        self.get(
            &format!("/v1/projects/{}/functions", project_id),
            "Failed to fetch Edge Functions",
        )
        .await
    }

    pub async fn get_edge_function(&self, project_id: &str, slug: &str) -> PlatformResult<EdgeFunctionWithBody> {
        let path = format!("/v1/projects/{}/functions/{}", project_id, slug);
        let mut function: EdgeFunction = self.get(&path, FETCH_CONTEXT).await?;

        let builder = self
            .request(Method::GET, &format!("{}/body", path))?
            .header(ACCEPT, "multipart/form-data");
        let response = self.send(builder, FETCH_CONTEXT).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let boundary = multer::parse_boundary(&content_type)
            .map_err(|e| PlatformError::upstream(FETCH_CONTEXT, None, format!("invalid multipart body: {}", e)))?;

        let prefix = deployment_prefix(project_id, &function.id, function.version);
        let mut multipart = Multipart::new(response.bytes_stream(), boundary);
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| PlatformError::upstream(FETCH_CONTEXT, None, e.to_string()))?
        {
            // Metadata parts carry no filename
            let Some(name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let content = field
                .text()
                .await
                .map_err(|e| PlatformError::upstream(FETCH_CONTEXT, None, e.to_string()))?;

            files.push(EdgeFunctionFile {
                name: relative_path(&prefix, &name),
                content,
            });
        }
        debug!(slug, files = files.len(), "fetched edge function body");

        function.entrypoint_path = function.entrypoint_path.map(|p| relative_path(&prefix, &p));
        function.import_map_path = function.import_map_path.map(|p| relative_path(&prefix, &p));

        Ok(EdgeFunctionWithBody { function, files })
    }

    pub async fn deploy_edge_function(
        &self,
        project_id: &str,
        options: DeployEdgeFunctionOptions,
    ) -> PlatformResult<EdgeFunction> {
        let import_map_path = options.import_map_path.or_else(|| {
            options
                .files
                .iter()
                .find(|f| IMPORT_MAP_CANDIDATES.contains(&f.name.as_str()))
                .map(|f| f.name.clone())
        });

        let mut metadata = json!({
            "name": &options.name,
            "entrypoint_path": options.entrypoint_path,
        });
        if let Some(import_map_path) = import_map_path {
            metadata["import_map_path"] = json!(import_map_path);
        }

        let mut form = Form::new().part("metadata", Part::text(metadata.to_string()));
        for file in options.files {
            form = form.part("file", Part::text(file.content).file_name(file.name));
        }

        let builder = self
            .request(
                Method::POST,
                &format!("/v1/projects/{}/functions/deploy", project_id),
            )?
            .query(&[("slug", options.name.as_str())])
            .multipart(form);
        self.json(builder, DEPLOY_CONTEXT).await
    }
}
