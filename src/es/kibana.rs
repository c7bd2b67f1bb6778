use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Kibana rejects mutating requests without this header
const XSRF_HEADER: &str = "kbn-xsrf";
const XSRF_VALUE: &str = "reporting";

/// Ping attempts before giving up on a starting Kibana
const MAX_PING_FAILURES: u32 = 10;
const PING_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Thin client for the Kibana data-view and saved-objects APIs
pub struct KibanaClient {
    client: Client,
    base_url: String,
}

impl KibanaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/api/data_views/default", self.base_url);
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Block until Kibana answers; it boots noticeably slower than
    /// Elasticsearch, so the first pings tend to fail
    pub async fn wait_until_ready(&self) -> Result<()> {
        let mut failures = 0;
        while !self.ping().await {
            failures += 1;
            if failures >= MAX_PING_FAILURES {
                anyhow::bail!(
                    "Unable to connect to Kibana {} after {} retries",
                    self.base_url,
                    failures
                );
            }
            warn!("Unable to ping Kibana host {}", self.base_url);
            tokio::time::sleep(PING_RETRY_DELAY).await;
        }
        Ok(())
    }

    /// Kibana version, needed to address the per-version config object
    async fn version(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .context("Failed to query Kibana status")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Kibana error: {} - {}", status, body);
        }
        let status: StatusResponse = response
            .json()
            .await
            .context("Failed to parse Kibana status response")?;
        Ok(status.version.number)
    }

    /// Create a data view for the given index. An existing one with the
    /// same id is left untouched.
    pub async fn create_index_pattern(&self, title: &str) -> Result<()> {
        let body = json!({
            "override": false,
            "refresh_fields": true,
            "index_pattern": {
                "title": title,
                "id": title,
            }
        });
        let response = self
            .client
            .post(format!("{}/api/index_patterns/index_pattern", self.base_url))
            .header(XSRF_HEADER, XSRF_VALUE)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to create index pattern {title}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if body.contains("Duplicate index pattern") {
                debug!("index pattern {} already exists", title);
                return Ok(());
            }
            anyhow::bail!("Kibana error: {} - {}", status, body);
        }
        debug!("created index pattern {}", title);
        Ok(())
    }

    /// Delete a data view. A missing one is not an error.
    pub async fn delete_index_pattern(&self, title: &str) -> Result<()> {
        let url = format!("{}/api/index_patterns/index_pattern/{}", self.base_url, title);
        let response = self
            .client
            .delete(url)
            .header(XSRF_HEADER, XSRF_VALUE)
            .send()
            .await
            .with_context(|| format!("Failed to delete index pattern {title}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("index pattern {} does not exist", title);
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Kibana error: {} - {}", status, body);
        }
        Ok(())
    }

    /// Import a saved-objects export, overwriting objects with the same
    /// ids. The import API only accepts multipart file uploads and goes
    /// by the file extension, hence the synthetic filename.
    pub async fn import_saved_objects(&self, ndjson: &str) -> Result<()> {
        let part = multipart::Part::text(ndjson.to_string()).file_name("dashboard.ndjson");
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(format!("{}/api/saved_objects/_import", self.base_url))
            .header(XSRF_HEADER, XSRF_VALUE)
            .query(&[("overwrite", "true")])
            .multipart(form)
            .send()
            .await
            .context("Failed to import Kibana saved objects")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Kibana error: {} - {}", status, body);
        }
        Ok(())
    }

    /// Point the Kibana landing page at the given path
    pub async fn set_default_route(&self, path: &str) -> Result<()> {
        let version = self.version().await?;
        let body = json!({
            "attributes": {
                "defaultRoute": path,
            }
        });
        let response = self
            .client
            .put(format!("{}/api/saved_objects/config/{}", self.base_url, version))
            .header(XSRF_HEADER, XSRF_VALUE)
            .json(&body)
            .send()
            .await
            .context("Failed to set Kibana default route")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Kibana error: {} - {}", status, body);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    version: StatusVersion,
}

#[derive(Debug, Deserialize)]
struct StatusVersion {
    number: String,
}
