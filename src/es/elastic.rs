use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// Thin client for the Elasticsearch REST API
pub struct ElasticClient {
    client: Client,
    base_url: String,
}

impl ElasticClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check whether the cluster answers at all. The caller decides what
    /// an unreachable cluster means; indexing surfaces real errors anyway.
    pub async fn ping(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Create an index with the given settings and mappings. An index
    /// that already exists is left untouched.
    pub async fn create_index(&self, name: &str, settings: Value, mappings: Value) -> Result<()> {
        let body = json!({
            "settings": settings,
            "mappings": mappings,
        });
        let response = self
            .client
            .put(format!("{}/{}", self.base_url, name))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to create index {name}"))?;

        // 400 means the index exists already
        if response.status() == StatusCode::BAD_REQUEST {
            debug!("index {} already exists", name);
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Elasticsearch error: {} - {}", status, body);
        }
        debug!("created index {}", name);
        Ok(())
    }

    /// Delete an index. A missing index is not an error.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.base_url, name))
            .send()
            .await
            .with_context(|| format!("Failed to delete index {name}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("index {} does not exist", name);
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Elasticsearch error: {} - {}", status, body);
        }
        debug!("deleted index {}", name);
        Ok(())
    }

    /// Upsert a document under a caller-chosen id, so re-running the
    /// import overwrites instead of duplicating
    pub async fn put_document<T: Serialize>(
        &self,
        index: &str,
        id: &str,
        document: &T,
    ) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/{}/_doc/{}", self.base_url, index, id))
            .json(document)
            .send()
            .await
            .with_context(|| format!("Failed to index document {id} into {index}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Elasticsearch error: {} - {}", status, body);
        }
        Ok(())
    }
}
