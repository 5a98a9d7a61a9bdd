//! Pinecone serverless index client.
//!
//! Talks to the control plane (`https://api.pinecone.io`) to describe or
//! create the index at startup, then to the index's own data-plane host for
//! similarity queries. The API key is wrapped in [`secrecy::SecretString`]
//! and only exposed when constructing request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use symptomix_types::config::RetrievalConfig;
use symptomix_types::retrieval::{Passage, RetrievalError};

use super::types::{
    CreateIndexRequest, IndexDescription, IndexSpec, QueryRequest, QueryResponse, ServerlessSpec,
};

/// Similarity metric for the index; the embedding model is trained for
/// cosine similarity.
const METRIC: &str = "cosine";

/// Pinecone API version header value.
const API_VERSION: &str = "2025-01";

/// How often to poll a freshly created index for readiness.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Give up waiting for readiness after this many polls.
const READY_POLL_ATTEMPTS: u32 = 30;

/// Client for one Pinecone serverless index.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: SecretString,
    control_plane_url: String,
    index_name: String,
    /// Data-plane host, resolved from the index description at connect time.
    host: String,
}

impl PineconeIndex {
    /// Connect to the named index, creating it if it does not exist.
    ///
    /// A fresh index is polled until Pinecone reports it ready; an index
    /// that never becomes ready yields [`RetrievalError::NotReady`].
    pub async fn connect(
        api_key: SecretString,
        dimension: usize,
        config: &RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        Self::connect_to(api_key, dimension, config, "https://api.pinecone.io").await
    }

    /// Connect against an explicit control-plane URL (test/proxy seam).
    pub async fn connect_to(
        api_key: SecretString,
        dimension: usize,
        config: &RetrievalConfig,
        control_plane_url: &str,
    ) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RetrievalError::Http(e.to_string()))?;

        let mut index = Self {
            client,
            api_key,
            control_plane_url: control_plane_url.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            host: String::new(),
        };

        let description = match index.describe().await? {
            Some(description) => description,
            None => {
                tracing::info!(index = %index.index_name, "creating Pinecone index");
                index.create(dimension, config).await?;
                index.wait_until_ready().await?
            }
        };

        let description = if description.status.ready {
            description
        } else {
            index.wait_until_ready().await?
        };

        index.host = description.host;
        tracing::debug!(index = %index.index_name, host = %index.host, "Pinecone index ready");
        Ok(index)
    }

    /// The name of the connected index.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Run a similarity query against the data plane.
    pub async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let url = format!("https://{}/query", self.host);
        let body = QueryRequest {
            vector: embedding.to_vec(),
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Index(format!("HTTP {status}: {error_body}")));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Deserialization(e.to_string()))?;

        Ok(parsed
            .matches
            .into_iter()
            .filter_map(|m| m.into_passage())
            .collect())
    }

    /// Describe the index; `None` when it does not exist.
    async fn describe(&self) -> Result<Option<IndexDescription>, RetrievalError> {
        let url = format!("{}/indexes/{}", self.control_plane_url, self.index_name);

        let response = self
            .client
            .get(&url)
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| RetrievalError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Index(format!("HTTP {status}: {error_body}")));
        }

        let description = response
            .json()
            .await
            .map_err(|e| RetrievalError::Deserialization(e.to_string()))?;
        Ok(Some(description))
    }

    async fn create(
        &self,
        dimension: usize,
        config: &RetrievalConfig,
    ) -> Result<(), RetrievalError> {
        let url = format!("{}/indexes", self.control_plane_url);
        let body = CreateIndexRequest {
            name: self.index_name.clone(),
            dimension,
            metric: METRIC.to_string(),
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: config.cloud.clone(),
                    region: config.region.clone(),
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Http(e.to_string()))?;

        let status = response.status();
        // 409: another worker created it between describe and create
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Index(format!("HTTP {status}: {error_body}")));
        }
        Ok(())
    }

    async fn wait_until_ready(&self) -> Result<IndexDescription, RetrievalError> {
        for _ in 0..READY_POLL_ATTEMPTS {
            if let Some(description) = self.describe().await? {
                if description.status.ready {
                    return Ok(description);
                }
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        Err(RetrievalError::NotReady(self.index_name.clone()))
    }
}
