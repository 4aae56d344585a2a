use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::contract::{RemoteSearchRequest, RemoteSearchResponse};
use crate::model::{EntityType, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteSearchError {
    #[error("remote search is not configured")]
    Disabled,
    #[error("remote search request failed: {0}")]
    Transport(String),
    #[error("remote search returned HTTP {0}")]
    Status(u16),
    #[error("remote search response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait RemoteSearch: Send + Sync {
    async fn search_remote(
        &self,
        query: &str,
        types: &[EntityType],
    ) -> Result<Vec<SearchResult>, RemoteSearchError>;
}

pub struct HttpSearchClient {
    client: Client,
    endpoint: String,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RemoteSearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteSearchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteSearchError> {
        Self::new(
            &config.remote_endpoint,
            Duration::from_millis(config.remote_timeout_ms),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteSearch for HttpSearchClient {
    async fn search_remote(
        &self,
        query: &str,
        types: &[EntityType],
    ) -> Result<Vec<SearchResult>, RemoteSearchError> {
        if self.endpoint.is_empty() {
            return Err(RemoteSearchError::Disabled);
        }

        let request = RemoteSearchRequest {
            query: query.to_string(),
            types: types.to_vec(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteSearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteSearchError::Status(status.as_u16()));
        }

        let results: RemoteSearchResponse = response
            .json()
            .await
            .map_err(|e| RemoteSearchError::Decode(e.to_string()))?;
        tracing::debug!(
            query,
            types = ?types,
            returned = results.len(),
            "remote search completed"
        );
        Ok(results)
    }
}
