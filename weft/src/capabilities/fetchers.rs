//! Resource fetcher implementations.
//!
//! `HttpFetcher` is the production fetcher; `StaticFetcher` serves canned
//! bodies for development, bootstrap, and deterministic tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::ResourceFetcher;
use crate::error::FetchError;

/// Fetches resources over HTTP with a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory fetcher mapping canonical URLs to bodies.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; returns self for chaining.
    pub fn with_resource(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn retrieve(&self, url: &str) -> Result<String, FetchError> {
        match self.bodies.get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
