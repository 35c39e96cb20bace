//! Health source client.
//!
//! Health data is published as plain-text resources under a public and a
//! private base URL. An `index` resource lists the available endpoints, one
//! per line. Health endpoints carry the `.health` marker and container
//! endpoints additionally carry `.container`.

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use healthwatch_config::SourcesConfig;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::debug;
use uuid::Uuid;

use crate::error::MonitorError;

/// Marker identifying health endpoints in the index.
pub const HEALTH_MARKER: &str = ".health";
/// Marker identifying container endpoints among health endpoints.
pub const CONTAINER_MARKER: &str = ".container";
/// Extension every resource is served with.
pub const RESOURCE_EXTENSION: &str = ".txt";
/// Name of the index resource.
pub const INDEX_RESOURCE: &str = "index";

/// Which base URL and credentials a fetch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Private,
}

/// A discovered container endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEndpoint {
    /// Container name.
    pub name: String,
    /// Endpoint identifier, without the health marker.
    pub endpoint: String,
}

/// Source of raw health payloads.
#[async_trait]
pub trait HealthSource: Send + Sync {
    /// Fetch a resource as text.
    async fn fetch(&self, resource: &str, access: Access) -> Result<String, MonitorError>;

    /// Fetch the payload of a health endpoint.
    async fn fetch_endpoint(&self, endpoint: &str, access: Access) -> Result<String, MonitorError> {
        self.fetch(&format!("{}{}", endpoint, HEALTH_MARKER), access)
            .await
    }

    /// List health endpoint identifiers from the index.
    async fn list_endpoints(&self, access: Access) -> Result<Vec<String>, MonitorError> {
        let index = self.fetch(INDEX_RESOURCE, access).await?;
        Ok(parse_index(&index))
    }

    /// List container endpoints from the index.
    async fn list_containers(&self, access: Access) -> Result<Vec<ContainerEndpoint>, MonitorError> {
        let endpoints = self.list_endpoints(access).await?;
        Ok(containers_from_endpoints(endpoints))
    }
}

/// Extract health endpoint identifiers from an index payload.
pub fn parse_index(index: &str) -> Vec<String> {
    index
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(HEALTH_MARKER))
        .filter_map(|line| line.split(HEALTH_MARKER).next())
        .map(str::to_string)
        .collect()
}

/// Keep container endpoints and derive their names.
pub fn containers_from_endpoints(endpoints: Vec<String>) -> Vec<ContainerEndpoint> {
    endpoints
        .into_iter()
        .filter(|endpoint| endpoint.contains(CONTAINER_MARKER))
        .filter_map(|endpoint| {
            let name = endpoint.split(CONTAINER_MARKER).next()?.to_string();
            Some(ContainerEndpoint { name, endpoint })
        })
        .collect()
}

/// Append the resource extension if it is missing.
pub fn resource_file(resource: &str) -> String {
    if resource.ends_with(RESOURCE_EXTENSION) {
        resource.to_string()
    } else {
        format!("{}{}", resource, RESOURCE_EXTENSION)
    }
}

fn cache_buster() -> String {
    format!("{}-{}", Uuid::new_v4().simple(), Utc::now().timestamp_millis())
}

/// HTTP implementation of [`HealthSource`].
pub struct HttpHealthSource {
    client: reqwest::Client,
    public_url: String,
    private_url: String,
    username: String,
    password: String,
}

impl HttpHealthSource {
    /// Create a client from the sources configuration.
    pub fn new(config: &SourcesConfig) -> Result<Self, MonitorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MonitorError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            public_url: config.public_url.trim_end_matches('/').to_string(),
            private_url: config.private_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Full URL of a resource, without the cache-busting query.
    pub fn resource_url(&self, resource: &str, access: Access) -> String {
        let base = match access {
            Access::Public => &self.public_url,
            Access::Private => &self.private_url,
        };
        format!("{}/{}", base, resource_file(resource))
    }
}

#[async_trait]
impl HealthSource for HttpHealthSource {
    async fn fetch(&self, resource: &str, access: Access) -> Result<String, MonitorError> {
        let resource = resource_file(resource);
        let url = self.resource_url(&resource, access);
        debug!(url = %url, ?access, "Fetching health resource");

        let mut request = self
            .client
            .get(&url)
            .query(&[("rand", cache_buster())])
            .header(PRAGMA, "no-cache")
            .header(CACHE_CONTROL, "no-cache");

        if access == Access::Private {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await.map_err(|e| MonitorError::Fetch {
            resource: resource.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::HttpStatus {
                resource,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| MonitorError::Fetch {
            resource,
            reason: e.to_string(),
        })
    }
}
