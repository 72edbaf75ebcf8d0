// Copyright 2026 The Shardbox Authors
// SPDX-License-Identifier: Apache-2.0

//! Docker-based node discovery.
//!
//! Lists the running containers of the local Docker engine, keeps those
//! started from the storage image, and reads each node's credentials from
//! its container environment:
//!
//! ```text
//! minio/minio  172.18.0.3  MINIO_ACCESS_KEY=minio MINIO_SECRET_KEY=minio123
//! minio/minio  172.18.0.2  MINIO_ACCESS_KEY=minio MINIO_SECRET_KEY=minio456
//!
//! => http://172.18.0.2:9000 (minio/minio456), http://172.18.0.3:9000 (minio/minio123)
//! ```
//!
//! The engine lists containers by creation time, so nodes are sorted by
//! address before they are returned.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, ListContainersOptions};
use bollard::models::ContainerSummary;
use bollard::Docker;
use shardbox_core::NodeDescriptor;
use tracing::{debug, warn};

use crate::{Discovery, DiscoveryError, DiscoveryResult};

const ACCESS_KEY_VARS: [&str; 2] = ["MINIO_ACCESS_KEY", "MINIO_ROOT_USER"];
const SECRET_KEY_VARS: [&str; 2] = ["MINIO_SECRET_KEY", "MINIO_ROOT_PASSWORD"];

/// Discovers nodes by inspecting storage containers on a Docker engine.
#[derive(Debug, Clone)]
pub struct DockerDiscovery {
    docker: Docker,
    image: String,
    port: u16,
    scheme: String,
    access_key: String,
    secret_key: String,
}

impl DockerDiscovery {
    /// Connects to the local Docker engine (`DOCKER_HOST` or the default socket).
    ///
    /// No request is made until [`Discovery::discover`] runs.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::Docker` if the client cannot be configured.
    pub fn connect_local(image: impl Into<String>, port: u16) -> DiscoveryResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| DiscoveryError::Docker(e.to_string()))?;
        Ok(Self::with_client(docker, image, port))
    }

    /// Creates a Docker discovery over an existing client.
    #[must_use]
    pub fn with_client(docker: Docker, image: impl Into<String>, port: u16) -> Self {
        Self {
            docker,
            image: image.into(),
            port,
            scheme: "http".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }

    /// Sets the URL scheme of discovered endpoints.
    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Sets credentials for containers whose environment carries none.
    #[must_use]
    pub fn with_credentials(mut self, access_key: &str, secret_key: &str) -> Self {
        self.access_key = access_key.to_string();
        self.secret_key = secret_key.to_string();
        self
    }

    fn is_storage_image(&self, image: &str) -> bool {
        image == self.image
            || image.strip_prefix(self.image.as_str()).is_some_and(|tag| tag.starts_with(':'))
    }

    fn endpoint(&self, ip: IpAddr) -> String {
        format!("{}://{}", self.scheme, SocketAddr::new(ip, self.port))
    }

    async fn container_env(&self, id: &str) -> DiscoveryResult<Vec<String>> {
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| DiscoveryError::Docker(format!("inspecting container {id}: {e}")))?;
        Ok(inspect.config.and_then(|config| config.env).unwrap_or_default())
    }
}

/// First address of a container across its attached networks.
fn container_ip(container: &ContainerSummary) -> Option<IpAddr> {
    container
        .network_settings
        .as_ref()?
        .networks
        .as_ref()?
        .values()
        .filter_map(|network| network.ip_address.as_deref())
        .find_map(|ip| ip.parse().ok())
}

/// Value of the first of `names` set in a `KEY=value` environment list.
fn env_value(env: &[String], names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        env.iter().find_map(|entry| match entry.split_once('=') {
            Some((key, value)) if key == *name && !value.is_empty() => Some(value.to_string()),
            _ => None,
        })
    })
}

#[async_trait]
impl Discovery for DockerDiscovery {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn discover(&self) -> DiscoveryResult<Vec<NodeDescriptor>> {
        debug!(image = %self.image, "Listing storage containers");
        let containers = self
            .docker
            .list_containers(None::<ListContainersOptions<String>>)
            .await
            .map_err(|e| DiscoveryError::Docker(format!("listing containers: {e}")))?;

        let mut found = Vec::new();
        for container in &containers {
            if !container.image.as_deref().is_some_and(|image| self.is_storage_image(image)) {
                continue;
            }
            let Some(id) = container.id.as_deref() else {
                continue;
            };
            let Some(ip) = container_ip(container) else {
                warn!(container = id, "Storage container has no network address, skipping");
                continue;
            };

            let env = self.container_env(id).await?;
            let access_key =
                env_value(&env, &ACCESS_KEY_VARS).unwrap_or_else(|| self.access_key.clone());
            let secret_key =
                env_value(&env, &SECRET_KEY_VARS).unwrap_or_else(|| self.secret_key.clone());
            found.push((ip, NodeDescriptor::new(self.endpoint(ip), access_key, secret_key)));
        }

        found.sort_by_key(|(ip, _)| *ip);
        found.dedup_by_key(|(ip, _)| *ip);
        Ok(found.into_iter().map(|(_, node)| node).collect())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn env(entries: &[&str]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    fn json(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
    }

    async fn engine() -> (MockServer, DockerDiscovery) {
        let server = MockServer::start().await;
        let docker =
            Docker::connect_with_http(&server.uri(), 4, bollard::API_DEFAULT_VERSION).unwrap();
        (server, DockerDiscovery::with_client(docker, "minio/minio", 9000))
    }

    #[test]
    fn test_env_value() {
        let vars = env(&["PATH=/bin", "MINIO_ACCESS_KEY=minio", "MINIO_SECRET_KEY=a=b"]);
        assert_eq!(env_value(&vars, &ACCESS_KEY_VARS).as_deref(), Some("minio"));
        assert_eq!(env_value(&vars, &SECRET_KEY_VARS).as_deref(), Some("a=b"));
        assert_eq!(env_value(&vars, &["HOME"]), None);
    }

    #[test]
    fn test_env_value_falls_back_to_root_user() {
        let vars = env(&["MINIO_ROOT_USER=admin", "MINIO_ACCESS_KEY_FILE=/run/key"]);
        assert_eq!(env_value(&vars, &ACCESS_KEY_VARS).as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_storage_image_match() {
        let (_server, discovery) = engine().await;
        assert!(discovery.is_storage_image("minio/minio"));
        assert!(discovery.is_storage_image("minio/minio:RELEASE.2024-01-01"));
        assert!(!discovery.is_storage_image("minio/minio-client"));
        assert!(!discovery.is_storage_image("redis"));
    }

    #[tokio::test]
    async fn test_discover_storage_containers() {
        let (server, discovery) = engine().await;
        let discovery = discovery.with_credentials("fallback", "fallback-secret");

        Mock::given(method("GET"))
            .and(path_regex(r"/containers/json$"))
            .respond_with(json(
                r#"[
                    {"Id": "c3", "Image": "minio/minio",
                     "NetworkSettings": {"Networks": {"bridge": {"IPAddress": "172.18.0.3"}}}},
                    {"Id": "c9", "Image": "redis",
                     "NetworkSettings": {"Networks": {"bridge": {"IPAddress": "172.18.0.9"}}}},
                    {"Id": "c2", "Image": "minio/minio:latest",
                     "NetworkSettings": {"Networks": {"bridge": {"IPAddress": "172.18.0.2"}}}}
                ]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/containers/c3/json$"))
            .respond_with(json(
                r#"{"Id": "c3", "Config": {"Env": ["MINIO_ACCESS_KEY=minio", "MINIO_SECRET_KEY=minio123"]}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"/containers/c2/json$"))
            .respond_with(json(r#"{"Id": "c2", "Config": {"Env": ["PATH=/bin"]}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let nodes = discovery.discover().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].endpoint, "http://172.18.0.2:9000");
        assert_eq!(nodes[0].access_key, "fallback");
        assert_eq!(nodes[0].secret_key, "fallback-secret");
        assert_eq!(nodes[1].endpoint, "http://172.18.0.3:9000");
        assert_eq!(nodes[1].access_key, "minio");
        assert_eq!(nodes[1].secret_key, "minio123");
    }

    #[tokio::test]
    async fn test_container_without_address_is_skipped() {
        let (server, discovery) = engine().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/containers/json$"))
            .respond_with(json(r#"[{"Id": "c1", "Image": "minio/minio", "NetworkSettings": {}}]"#))
            .mount(&server)
            .await;

        assert!(discovery.discover().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_error() {
        let (server, discovery) = engine().await;
        Mock::given(method("GET"))
            .and(path_regex(r"/containers/json$"))
            .respond_with(ResponseTemplate::new(500).set_body_raw(
                r#"{"message": "daemon unavailable"}"#.to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        assert!(matches!(discovery.discover().await, Err(DiscoveryError::Docker(_))));
    }
}
