// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::response::Parts;
use log::debug;

use super::config::NodeManagerConfig;
use super::core::NodeManagerCore;
use super::error::parse_error;
use super::message::*;
use crate::raw::*;
use crate::Result;

const NM_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8042";

/// Builder for [`NodeManagerClient`].
#[derive(Default, Clone)]
pub struct NodeManagerBuilder {
    config: NodeManagerConfig,
    http_client: Option<HttpClient>,
}

impl Debug for NodeManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeManagerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NodeManagerBuilder {
    /// Set the remote address of the NodeManager, default
    /// `http://127.0.0.1:8042`.
    ///
    /// If user inputs endpoint without scheme, we will prepend `http://`
    /// to it.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        if !endpoint.is_empty() {
            self.config.endpoint = Some(endpoint.to_string());
        }
        self
    }

    /// Set the user name for simple authentication, appended to every URL
    /// as `user.name=`.
    pub fn user_name(&mut self, user_name: &str) -> &mut Self {
        if !user_name.is_empty() {
            self.config.user_name = Some(user_name.to_string());
        }
        self
    }

    /// Set the Kerberos principal; flags the transport to negotiate.
    /// Takes precedence over a simple user name.
    pub fn kerberos_principal(&mut self, principal: &str) -> &mut Self {
        if !principal.is_empty() {
            self.config.kerberos_principal = Some(principal.to_string());
        }
        self
    }

    /// Set the proxy user, appended as `doas=` regardless of the
    /// authentication mode.
    pub fn proxy_user(&mut self, proxy_user: &str) -> &mut Self {
        if !proxy_user.is_empty() {
            self.config.proxy_user = Some(proxy_user.to_string());
        }
        self
    }

    /// Set the per-call timeout in seconds. `0` (the default) blocks
    /// indefinitely.
    pub fn timeout(&mut self, seconds: u64) -> &mut Self {
        self.config.timeout = seconds;
        self
    }

    /// Set an extra header attached to every request.
    pub fn header(&mut self, name: &str, value: &str) -> &mut Self {
        self.config
            .headers
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Use a caller-provided transport instead of the default reqwest one.
    pub fn http_client(&mut self, client: HttpClient) -> &mut Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(&mut self) -> Result<NodeManagerClient> {
        debug!("start building client: {:?}", self);

        let endpoint =
            normalize_endpoint(self.config.endpoint.take().as_deref(), NM_DEFAULT_ENDPOINT);
        debug!("client use endpoint {}", endpoint);

        let auth = resolve_auth(
            self.config.user_name.take().as_deref(),
            self.config.kerberos_principal.take().as_deref(),
        );
        let extra_headers = build_extra_headers(&self.config.headers)?;

        let client = match self.http_client.take() {
            Some(client) => client,
            None => HttpClient::new(Duration::from_secs(self.config.timeout))?,
        };

        Ok(NodeManagerClient {
            core: Arc::new(NodeManagerCore {
                endpoint,
                auth,
                proxy_user: self.config.proxy_user.take(),
                extra_headers,
                client,
            }),
        })
    }
}

/// Typed client for the YARN NodeManager REST API.
///
/// Cheap to clone; safe to share across tasks since the connection
/// configuration is immutable after build and no state is kept between
/// calls.
#[derive(Debug, Clone)]
pub struct NodeManagerClient {
    core: Arc<NodeManagerCore>,
}

fn ensure_success(parts: Parts, body: Bytes, operation: &'static str) -> Result<(Parts, Bytes)> {
    if parts.status.as_u16() >= 400 {
        return Err(parse_error(&parts, &body).with_operation(operation));
    }
    Ok((parts, body))
}

impl NodeManagerClient {
    /// `GET /info`: node identity, capacity and health.
    pub async fn node_info(&self) -> Result<NodeInfo> {
        let resp = self.core.get("/info").await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "NodeManagerClient::node_info")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "nodeInfo")
            .map(NodeInfo::from_json)
            .unwrap_or_default())
    }

    /// `GET /apps`: applications with state on this node. "No items" is an
    /// empty vec, never an error.
    pub async fn apps(&self) -> Result<Vec<NmApp>> {
        let resp = self.core.get("/apps").await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "NodeManagerClient::apps")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "apps", "app")
            .into_iter()
            .map(NmApp::from_json)
            .collect())
    }

    /// `GET /apps/{id}`: one application's local slice.
    pub async fn app(&self, application_id: &str) -> Result<Option<NmApp>> {
        ensure_non_empty(application_id, "application_id")?;

        let path = format!("/apps/{application_id}");
        let resp = self.core.get(&path).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "NodeManagerClient::app")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "app").map(NmApp::from_json))
    }

    /// `GET /containers`: containers on this node.
    pub async fn containers(&self) -> Result<Vec<Container>> {
        let resp = self.core.get("/containers").await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "NodeManagerClient::containers")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "containers", "container")
            .into_iter()
            .map(Container::from_json)
            .collect())
    }

    /// `GET /containers/{id}`: one container.
    pub async fn container(&self, container_id: &str) -> Result<Option<Container>> {
        ensure_non_empty(container_id, "container_id")?;

        let path = format!("/containers/{container_id}");
        let resp = self.core.get(&path).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "NodeManagerClient::container")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "container").map(Container::from_json))
    }
}
