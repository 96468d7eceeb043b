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
use http::Method;
use http::StatusCode;
use log::debug;
use serde_json::json;

use super::config::ResourceManagerConfig;
use super::core::ResourceManagerCore;
use super::error::parse_error;
use super::message::*;
use crate::raw::*;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

const RM_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8088";

/// Builder for [`ResourceManagerClient`].
#[derive(Default, Clone)]
pub struct ResourceManagerBuilder {
    config: ResourceManagerConfig,
    http_client: Option<HttpClient>,
}

impl Debug for ResourceManagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManagerBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResourceManagerBuilder {
    /// Set the remote address of the ResourceManager, default
    /// `http://127.0.0.1:8088`.
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
    pub fn build(&mut self) -> Result<ResourceManagerClient> {
        debug!("start building client: {:?}", self);

        let endpoint =
            normalize_endpoint(self.config.endpoint.take().as_deref(), RM_DEFAULT_ENDPOINT);
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

        Ok(ResourceManagerClient {
            core: Arc::new(ResourceManagerCore {
                endpoint,
                auth,
                proxy_user: self.config.proxy_user.take(),
                extra_headers,
                client,
            }),
        })
    }
}

/// Typed client for the YARN ResourceManager REST API.
///
/// Cheap to clone; safe to share across tasks since the connection
/// configuration is immutable after build and no state is kept between
/// calls.
#[derive(Debug, Clone)]
pub struct ResourceManagerClient {
    core: Arc<ResourceManagerCore>,
}

fn ensure_success(parts: Parts, body: Bytes, operation: &'static str) -> Result<(Parts, Bytes)> {
    if parts.status.as_u16() >= 400 {
        return Err(parse_error(&parts, &body).with_operation(operation));
    }
    Ok((parts, body))
}

impl ResourceManagerClient {
    /// `GET /info`: cluster identity and versions.
    pub async fn cluster_info(&self) -> Result<ClusterInfo> {
        let resp = self.core.get("/info", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::cluster_info")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "clusterInfo")
            .map(ClusterInfo::from_json)
            .unwrap_or_default())
    }

    /// `GET /metrics`: aggregate application, resource and node counts.
    pub async fn cluster_metrics(&self) -> Result<ClusterMetrics> {
        let resp = self.core.get("/metrics", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::cluster_metrics")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "clusterMetrics")
            .map(ClusterMetrics::from_json)
            .unwrap_or_default())
    }

    /// `GET /scheduler`: the scheduler tree. The payload is doubly wrapped
    /// as `scheduler.schedulerInfo`.
    pub async fn scheduler_info(&self) -> Result<SchedulerInfo> {
        let resp = self.core.get("/scheduler", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::scheduler_info")?;

        let map = parse_json_object(&body);
        Ok(unwrap_nested(&map, "scheduler", "schedulerInfo")
            .map(SchedulerInfo::from_json)
            .unwrap_or_default())
    }

    /// `GET /apps`: list applications matching the filter. "No items" is an
    /// empty vec, never an error.
    pub async fn apps(&self, filter: &AppsFilter) -> Result<Vec<App>> {
        let resp = self.core.get("/apps", &filter.query()).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::apps")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "apps", "app")
            .into_iter()
            .map(App::from_json)
            .collect())
    }

    /// `GET /apps/{id}`: one application.
    pub async fn app(&self, application_id: &str) -> Result<Option<App>> {
        ensure_non_empty(application_id, "application_id")?;

        let path = format!("/apps/{application_id}");
        let resp = self.core.get(&path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::app")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "app").map(App::from_json))
    }

    /// `GET /apps/{id}/appattempts`: attempts of one application.
    pub async fn app_attempts(&self, application_id: &str) -> Result<Vec<AppAttempt>> {
        ensure_non_empty(application_id, "application_id")?;

        let path = format!("/apps/{application_id}/appattempts");
        let resp = self.core.get(&path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::app_attempts")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "appAttempts", "appAttempt")
            .into_iter()
            .map(AppAttempt::from_json)
            .collect())
    }

    /// `GET /apps/{id}/state`: just the lifecycle state, cheaper than
    /// fetching the whole application when polling.
    pub async fn app_state(&self, application_id: &str) -> Result<AppState> {
        ensure_non_empty(application_id, "application_id")?;

        let path = format!("/apps/{application_id}/state");
        let resp = self.core.get(&path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::app_state")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "state")
            .map(AppState::from_json)
            .unwrap_or_default())
    }

    /// `PUT /apps/{id}/state`: request a state change.
    ///
    /// The ResourceManager answers `200` when the transition already took
    /// effect and `202` while it is still in flight; both are success and
    /// the returned state tells which. Any other non-error answer means
    /// the server went off script.
    pub async fn set_app_state(&self, application_id: &str, state: AppState) -> Result<AppState> {
        ensure_non_empty(application_id, "application_id")?;

        let path = format!("/apps/{application_id}/state");
        let body = json!({ "state": state.as_str() });
        let resp = self.core.send_json(Method::PUT, &path, &body).await?;
        let (parts, body) = resp.into_parts();
        let (parts, body) = ensure_success(parts, body, "ResourceManagerClient::set_app_state")?;

        if parts.status != StatusCode::OK && parts.status != StatusCode::ACCEPTED {
            return Err(Error::new(
                ErrorKind::UnexpectedReturn,
                "state change answered with an unexpected success status",
            )
            .with_operation("ResourceManagerClient::set_app_state")
            .with_context("status", parts.status.to_string()));
        }

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "state")
            .map(AppState::from_json)
            .unwrap_or_default())
    }

    /// Kill one application. Sugar over [`Self::set_app_state`] with
    /// [`AppState::Killed`].
    pub async fn kill_app(&self, application_id: &str) -> Result<AppState> {
        self.set_app_state(application_id, AppState::Killed).await
    }

    /// `POST /apps/new-application`: reserve an application id and learn
    /// the largest grantable container.
    pub async fn new_application(&self) -> Result<NewApplication> {
        let resp = self
            .core
            .send_json(Method::POST, "/apps/new-application", &json!({}))
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::new_application")?;

        let value = serde_json::Value::Object(parse_json_object(&body));
        Ok(NewApplication::from_json(value))
    }

    /// `POST /apps`: submit an application. The server answers `202` with
    /// an empty body on acceptance.
    pub async fn submit_application(&self, submission: &ApplicationSubmission) -> Result<()> {
        ensure_non_empty(&submission.application_id, "application_id")?;

        let body = serde_json::to_value(submission).map_err(new_json_serialize_error)?;
        let resp = self.core.send_json(Method::POST, "/apps", &body).await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "ResourceManagerClient::submit_application")?;
        Ok(())
    }

    /// `GET /nodes`: cluster nodes, optionally narrowed to some states.
    pub async fn nodes(&self, states: &[NodeState]) -> Result<Vec<Node>> {
        let mut params = Vec::new();
        if !states.is_empty() {
            let states = states
                .iter()
                .map(NodeState::as_str)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("states", states));
        }

        let resp = self.core.get("/nodes", &params).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::nodes")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "nodes", "node")
            .into_iter()
            .map(Node::from_json)
            .collect())
    }

    /// `GET /nodes/{id}`: one node.
    pub async fn node(&self, node_id: &str) -> Result<Option<Node>> {
        ensure_non_empty(node_id, "node_id")?;

        let path = format!("/nodes/{node_id}");
        let resp = self.core.get(&path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "ResourceManagerClient::node")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "node").map(Node::from_json))
    }
}
