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

use super::config::MasterConfig;
use super::core::master_base;
use super::core::MapredCore;
use super::counters::*;
use super::error::parse_error;
use super::message::*;
use crate::raw::*;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

const MASTER_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8088";

/// Builder for [`MasterClient`].
#[derive(Default, Clone)]
pub struct MasterBuilder {
    config: MasterConfig,
    http_client: Option<HttpClient>,
}

impl Debug for MasterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MasterBuilder {
    /// Set the remote address of the ResourceManager proxy, default
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

    /// Set the application whose ApplicationMaster to address. Required.
    pub fn application_id(&mut self, application_id: &str) -> &mut Self {
        if !application_id.is_empty() {
            self.config.application_id = Some(application_id.to_string());
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
    pub fn build(&mut self) -> Result<MasterClient> {
        debug!("start building client: {:?}", self);

        let application_id = self.config.application_id.take().ok_or_else(|| {
            Error::new(ErrorKind::ConfigInvalid, "application_id is required")
                .with_operation("MasterBuilder::build")
        })?;

        let endpoint = normalize_endpoint(
            self.config.endpoint.take().as_deref(),
            MASTER_DEFAULT_ENDPOINT,
        );
        debug!("client use endpoint {} application {}", endpoint, application_id);

        let auth = resolve_auth(
            self.config.user_name.take().as_deref(),
            self.config.kerberos_principal.take().as_deref(),
        );
        let extra_headers = build_extra_headers(&self.config.headers)?;

        let client = match self.http_client.take() {
            Some(client) => client,
            None => HttpClient::new(Duration::from_secs(self.config.timeout))?,
        };

        Ok(MasterClient {
            core: Arc::new(MapredCore {
                endpoint,
                auth,
                proxy_user: self.config.proxy_user.take(),
                extra_headers,
                client,
            }),
            base: master_base(&application_id),
        })
    }
}

/// Typed client for a running job's MapReduce ApplicationMaster REST
/// API, addressed through the ResourceManager proxy.
///
/// Cheap to clone; safe to share across tasks since the connection
/// configuration is immutable after build and no state is kept between
/// calls.
#[derive(Debug, Clone)]
pub struct MasterClient {
    core: Arc<MapredCore>,
    base: String,
}

fn ensure_success(parts: Parts, body: Bytes, operation: &'static str) -> Result<(Parts, Bytes)> {
    if parts.status.as_u16() >= 400 {
        return Err(parse_error(&parts, &body).with_operation(operation));
    }
    Ok((parts, body))
}

impl MasterClient {
    /// `GET /info`: ApplicationMaster identity.
    pub async fn info(&self) -> Result<MasterInfo> {
        let resp = self.core.get(&self.base, "/info", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::info")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "info")
            .map(MasterInfo::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs`: jobs the ApplicationMaster runs, normally exactly one.
    pub async fn jobs(&self) -> Result<Vec<MasterJob>> {
        let resp = self.core.get(&self.base, "/jobs", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::jobs")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "jobs", "job")
            .into_iter()
            .map(MasterJob::from_json)
            .collect())
    }

    /// `GET /jobs/{id}`: one live job with progress.
    pub async fn job(&self, job_id: &str) -> Result<Option<MasterJob>> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::job")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "job").map(MasterJob::from_json))
    }

    /// `GET /jobs/{id}/jobattempts`: ApplicationMaster runs of the job.
    pub async fn job_attempts(&self, job_id: &str) -> Result<Vec<JobAttempt>> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/jobattempts");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::job_attempts")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "jobAttempts", "jobAttempt")
            .into_iter()
            .map(JobAttempt::from_json)
            .collect())
    }

    /// `GET /jobs/{id}/counters`: the live job's counter groups.
    pub async fn job_counters(&self, job_id: &str) -> Result<JobCounters> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/counters");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::job_counters")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "jobCounters")
            .map(JobCounters::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs/{id}/conf`: the configuration the job runs with.
    pub async fn job_conf(&self, job_id: &str) -> Result<JobConf> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/conf");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::job_conf")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "conf")
            .map(JobConf::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs/{id}/tasks`: the live job's tasks, optionally only maps
    /// or only reduces.
    pub async fn tasks(&self, job_id: &str, ty: Option<TaskType>) -> Result<Vec<Task>> {
        ensure_non_empty(job_id, "job_id")?;

        let mut params = Vec::new();
        if let Some(ty) = ty {
            params.push(("type", ty.as_filter().to_string()));
        }

        let path = format!("/jobs/{job_id}/tasks");
        let resp = self.core.get(&self.base, &path, &params).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::tasks")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "tasks", "task")
            .into_iter()
            .map(Task::from_json)
            .collect())
    }

    /// `GET /jobs/{id}/tasks/{tid}`: one task.
    pub async fn task(&self, job_id: &str, task_id: &str) -> Result<Option<Task>> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::task")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "task").map(Task::from_json))
    }

    /// `GET /jobs/{id}/tasks/{tid}/counters`: one task's counter groups.
    pub async fn task_counters(&self, job_id: &str, task_id: &str) -> Result<TaskCounters> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}/counters");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::task_counters")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "jobTaskCounters")
            .map(TaskCounters::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs/{id}/tasks/{tid}/attempts`: attempts of one task.
    pub async fn task_attempts(&self, job_id: &str, task_id: &str) -> Result<Vec<TaskAttempt>> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}/attempts");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::task_attempts")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "taskAttempts", "taskAttempt")
            .into_iter()
            .map(TaskAttempt::from_json)
            .collect())
    }

    /// `GET /jobs/{id}/tasks/{tid}/attempts/{aid}`: one attempt.
    pub async fn task_attempt(
        &self,
        job_id: &str,
        task_id: &str,
        attempt_id: &str,
    ) -> Result<Option<TaskAttempt>> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;
        ensure_non_empty(attempt_id, "attempt_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}/attempts/{attempt_id}");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::task_attempt")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "taskAttempt").map(TaskAttempt::from_json))
    }

    /// `GET /jobs/{id}/tasks/{tid}/attempts/{aid}/counters`: one attempt's
    /// counter groups.
    pub async fn task_attempt_counters(
        &self,
        job_id: &str,
        task_id: &str,
        attempt_id: &str,
    ) -> Result<TaskAttemptCounters> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;
        ensure_non_empty(attempt_id, "attempt_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}/attempts/{attempt_id}/counters");
        let resp = self.core.get(&self.base, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "MasterClient::task_attempt_counters")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "jobTaskAttemptCounters")
            .map(TaskAttemptCounters::from_json)
            .unwrap_or_default())
    }
}
