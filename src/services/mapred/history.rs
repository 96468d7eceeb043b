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

use super::config::HistoryConfig;
use super::core::MapredCore;
use super::core::HISTORY_ABOUT_BASE;
use super::core::HISTORY_BASE;
use super::counters::*;
use super::error::parse_error;
use super::message::*;
use crate::raw::*;
use crate::Result;

const HISTORY_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:19888";

/// Builder for [`HistoryClient`].
#[derive(Default, Clone)]
pub struct HistoryBuilder {
    config: HistoryConfig,
    http_client: Option<HttpClient>,
}

impl Debug for HistoryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HistoryBuilder {
    /// Set the remote address of the HistoryServer, default
    /// `http://127.0.0.1:19888`.
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
    pub fn build(&mut self) -> Result<HistoryClient> {
        debug!("start building client: {:?}", self);

        let endpoint = normalize_endpoint(
            self.config.endpoint.take().as_deref(),
            HISTORY_DEFAULT_ENDPOINT,
        );
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

        Ok(HistoryClient {
            core: Arc::new(MapredCore {
                endpoint,
                auth,
                proxy_user: self.config.proxy_user.take(),
                extra_headers,
                client,
            }),
        })
    }
}

/// Typed client for the MapReduce HistoryServer REST API.
///
/// Cheap to clone; safe to share across tasks since the connection
/// configuration is immutable after build and no state is kept between
/// calls.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    core: Arc<MapredCore>,
}

fn ensure_success(parts: Parts, body: Bytes, operation: &'static str) -> Result<(Parts, Bytes)> {
    if parts.status.as_u16() >= 400 {
        return Err(parse_error(&parts, &body).with_operation(operation));
    }
    Ok((parts, body))
}

impl HistoryClient {
    /// `GET /info`: HistoryServer identity and versions. This one lives at
    /// the history root, not under the mapreduce resources.
    pub async fn info(&self) -> Result<HistoryInfo> {
        let resp = self.core.get(HISTORY_ABOUT_BASE, "/info", &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::info")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "historyInfo")
            .map(HistoryInfo::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs`: finished jobs matching the filter. "No items" is an
    /// empty vec, never an error.
    pub async fn jobs(&self, filter: &JobsFilter) -> Result<Vec<HistoryJob>> {
        let resp = self.core.get(HISTORY_BASE, "/jobs", &filter.query()).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::jobs")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "jobs", "job")
            .into_iter()
            .map(HistoryJob::from_json)
            .collect())
    }

    /// `GET /jobs/{id}`: one finished job.
    pub async fn job(&self, job_id: &str) -> Result<Option<HistoryJob>> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}");
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::job")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "job").map(HistoryJob::from_json))
    }

    /// `GET /jobs/{id}/jobattempts`: ApplicationMaster runs of the job.
    pub async fn job_attempts(&self, job_id: &str) -> Result<Vec<JobAttempt>> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/jobattempts");
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::job_attempts")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "jobAttempts", "jobAttempt")
            .into_iter()
            .map(JobAttempt::from_json)
            .collect())
    }

    /// `GET /jobs/{id}/counters`: the job's counter groups.
    pub async fn job_counters(&self, job_id: &str) -> Result<JobCounters> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/counters");
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::job_counters")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "jobCounters")
            .map(JobCounters::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs/{id}/conf`: the configuration the job ran with.
    pub async fn job_conf(&self, job_id: &str) -> Result<JobConf> {
        ensure_non_empty(job_id, "job_id")?;

        let path = format!("/jobs/{job_id}/conf");
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::job_conf")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "conf")
            .map(JobConf::from_json)
            .unwrap_or_default())
    }

    /// `GET /jobs/{id}/tasks`: the job's tasks, optionally only maps or
    /// only reduces.
    pub async fn tasks(&self, job_id: &str, ty: Option<TaskType>) -> Result<Vec<Task>> {
        ensure_non_empty(job_id, "job_id")?;

        let mut params = Vec::new();
        if let Some(ty) = ty {
            params.push(("type", ty.as_filter().to_string()));
        }

        let path = format!("/jobs/{job_id}/tasks");
        let resp = self.core.get(HISTORY_BASE, &path, &params).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::tasks")?;

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
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::task")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "task").map(Task::from_json))
    }

    /// `GET /jobs/{id}/tasks/{tid}/counters`: one task's counter groups.
    pub async fn task_counters(&self, job_id: &str, task_id: &str) -> Result<TaskCounters> {
        ensure_non_empty(job_id, "job_id")?;
        ensure_non_empty(task_id, "task_id")?;

        let path = format!("/jobs/{job_id}/tasks/{task_id}/counters");
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::task_counters")?;

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
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::task_attempts")?;

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
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::task_attempt")?;

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
        let resp = self.core.get(HISTORY_BASE, &path, &[]).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "HistoryClient::task_attempt_counters")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "jobTaskAttemptCounters")
            .map(TaskAttemptCounters::from_json)
            .unwrap_or_default())
    }
}
