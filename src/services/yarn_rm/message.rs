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

//! YARN ResourceManager response messages.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::raw::lenient_f32;

/// The `clusterInfo` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterInfo {
    /// Cluster id, the RM start timestamp.
    pub id: i64,
    /// When the ResourceManager started, epoch milliseconds.
    pub started_on: i64,
    /// ResourceManager service state.
    pub state: ClusterState,
    /// High-availability state, e.g. `ACTIVE`.
    pub ha_state: String,
    /// Configured RM state store implementation.
    pub rm_state_store_name: String,
    /// ResourceManager version string.
    pub resource_manager_version: String,
    /// ResourceManager build version string.
    pub resource_manager_build_version: String,
    /// When the RM build was made.
    pub resource_manager_version_built_on: String,
    /// Hadoop common version.
    pub hadoop_version: String,
    /// Hadoop common build version.
    pub hadoop_build_version: String,
    /// When the Hadoop build was made.
    pub hadoop_version_built_on: String,
}

/// ResourceManager service state.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClusterState {
    /// The service has not been initialized.
    Notinited,
    /// The service is initialized but not started.
    Inited,
    /// The service is running.
    Started,
    /// The service is stopped.
    Stopped,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

/// The `clusterMetrics` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterMetrics {
    /// Applications submitted over the cluster lifetime.
    pub apps_submitted: i64,
    /// Applications completed.
    pub apps_completed: i64,
    /// Applications pending.
    pub apps_pending: i64,
    /// Applications running.
    pub apps_running: i64,
    /// Applications failed.
    pub apps_failed: i64,
    /// Applications killed.
    pub apps_killed: i64,
    /// Reserved memory in MB.
    pub reserved_mb: i64,
    /// Available memory in MB.
    pub available_mb: i64,
    /// Allocated memory in MB.
    pub allocated_mb: i64,
    /// Total memory in MB.
    pub total_mb: i64,
    /// Reserved virtual cores.
    pub reserved_virtual_cores: i64,
    /// Available virtual cores.
    pub available_virtual_cores: i64,
    /// Allocated virtual cores.
    pub allocated_virtual_cores: i64,
    /// Total virtual cores.
    pub total_virtual_cores: i64,
    /// Containers currently allocated.
    pub containers_allocated: i64,
    /// Containers currently reserved.
    pub containers_reserved: i64,
    /// Containers pending allocation.
    pub containers_pending: i64,
    /// Nodes in total.
    pub total_nodes: i64,
    /// Nodes active.
    pub active_nodes: i64,
    /// Nodes lost.
    pub lost_nodes: i64,
    /// Nodes unhealthy.
    pub unhealthy_nodes: i64,
    /// Nodes decommissioned.
    pub decommissioned_nodes: i64,
    /// Nodes rebooted.
    pub rebooted_nodes: i64,
    /// Nodes shut down.
    pub shutdown_nodes: i64,
}

/// The `scheduler.schedulerInfo` envelope, shared by the fifo and capacity
/// schedulers.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerInfo {
    /// Scheduler implementation, e.g. `capacityScheduler`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Configured queue capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub capacity: f32,
    /// Currently used capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub used_capacity: f32,
    /// Configured maximum capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub max_capacity: f32,
    /// Name of the root queue.
    pub queue_name: String,
    /// Child queues.
    pub queues: QueueList,
}

/// Inner collection holder for nested queues.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueList {
    /// Queues in this level.
    pub queue: Vec<Queue>,
}

/// One scheduler queue, possibly with children.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Queue {
    /// Queue name, without the parent prefix.
    pub queue_name: String,
    /// Queue state.
    pub state: QueueState,
    /// Configured capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub capacity: f32,
    /// Used capacity percentage, relative to the configured capacity.
    #[serde(deserialize_with = "lenient_f32")]
    pub used_capacity: f32,
    /// Configured maximum capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub max_capacity: f32,
    /// Absolute capacity percentage of the whole cluster.
    #[serde(deserialize_with = "lenient_f32")]
    pub absolute_capacity: f32,
    /// Absolute used capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub absolute_used_capacity: f32,
    /// Absolute maximum capacity percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub absolute_max_capacity: f32,
    /// Number of applications in the queue.
    pub num_applications: i64,
    /// Resources used by the queue.
    pub resources_used: Resource,
    /// Child queues, empty for leaves.
    pub queues: QueueList,
}

/// Queue state.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueueState {
    /// The queue accepts applications.
    Running,
    /// The queue is stopped.
    Stopped,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

/// A memory/vcores pair.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Resource {
    /// Memory in MB.
    pub memory: i64,
    /// Virtual cores.
    #[serde(rename = "vCores")]
    pub v_cores: i64,
}

/// One entry of `apps.app[]` / the `app` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct App {
    /// Application id, e.g. `application_1326821518301_0005`.
    pub id: String,
    /// Submitting user.
    pub user: String,
    /// Application name.
    pub name: String,
    /// Queue the application was submitted to.
    pub queue: String,
    /// Application state.
    pub state: AppState,
    /// Final status reported by the application itself.
    pub final_status: FinalStatus,
    /// Progress percentage; the server emits a number or a numeric string.
    #[serde(deserialize_with = "lenient_f32")]
    pub progress: f32,
    /// Tracking UI kind, e.g. `History`.
    #[serde(rename = "trackingUI")]
    pub tracking_ui: String,
    /// Tracking URL.
    pub tracking_url: String,
    /// Diagnostics text, often empty.
    pub diagnostics: String,
    /// Cluster id the app ran in.
    pub cluster_id: i64,
    /// Application type, e.g. `MAPREDUCE`.
    pub application_type: String,
    /// Comma separated application tags.
    pub application_tags: String,
    /// When the application started, epoch milliseconds.
    pub started_time: i64,
    /// When the application finished, epoch milliseconds.
    pub finished_time: i64,
    /// Elapsed milliseconds.
    pub elapsed_time: i64,
    /// Link to the ApplicationMaster container logs.
    pub am_container_logs: String,
    /// Host and HTTP port of the ApplicationMaster.
    pub am_host_http_address: String,
    /// Allocated memory in MB.
    #[serde(rename = "allocatedMB")]
    pub allocated_mb: i64,
    /// Allocated virtual cores.
    pub allocated_v_cores: i64,
    /// Containers currently running.
    pub running_containers: i64,
    /// Aggregated memory-seconds consumed.
    pub memory_seconds: i64,
    /// Aggregated vcore-seconds consumed.
    pub vcore_seconds: i64,
}

/// Application lifecycle state.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    /// Just created.
    New,
    /// Being persisted.
    NewSaving,
    /// Submitted, waiting to be accepted.
    Submitted,
    /// Accepted by the scheduler.
    Accepted,
    /// Running.
    Running,
    /// Finished; check [`FinalStatus`] for the outcome.
    Finished,
    /// Failed.
    Failed,
    /// Killed by a user or admin.
    Killed,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

impl AppState {
    /// Wire spelling of the state, used for filters and state-change
    /// bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::New => "NEW",
            AppState::NewSaving => "NEW_SAVING",
            AppState::Submitted => "SUBMITTED",
            AppState::Accepted => "ACCEPTED",
            AppState::Running => "RUNNING",
            AppState::Finished => "FINISHED",
            AppState::Failed => "FAILED",
            AppState::Killed => "KILLED",
            AppState::Invalid => "INVALID",
        }
    }

    /// Whether this state is terminal, i.e. polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppState::Finished | AppState::Failed | AppState::Killed)
    }
}

/// Final status an application reported for itself.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinalStatus {
    /// The application did not report yet.
    Undefined,
    /// Succeeded.
    Succeeded,
    /// Failed.
    Failed,
    /// Killed.
    Killed,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

impl FinalStatus {
    /// Wire spelling, used for filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStatus::Undefined => "UNDEFINED",
            FinalStatus::Succeeded => "SUCCEEDED",
            FinalStatus::Failed => "FAILED",
            FinalStatus::Killed => "KILLED",
            FinalStatus::Invalid => "INVALID",
        }
    }
}

/// One entry of `appAttempts.appAttempt[]`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppAttempt {
    /// Attempt ordinal.
    pub id: i32,
    /// When the attempt started, epoch milliseconds.
    pub start_time: i64,
    /// Container the ApplicationMaster runs in.
    pub container_id: String,
    /// HTTP address of the hosting node.
    pub node_http_address: String,
    /// Id of the hosting node.
    pub node_id: String,
    /// Link to the attempt logs.
    pub logs_link: String,
    /// Full attempt id string.
    pub app_attempt_id: String,
}

/// One entry of `nodes.node[]` / the `node` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Node {
    /// Rack the node lives in.
    pub rack: String,
    /// Node state.
    pub state: NodeState,
    /// Node id, `host:port`.
    pub id: String,
    /// Hostname.
    pub node_host_name: String,
    /// HTTP address of the NodeManager web UI.
    #[serde(rename = "nodeHTTPAddress")]
    pub node_http_address: String,
    /// Last health report time, epoch milliseconds.
    pub last_health_update: i64,
    /// NodeManager version.
    pub version: String,
    /// Last health report text.
    pub health_report: String,
    /// Containers on the node.
    pub num_containers: i64,
    /// Memory used on the node in MB.
    #[serde(rename = "usedMemoryMB")]
    pub used_memory_mb: i64,
    /// Memory available on the node in MB.
    #[serde(rename = "availMemoryMB")]
    pub avail_memory_mb: i64,
    /// Virtual cores used on the node.
    pub used_virtual_cores: i64,
    /// Virtual cores available on the node.
    pub available_virtual_cores: i64,
}

/// NodeManager state as tracked by the ResourceManager.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeState {
    /// Newly registered.
    New,
    /// Healthy and running.
    Running,
    /// Unhealthy per the health checker.
    Unhealthy,
    /// Decommissioned by the admin.
    Decommissioned,
    /// Lost contact.
    Lost,
    /// Rebooted.
    Rebooted,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

impl NodeState {
    /// Wire spelling, used for filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::New => "NEW",
            NodeState::Running => "RUNNING",
            NodeState::Unhealthy => "UNHEALTHY",
            NodeState::Decommissioned => "DECOMMISSIONED",
            NodeState::Lost => "LOST",
            NodeState::Rebooted => "REBOOTED",
            NodeState::Invalid => "INVALID",
        }
    }
}

/// Response of `POST /apps/new-application`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewApplication {
    /// The application id reserved for a subsequent submission.
    #[serde(rename = "application-id")]
    pub application_id: String,
    /// The largest container the cluster can grant.
    #[serde(rename = "maximum-resource-capability")]
    pub maximum_resource_capability: Resource,
}

/// JSON body of `POST /apps`, submitting an application.
///
/// The `am-container-spec` is passed through verbatim since launch
/// commands and local resources are deployment specific.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct ApplicationSubmission {
    /// Id previously reserved via `new_application`.
    #[serde(rename = "application-id")]
    pub application_id: String,
    /// Application name.
    #[serde(rename = "application-name")]
    pub application_name: String,
    /// Target queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    /// Priority within the queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// ApplicationMaster container launch context, passed through.
    #[serde(rename = "am-container-spec", skip_serializing_if = "Option::is_none")]
    pub am_container_spec: Option<Value>,
    /// Whether the AM is unmanaged.
    #[serde(rename = "unmanaged-AM", skip_serializing_if = "Option::is_none")]
    pub unmanaged_am: Option<bool>,
    /// Maximum attempts before giving up.
    #[serde(rename = "max-app-attempts", skip_serializing_if = "Option::is_none")]
    pub max_app_attempts: Option<i32>,
    /// Resources requested for the AM container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    /// Application type, e.g. `MAPREDUCE`.
    #[serde(rename = "application-type", skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,
    /// Keep containers across attempts.
    #[serde(
        rename = "keep-containers-across-application-attempts",
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_containers_across_application_attempts: Option<bool>,
}

/// Filters for listing applications; unset fields are omitted from the
/// query string entirely.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppsFilter {
    /// Keep applications in any of these states.
    pub states: Vec<AppState>,
    /// Keep applications with this final status.
    pub final_status: Option<FinalStatus>,
    /// Keep applications of this user.
    pub user: Option<String>,
    /// Keep applications submitted to this queue.
    pub queue: Option<String>,
    /// Return at most this many applications.
    pub limit: Option<u32>,
    /// Keep applications started at or after this time.
    pub started_time_begin: Option<i64>,
    /// Keep applications started at or before this time.
    pub started_time_end: Option<i64>,
    /// Keep applications finished at or after this time.
    pub finished_time_begin: Option<i64>,
    /// Keep applications finished at or before this time.
    pub finished_time_end: Option<i64>,
    /// Keep applications of any of these types.
    pub application_types: Vec<String>,
    /// Keep applications carrying any of these tags.
    pub application_tags: Vec<String>,
}

impl AppsFilter {
    pub(super) fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.states.is_empty() {
            let states = self
                .states
                .iter()
                .map(AppState::as_str)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("states", states));
        }
        if let Some(final_status) = self.final_status {
            params.push(("finalStatus", final_status.as_str().to_string()));
        }
        if let Some(user) = &self.user {
            params.push(("user", user.clone()));
        }
        if let Some(queue) = &self.queue {
            params.push(("queue", queue.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(t) = self.started_time_begin {
            params.push(("startedTimeBegin", t.to_string()));
        }
        if let Some(t) = self.started_time_end {
            params.push(("startedTimeEnd", t.to_string()));
        }
        if let Some(t) = self.finished_time_begin {
            params.push(("finishedTimeBegin", t.to_string()));
        }
        if let Some(t) = self.finished_time_end {
            params.push(("finishedTimeEnd", t.to_string()));
        }
        if !self.application_types.is_empty() {
            params.push(("applicationTypes", self.application_types.join(",")));
        }
        if !self.application_tags.is_empty() {
            params.push(("applicationTags", self.application_tags.join(",")));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::raw::parse_json_object;
    use crate::raw::unwrap_collection;
    use crate::raw::unwrap_envelope;
    use crate::raw::unwrap_nested;
    use crate::raw::FromJson;

    #[test]
    fn test_cluster_info() {
        let json = br#"
{
  "clusterInfo":
  {
    "id": 1324053971963,
    "startedOn": 1324053971963,
    "state": "STARTED",
    "resourceManagerVersion": "3.3.6",
    "hadoopVersion": "3.3.6"
  }
}
"#;
        let map = parse_json_object(json);
        let info = ClusterInfo::from_json(unwrap_envelope(&map, "clusterInfo").unwrap());
        assert_eq!(info.id, 1324053971963);
        assert_eq!(info.state, ClusterState::Started);
        assert_eq!(info.hadoop_version, "3.3.6");
        // Field the server did not send takes its zero value.
        assert_eq!(info.ha_state, "");
    }

    #[test]
    fn test_apps_collection() {
        let json = br#"{"apps":{"app":[{"id":"app_1","state":"RUNNING"}]}}"#;
        let map = parse_json_object(json);
        let apps: Vec<App> = unwrap_collection(&map, "apps", "app")
            .into_iter()
            .map(App::from_json)
            .collect();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "app_1");
        assert_eq!(apps[0].state, AppState::Running);
    }

    #[test]
    fn test_app_progress_string_or_number() {
        let app = App::from_json(serde_json::json!({"progress": "58.3"}));
        assert_eq!(app.progress, 58.3);
        let app = App::from_json(serde_json::json!({"progress": 100.0}));
        assert_eq!(app.progress, 100.0);
    }

    #[test]
    fn test_unknown_app_state_is_invalid() {
        let app = App::from_json(serde_json::json!({"state": "HIBERNATING"}));
        assert_eq!(app.state, AppState::Invalid);
        let app = App::from_json(serde_json::json!({}));
        assert_eq!(app.state, AppState::Invalid);
    }

    #[test]
    fn test_scheduler_info_nested_queues() {
        let json = br#"
{
  "scheduler": {
    "schedulerInfo": {
      "type": "capacityScheduler",
      "capacity": 100.0,
      "queueName": "root",
      "queues": {
        "queue": [
          {"queueName": "default", "state": "RUNNING", "capacity": 70.0,
           "queues": {"queue": [{"queueName": "a1", "capacity": 30.0}]}}
        ]
      }
    }
  }
}
"#;
        let map = parse_json_object(json);
        let info = SchedulerInfo::from_json(unwrap_nested(&map, "scheduler", "schedulerInfo").unwrap());
        assert_eq!(info.ty, "capacityScheduler");
        assert_eq!(info.queues.queue.len(), 1);
        let default = &info.queues.queue[0];
        assert_eq!(default.state, QueueState::Running);
        assert_eq!(default.queues.queue[0].queue_name, "a1");
    }

    #[test]
    fn test_apps_filter_query_omits_unset() {
        let filter = AppsFilter::default();
        assert!(filter.query().is_empty());

        let filter = AppsFilter {
            states: vec![AppState::Running, AppState::Accepted],
            limit: Some(10),
            ..Default::default()
        };
        let query = filter.query();
        assert_eq!(
            query,
            vec![
                ("states", "RUNNING,ACCEPTED".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_submission_body_wire_names() {
        let submission = ApplicationSubmission {
            application_id: "application_1_0001".to_string(),
            application_name: "wordcount".to_string(),
            unmanaged_am: Some(false),
            resource: Some(Resource {
                memory: 1024,
                v_cores: 1,
            }),
            ..Default::default()
        };
        let body = serde_json::to_value(&submission).unwrap();
        assert_eq!(body["application-id"], "application_1_0001");
        assert_eq!(body["unmanaged-AM"], false);
        assert_eq!(body["resource"]["vCores"], 1);
        assert!(body.get("queue").is_none());
    }
}
