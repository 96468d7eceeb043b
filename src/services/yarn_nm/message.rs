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

//! YARN NodeManager response messages.

use serde::Deserialize;

/// The `nodeInfo` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeInfo {
    /// Node id, `host:port`.
    pub id: String,
    /// Hostname.
    pub node_host_name: String,
    /// Virtual memory allocatable to containers, in MB.
    #[serde(rename = "totalVmemAllocatedContainersMB")]
    pub total_vmem_allocated_containers_mb: i64,
    /// Physical memory allocatable to containers, in MB.
    #[serde(rename = "totalPmemAllocatedContainersMB")]
    pub total_pmem_allocated_containers_mb: i64,
    /// Virtual cores allocatable to containers.
    pub total_v_cores_allocated_containers: i64,
    /// Whether virtual memory enforcement is on.
    pub vmem_check_enabled: bool,
    /// Whether physical memory enforcement is on.
    pub pmem_check_enabled: bool,
    /// When the node last reported to the ResourceManager.
    pub last_node_update_time: i64,
    /// Whether the health checker considers the node healthy.
    pub node_healthy: bool,
    /// Last health report text.
    pub health_report: String,
    /// NodeManager version.
    pub node_manager_version: String,
    /// NodeManager build version.
    pub node_manager_build_version: String,
    /// When the NodeManager build was made.
    pub node_manager_version_built_on: String,
    /// Hadoop common version.
    pub hadoop_version: String,
    /// Hadoop common build version.
    pub hadoop_build_version: String,
    /// When the Hadoop build was made.
    pub hadoop_version_built_on: String,
}

/// One entry of `apps.app[]` as seen by the NodeManager.
///
/// Distinct from the ResourceManager's application record: the
/// NodeManager only knows the local slice of the application.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NmApp {
    /// Application id.
    pub id: String,
    /// Local application state.
    pub state: NmAppState,
    /// Owning user.
    pub user: String,
    /// Containers of this application running on this node.
    pub containerids: Vec<String>,
}

/// Application state local to one NodeManager.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NmAppState {
    /// Just arrived.
    New,
    /// Localizing application level resources.
    Initing,
    /// At least one container runs.
    Running,
    /// Waiting for containers to finish.
    FinishingContainersWait,
    /// Cleaning up application level resources.
    ApplicationResourcesCleaningup,
    /// Done on this node.
    Finished,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

/// One entry of `containers.container[]` / the `container` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    /// Container id.
    pub id: String,
    /// Container state.
    pub state: ContainerState,
    /// Exit code, `-1000` while the container still runs.
    pub exit_code: i32,
    /// Diagnostics text, often empty.
    pub diagnostics: String,
    /// Owning user.
    pub user: String,
    /// Memory granted to the container, in MB.
    #[serde(rename = "totalMemoryNeededMB")]
    pub total_memory_needed_mb: i64,
    /// Virtual cores granted to the container.
    pub total_v_cores_needed: i64,
    /// Link to the container logs.
    pub container_logs_link: String,
    /// Hosting node id.
    pub node_id: String,
}

/// Container state as tracked by the NodeManager.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerState {
    /// Just arrived.
    New,
    /// Localizing container resources.
    Localizing,
    /// Resources in place, not launched yet.
    Localized,
    /// Running.
    Running,
    /// Exited with code zero.
    ExitedWithSuccess,
    /// Exited with a non-zero code.
    ExitedWithFailure,
    /// Kill requested.
    Killing,
    /// Cleaned up after a kill.
    ContainerCleanedupAfterKill,
    /// Cleaning up container resources.
    ContainerResourcesCleaningup,
    /// Fully done.
    Done,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::raw::parse_json_object;
    use crate::raw::unwrap_collection;
    use crate::raw::unwrap_envelope;
    use crate::raw::FromJson;

    #[test]
    fn test_node_info() {
        let json = br#"
{
  "nodeInfo": {
    "id": "host.domain.com:8041",
    "nodeHostName": "host.domain.com",
    "totalVmemAllocatedContainersMB": 17203,
    "totalPmemAllocatedContainersMB": 8192,
    "totalVCoresAllocatedContainers": 8,
    "nodeHealthy": true,
    "healthReport": ""
  }
}
"#;
        let map = parse_json_object(json);
        let info = NodeInfo::from_json(unwrap_envelope(&map, "nodeInfo").unwrap());
        assert_eq!(info.node_host_name, "host.domain.com");
        assert_eq!(info.total_pmem_allocated_containers_mb, 8192);
        assert!(info.node_healthy);
    }

    #[test]
    fn test_nm_app_with_containers() {
        let json = br#"
{
  "apps": {
    "app": [
      {
        "id": "application_1326121700862_0005",
        "state": "RUNNING",
        "user": "hive",
        "containerids": [
          "container_1326121700862_0005_01_000003",
          "container_1326121700862_0005_01_000001"
        ]
      }
    ]
  }
}
"#;
        let map = parse_json_object(json);
        let apps: Vec<NmApp> = unwrap_collection(&map, "apps", "app")
            .into_iter()
            .map(NmApp::from_json)
            .collect();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].state, NmAppState::Running);
        assert_eq!(apps[0].containerids.len(), 2);
    }

    #[test]
    fn test_container_state_vocabulary() {
        let container = Container::from_json(serde_json::json!({
            "id": "container_1_0001_01_000001",
            "state": "EXITED_WITH_SUCCESS",
            "exitCode": 0
        }));
        assert_eq!(container.state, ContainerState::ExitedWithSuccess);

        let container = Container::from_json(serde_json::json!({"state": "TELEPORTED"}));
        assert_eq!(container.state, ContainerState::Invalid);
    }
}
