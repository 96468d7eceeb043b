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

//! MapReduce HistoryServer and ApplicationMaster response messages.
//!
//! Finished and running jobs are separate types on purpose: the
//! HistoryServer reports attempt tallies and phase averages that only
//! exist after the fact, while the ApplicationMaster reports live
//! progress and pending/running splits that make no sense for a job
//! already done.

use serde::Deserialize;

use crate::raw::lenient_f32;

/// The `historyInfo` envelope of the HistoryServer's about resource.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryInfo {
    /// When the HistoryServer started, epoch milliseconds.
    pub started_on: i64,
    /// Hadoop common version.
    pub hadoop_version: String,
    /// Hadoop common build version.
    pub hadoop_build_version: String,
    /// When the Hadoop build was made.
    pub hadoop_version_built_on: String,
}

/// The `info` envelope of the ApplicationMaster's about resource.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MasterInfo {
    /// Application id the ApplicationMaster serves.
    pub app_id: String,
    /// Application name.
    pub name: String,
    /// Owning user.
    pub user: String,
    /// When the ApplicationMaster started, epoch milliseconds.
    pub started_on: i64,
    /// Elapsed milliseconds since start.
    pub elapsed_time: i64,
}

/// A finished job as reported by the HistoryServer.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryJob {
    /// Job id, e.g. `job_1326232085508_0004`.
    pub id: String,
    /// Job name.
    pub name: String,
    /// Queue the job ran in.
    pub queue: String,
    /// Owning user.
    pub user: String,
    /// Final job state.
    pub state: JobState,
    /// When the job was submitted, epoch milliseconds.
    pub submit_time: i64,
    /// When the job started, epoch milliseconds.
    pub start_time: i64,
    /// When the job finished, epoch milliseconds.
    pub finish_time: i64,
    /// Map tasks in total.
    pub maps_total: i64,
    /// Map tasks completed.
    pub maps_completed: i64,
    /// Reduce tasks in total.
    pub reduces_total: i64,
    /// Reduce tasks completed.
    pub reduces_completed: i64,
    /// Whether the job ran uberized inside the AM.
    pub uberized: bool,
    /// Diagnostics text, often empty.
    pub diagnostics: String,
    /// Average map duration in milliseconds.
    pub avg_map_time: i64,
    /// Average reduce phase duration in milliseconds.
    pub avg_reduce_time: i64,
    /// Average shuffle phase duration in milliseconds.
    pub avg_shuffle_time: i64,
    /// Average merge phase duration in milliseconds.
    pub avg_merge_time: i64,
    /// Map attempts that failed.
    pub failed_map_attempts: i64,
    /// Map attempts that were killed.
    pub killed_map_attempts: i64,
    /// Map attempts that succeeded.
    pub successful_map_attempts: i64,
    /// Reduce attempts that failed.
    pub failed_reduce_attempts: i64,
    /// Reduce attempts that were killed.
    pub killed_reduce_attempts: i64,
    /// Reduce attempts that succeeded.
    pub successful_reduce_attempts: i64,
}

/// A live job as reported by the MapReduce ApplicationMaster.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MasterJob {
    /// Job id.
    pub id: String,
    /// Job name.
    pub name: String,
    /// Owning user.
    pub user: String,
    /// Current job state.
    pub state: JobState,
    /// When the job started, epoch milliseconds.
    pub start_time: i64,
    /// When the job finished, zero while running.
    pub finish_time: i64,
    /// Elapsed milliseconds so far.
    pub elapsed_time: i64,
    /// Map phase progress percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub map_progress: f32,
    /// Reduce phase progress percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub reduce_progress: f32,
    /// Map tasks in total.
    pub maps_total: i64,
    /// Map tasks completed.
    pub maps_completed: i64,
    /// Reduce tasks in total.
    pub reduces_total: i64,
    /// Reduce tasks completed.
    pub reduces_completed: i64,
    /// Map tasks waiting for a container.
    pub maps_pending: i64,
    /// Map tasks running.
    pub maps_running: i64,
    /// Reduce tasks waiting for a container.
    pub reduces_pending: i64,
    /// Reduce tasks running.
    pub reduces_running: i64,
    /// Whether the job runs uberized inside the AM.
    pub uberized: bool,
    /// Diagnostics text, often empty.
    pub diagnostics: String,
    /// Map attempts not started yet.
    pub new_map_attempts: i64,
    /// Map attempts running.
    pub running_map_attempts: i64,
    /// Map attempts that failed.
    pub failed_map_attempts: i64,
    /// Map attempts that were killed.
    pub killed_map_attempts: i64,
    /// Map attempts that succeeded.
    pub successful_map_attempts: i64,
    /// Reduce attempts not started yet.
    pub new_reduce_attempts: i64,
    /// Reduce attempts running.
    pub running_reduce_attempts: i64,
    /// Reduce attempts that failed.
    pub failed_reduce_attempts: i64,
    /// Reduce attempts that were killed.
    pub killed_reduce_attempts: i64,
    /// Reduce attempts that succeeded.
    pub successful_reduce_attempts: i64,
}

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Just created.
    New,
    /// Initialized, not running yet.
    Inited,
    /// Running.
    Running,
    /// Succeeded.
    Succeeded,
    /// Failed.
    Failed,
    /// Waiting for tasks to die after a kill request.
    KillWait,
    /// Killed.
    Killed,
    /// Internal error.
    Error,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

impl JobState {
    /// Wire spelling, used for filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::New => "NEW",
            JobState::Inited => "INITED",
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::KillWait => "KILL_WAIT",
            JobState::Killed => "KILLED",
            JobState::Error => "ERROR",
            JobState::Invalid => "INVALID",
        }
    }
}

/// One entry of `jobAttempts.jobAttempt[]`: an ApplicationMaster run for
/// the job.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobAttempt {
    /// Attempt ordinal.
    pub id: i32,
    /// Id of the hosting node.
    pub node_id: String,
    /// HTTP address of the hosting node.
    pub node_http_address: String,
    /// Link to the attempt logs.
    pub logs_link: String,
    /// Container the ApplicationMaster ran in.
    pub container_id: String,
    /// When the attempt started, epoch milliseconds.
    pub start_time: i64,
}

/// The `conf` envelope: the job configuration as stored with the job.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobConf {
    /// Where the configuration file lives.
    pub path: String,
    /// Configuration properties.
    pub property: Vec<ConfProperty>,
}

impl JobConf {
    /// Look up one property by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.property
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// One configuration property.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfProperty {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
}

/// One entry of `tasks.task[]` / the `task` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    /// Task id, e.g. `task_1326232085508_0004_m_000000`.
    pub id: String,
    /// Task state.
    pub state: TaskState,
    /// Map or reduce.
    #[serde(rename = "type")]
    pub ty: TaskType,
    /// Id of the attempt that succeeded, empty otherwise.
    pub successful_attempt: String,
    /// Progress percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub progress: f32,
    /// When the task started, epoch milliseconds.
    pub start_time: i64,
    /// When the task finished, epoch milliseconds.
    pub finish_time: i64,
    /// Elapsed milliseconds.
    pub elapsed_time: i64,
}

/// Kind of a task.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskType {
    /// A map task.
    Map,
    /// A reduce task.
    Reduce,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

impl TaskType {
    /// Wire spelling, lowercase as the `type` filter expects.
    pub fn as_filter(&self) -> &'static str {
        match self {
            TaskType::Map => "m",
            TaskType::Reduce => "r",
            TaskType::Invalid => "",
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Just created.
    New,
    /// Scheduled, waiting for an attempt to start.
    Scheduled,
    /// Running.
    Running,
    /// Succeeded.
    Succeeded,
    /// Failed.
    Failed,
    /// Waiting for attempts to die after a kill request.
    KillWait,
    /// Killed.
    Killed,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

/// One entry of `taskAttempts.taskAttempt[]` / the `taskAttempt`
/// envelope.
///
/// The shuffle and merge phase fields are only meaningful on reduce
/// attempts and stay zero on map attempts.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskAttempt {
    /// Attempt id, e.g. `attempt_1326232085508_0004_m_000000_0`.
    pub id: String,
    /// Rack of the hosting node.
    pub rack: String,
    /// Attempt state.
    pub state: TaskAttemptState,
    /// Map or reduce.
    #[serde(rename = "type")]
    pub ty: TaskType,
    /// Container the attempt ran in.
    pub assigned_container_id: String,
    /// HTTP address of the hosting node.
    pub node_http_address: String,
    /// Diagnostics text, often empty.
    pub diagnostics: String,
    /// Progress percentage.
    #[serde(deserialize_with = "lenient_f32")]
    pub progress: f32,
    /// When the attempt started, epoch milliseconds.
    pub start_time: i64,
    /// When the attempt finished, epoch milliseconds.
    pub finish_time: i64,
    /// Elapsed milliseconds.
    pub elapsed_time: i64,
    /// When the shuffle phase finished, reduce attempts only.
    pub shuffle_finish_time: i64,
    /// When the merge phase finished, reduce attempts only.
    pub merge_finish_time: i64,
    /// Shuffle phase duration in milliseconds, reduce attempts only.
    pub elapsed_shuffle_time: i64,
    /// Merge phase duration in milliseconds, reduce attempts only.
    pub elapsed_merge_time: i64,
    /// Reduce phase duration in milliseconds, reduce attempts only.
    pub elapsed_reduce_time: i64,
}

/// Task attempt lifecycle state.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAttemptState {
    /// Just created.
    New,
    /// Waiting for a container.
    Unassigned,
    /// Container assigned, not running yet.
    Assigned,
    /// Running.
    Running,
    /// Output ready, waiting for the commit grant.
    CommitPending,
    /// Cleaning up after success.
    SuccessContainerCleanup,
    /// Succeeded.
    Succeeded,
    /// Cleaning up the container after a failure.
    FailContainerCleanup,
    /// Cleaning up task state after a failure.
    FailTaskCleanup,
    /// Failed.
    Failed,
    /// Cleaning up the container after a kill.
    KillContainerCleanup,
    /// Cleaning up task state after a kill.
    KillTaskCleanup,
    /// Killed.
    Killed,
    /// Unrecognized server vocabulary.
    #[default]
    #[serde(other)]
    Invalid,
}

/// Filters for listing jobs; unset fields are omitted from the query
/// string entirely.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JobsFilter {
    /// Keep jobs of this user.
    pub user: Option<String>,
    /// Keep jobs in this state.
    pub state: Option<JobState>,
    /// Keep jobs that ran in this queue.
    pub queue: Option<String>,
    /// Return at most this many jobs.
    pub limit: Option<u32>,
    /// Keep jobs started at or after this time.
    pub started_time_begin: Option<i64>,
    /// Keep jobs started at or before this time.
    pub started_time_end: Option<i64>,
    /// Keep jobs finished at or after this time.
    pub finished_time_begin: Option<i64>,
    /// Keep jobs finished at or before this time.
    pub finished_time_end: Option<i64>,
}

impl JobsFilter {
    pub(super) fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(user) = &self.user {
            params.push(("user", user.clone()));
        }
        if let Some(state) = self.state {
            params.push(("state", state.as_str().to_string()));
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
    use crate::raw::FromJson;

    #[test]
    fn test_history_job() {
        let json = br#"
{
  "job": {
    "id": "job_1326232085508_0004",
    "name": "word count",
    "queue": "default",
    "user": "user1",
    "state": "SUCCEEDED",
    "mapsTotal": 1,
    "mapsCompleted": 1,
    "reducesTotal": 1,
    "reducesCompleted": 1,
    "uberized": false,
    "avgMapTime": 2671,
    "successfulMapAttempts": 1
  }
}
"#;
        let map = parse_json_object(json);
        let job = HistoryJob::from_json(unwrap_envelope(&map, "job").unwrap());
        assert_eq!(job.state, JobState::Succeeded);
        assert_eq!(job.avg_map_time, 2671);
        assert_eq!(job.successful_map_attempts, 1);
        assert!(!job.uberized);
    }

    #[test]
    fn test_master_job_progress() {
        let job = MasterJob::from_json(serde_json::json!({
            "id": "job_1326232085508_0004",
            "state": "RUNNING",
            "mapProgress": 100.0,
            "reduceProgress": "36.5",
            "mapsRunning": 0,
            "reducesRunning": 1
        }));
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.map_progress, 100.0);
        assert_eq!(job.reduce_progress, 36.5);
        assert_eq!(job.reduces_running, 1);
    }

    #[test]
    fn test_task_type_and_state() {
        let json = br#"
{
  "tasks": {
    "task": [
      {"id": "task_1326232085508_0004_m_000000", "type": "MAP",
       "state": "SUCCEEDED", "progress": 100.0,
       "successfulAttempt": "attempt_1326232085508_0004_m_000000_0"},
      {"id": "task_1326232085508_0004_r_000000", "type": "REDUCE",
       "state": "RUNNING", "progress": 58.0}
    ]
  }
}
"#;
        let map = parse_json_object(json);
        let tasks: Vec<Task> = unwrap_collection(&map, "tasks", "task")
            .into_iter()
            .map(Task::from_json)
            .collect();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].ty, TaskType::Map);
        assert_eq!(tasks[0].state, TaskState::Succeeded);
        assert_eq!(tasks[1].ty, TaskType::Reduce);
        assert_eq!(tasks[1].progress, 58.0);
    }

    #[test]
    fn test_job_conf_lookup() {
        let json = br#"
{
  "conf": {
    "path": "hdfs://host:9000/user/user1/.staging/job_1_0001/job.xml",
    "property": [
      {"name": "mapreduce.job.name", "value": "word count"},
      {"name": "mapreduce.job.queuename", "value": "default"}
    ]
  }
}
"#;
        let map = parse_json_object(json);
        let conf = JobConf::from_json(unwrap_envelope(&map, "conf").unwrap());
        assert_eq!(conf.get("mapreduce.job.name"), Some("word count"));
        assert_eq!(conf.get("no.such.key"), None);
    }

    #[test]
    fn test_jobs_filter_query_omits_unset() {
        assert!(JobsFilter::default().query().is_empty());

        let filter = JobsFilter {
            user: Some("user1".to_string()),
            state: Some(JobState::Succeeded),
            ..Default::default()
        };
        assert_eq!(
            filter.query(),
            vec![
                ("user", "user1".to_string()),
                ("state", "SUCCEEDED".to_string()),
            ]
        );
    }
}
