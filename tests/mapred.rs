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

mod common;

use common::FakeTransport;
use hadoop_rest::raw::HttpClient;
use hadoop_rest::services::mapred::FileSystemCounters;
use hadoop_rest::services::mapred::HistoryBuilder;
use hadoop_rest::services::mapred::HistoryClient;
use hadoop_rest::services::mapred::JobState;
use hadoop_rest::services::mapred::JobsFilter;
use hadoop_rest::services::mapred::MasterBuilder;
use hadoop_rest::services::mapred::TaskType;
use hadoop_rest::services::mapred::TypedCounters;
use hadoop_rest::ErrorKind;
use pretty_assertions::assert_eq;

fn history_client(transport: &FakeTransport) -> HistoryClient {
    HistoryBuilder::default()
        .endpoint("http://jhs:19888")
        .http_client(HttpClient::with(transport.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_history_info_lives_at_history_root() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"{"historyInfo": {"startedOn": 1353068044544, "hadoopVersion": "3.3.6"}}"#,
    );

    let info = history_client(&transport).info().await.unwrap();
    assert_eq!(info.started_on, 1353068044544);
    assert_eq!(info.hadoop_version, "3.3.6");

    assert_eq!(
        transport.exchanges()[0].uri,
        "http://jhs:19888/ws/v1/history/info"
    );
}

#[tokio::test]
async fn test_jobs_filter_and_parse() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "jobs": {
    "job": [
      {
        "id": "job_1326232085508_0004",
        "name": "word count",
        "user": "user1",
        "state": "SUCCEEDED",
        "mapsTotal": 1,
        "reducesTotal": 1
      }
    ]
  }
}
"#,
    );

    let filter = JobsFilter {
        user: Some("user1".to_string()),
        state: Some(JobState::Succeeded),
        ..Default::default()
    };
    let jobs = history_client(&transport).jobs(&filter).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].state, JobState::Succeeded);

    let uri = &transport.exchanges()[0].uri;
    assert!(uri.starts_with("http://jhs:19888/ws/v1/history/mapreduce/jobs?"));
    assert!(uri.contains("user=user1"));
    assert!(uri.contains("state=SUCCEEDED"));
}

#[tokio::test]
async fn test_tasks_type_filter() {
    let transport = FakeTransport::new();
    transport.push(200, r#"{"tasks": {"task": []}}"#);

    let tasks = history_client(&transport)
        .tasks("job_1326232085508_0004", Some(TaskType::Map))
        .await
        .unwrap();
    assert!(tasks.is_empty());

    assert!(transport.exchanges()[0].uri.contains("tasks?type=m"));
}

#[tokio::test]
async fn test_job_counters_into_typed_families() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "jobCounters": {
    "id": "job_1326232085508_0004",
    "counterGroup": [
      {
        "counterGroupName": "org.apache.hadoop.mapreduce.FileSystemCounter",
        "counter": [
          {"name": "FILE_BYTES_READ", "totalCounterValue": 123,
           "mapCounterValue": 23, "reduceCounterValue": 100}
        ]
      },
      {
        "counterGroupName": "com.example.CustomCounters",
        "counter": [{"name": "WIDGETS", "totalCounterValue": 9}]
      }
    ]
  }
}
"#,
    );

    let counters = history_client(&transport)
        .job_counters("job_1326232085508_0004")
        .await
        .unwrap();
    assert_eq!(counters.counter_group.len(), 2);

    // A single group converts when asked for the right family...
    let fs = FileSystemCounters::from_group(&counters.counter_group[0]).unwrap();
    assert_eq!(fs.file_bytes_read, 123);

    // ...and the wrong family is a caller error, not a silent zero.
    let err = FileSystemCounters::from_group(&counters.counter_group[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCounterGroup);

    // The aggregate view keeps what it knows and skips the rest.
    let typed = TypedCounters::from_groups(&counters.counter_group);
    assert_eq!(typed.file_system.unwrap().file_bytes_read, 123);
    assert!(typed.shuffle_errors.is_none());
}

#[tokio::test]
async fn test_master_requires_application_id() {
    let err = MasterBuilder::default()
        .endpoint("http://rm:8088")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_master_addresses_the_proxy() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "jobs": {
    "job": [
      {"id": "job_1326232085508_0004", "state": "RUNNING",
       "mapProgress": 100.0, "reduceProgress": 52.5}
    ]
  }
}
"#,
    );

    let client = MasterBuilder::default()
        .endpoint("http://rm:8088")
        .application_id("application_1326232085508_0004")
        .http_client(HttpClient::with(transport.clone()))
        .build()
        .unwrap();

    let jobs = client.jobs().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].reduce_progress, 52.5);

    assert_eq!(
        transport.exchanges()[0].uri,
        "http://rm:8088/proxy/application_1326232085508_0004/ws/v1/mapreduce/jobs"
    );
}
