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
use hadoop_rest::services::yarn_nm::ContainerState;
use hadoop_rest::services::yarn_nm::NodeManagerBuilder;
use hadoop_rest::services::yarn_rm::AppState;
use hadoop_rest::services::yarn_rm::AppsFilter;
use hadoop_rest::services::yarn_rm::ResourceManagerBuilder;
use hadoop_rest::services::yarn_rm::ResourceManagerClient;
use hadoop_rest::ErrorKind;
use pretty_assertions::assert_eq;

fn rm_client(transport: &FakeTransport) -> ResourceManagerClient {
    ResourceManagerBuilder::default()
        .endpoint("http://rm:8088")
        .http_client(HttpClient::with(transport.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_apps_with_filter() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "apps": {
    "app": [
      {
        "id": "app_1",
        "user": "user1",
        "name": "sleep",
        "state": "RUNNING",
        "finalStatus": "UNDEFINED",
        "progress": 38.2
      }
    ]
  }
}
"#,
    );

    let filter = AppsFilter {
        states: vec![AppState::Running, AppState::Accepted],
        limit: Some(5),
        ..Default::default()
    };
    let apps = rm_client(&transport).apps(&filter).await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id, "app_1");
    assert_eq!(apps[0].state, AppState::Running);

    // Comma separated state list survives percent encoding.
    let uri = &transport.exchanges()[0].uri;
    assert!(uri.starts_with("http://rm:8088/ws/v1/cluster/apps?"));
    assert!(uri.contains("states=RUNNING%2CACCEPTED"));
    assert!(uri.contains("limit=5"));
}

#[tokio::test]
async fn test_kill_app_sends_state_body() {
    let transport = FakeTransport::new();
    transport.push(202, r#"{"state": "KILLING"}"#);

    let state = rm_client(&transport)
        .kill_app("application_1_0001")
        .await
        .unwrap();
    // An in-flight transition reports whatever the server says; unknown
    // vocabulary degrades to Invalid rather than failing.
    assert_eq!(state, AppState::Invalid);

    let exchanges = transport.exchanges();
    assert_eq!(exchanges[0].method, "PUT");
    assert!(exchanges[0]
        .uri
        .starts_with("http://rm:8088/ws/v1/cluster/apps/application_1_0001/state"));
    assert_eq!(exchanges[0].body.as_ref(), br#"{"state":"KILLED"}"#);
}

#[tokio::test]
async fn test_set_app_state_completed() {
    let transport = FakeTransport::new();
    transport.push(200, r#"{"state": "KILLED"}"#);

    let state = rm_client(&transport)
        .set_app_state("application_1_0001", AppState::Killed)
        .await
        .unwrap();
    assert_eq!(state, AppState::Killed);
}

#[tokio::test]
async fn test_set_app_state_off_script_status() {
    let transport = FakeTransport::new();
    transport.push(204, "");

    let err = rm_client(&transport)
        .set_app_state("application_1_0001", AppState::Killed)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedReturn);
}

#[tokio::test]
async fn test_app_not_found() {
    let transport = FakeTransport::new();
    transport.push(
        404,
        r#"{"RemoteException": {"exception": "NotFoundException", "message": "app not found"}}"#,
    );

    let err = rm_client(&transport).app("application_1_9999").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
    assert!(err.to_string().contains("NotFoundException"));
}

#[tokio::test]
async fn test_nodemanager_containers() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "containers": {
    "container": [
      {
        "id": "container_1326121700862_0006_01_000001",
        "state": "RUNNING",
        "exitCode": -1000,
        "user": "user1",
        "totalMemoryNeededMB": 2048,
        "containerLogsLink": "http://host:8042/node/containerlogs/container_1326121700862_0006_01_000001/user1"
      }
    ]
  }
}
"#,
    );

    let client = NodeManagerBuilder::default()
        .endpoint("http://nm:8042")
        .http_client(HttpClient::with(transport.clone()))
        .build()
        .unwrap();

    let containers = client.containers().await.unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].state, ContainerState::Running);
    assert_eq!(containers[0].exit_code, -1000);
    assert_eq!(containers[0].total_memory_needed_mb, 2048);

    assert_eq!(
        transport.exchanges()[0].uri,
        "http://nm:8042/ws/v1/node/containers"
    );
}
