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

use bytes::Bytes;
use common::FakeTransport;
use hadoop_rest::raw::HttpClient;
use hadoop_rest::services::webhdfs::FileType;
use hadoop_rest::services::webhdfs::WebhdfsBuilder;
use hadoop_rest::services::webhdfs::WebhdfsClient;
use hadoop_rest::ErrorKind;
use pretty_assertions::assert_eq;

fn client(transport: &FakeTransport) -> WebhdfsClient {
    WebhdfsBuilder::default()
        .endpoint("http://namenode:9870")
        .user_name("hdfs")
        .http_client(HttpClient::with(transport.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_file_status() {
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"
{
  "FileStatus": {
    "accessTime": 0,
    "blockSize": 0,
    "length": 0,
    "modificationTime": 1320173277227,
    "owner": "webuser",
    "group": "supergroup",
    "pathSuffix": "",
    "permission": "755",
    "replication": 0,
    "type": "DIRECTORY"
  }
}
"#,
    );

    let status = client(&transport).get_file_status("/").await.unwrap().unwrap();
    assert_eq!(status.length, 0);
    assert_eq!(status.permission, 755);
    assert_eq!(status.ty, FileType::Directory);

    let exchanges = transport.exchanges();
    assert_eq!(exchanges.len(), 1);
    assert_eq!(exchanges[0].method, "GET");
    assert_eq!(
        exchanges[0].uri,
        "http://namenode:9870/webhdfs/v1/?op=GETFILESTATUS&user.name=hdfs"
    );
    assert!(!exchanges[0].follow);
}

#[tokio::test]
async fn test_mkdirs_boolean() {
    let transport = FakeTransport::new();
    transport.push(200, r#"{"boolean": true}"#);

    let created = client(&transport).mkdirs("/user/hdfs/out", None).await.unwrap();
    assert!(created);
}

#[tokio::test]
async fn test_mkdirs_remote_exception() {
    let transport = FakeTransport::new();
    transport.push(
        403,
        r#"
{
  "RemoteException": {
    "exception": "AccessControlException",
    "javaClassName": "org.apache.hadoop.security.AccessControlException",
    "message": "Permission denied: user=hdfs, access=WRITE"
  }
}
"#,
    );

    let err = client(&transport).mkdirs("/secure", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
    assert!(err.to_string().contains("AccessControlException"));
    assert!(err.to_string().contains("Permission denied"));
}

#[tokio::test]
async fn test_create_two_phase() {
    let transport = FakeTransport::new();
    transport.push_redirect(
        307,
        "http://datanode:9864/webhdfs/v1/user/hdfs/data.bin?op=CREATE&namenoderpcaddress=nn:9000",
    );
    transport.push(201, "");

    client(&transport)
        .create("/user/hdfs/data.bin", Bytes::from_static(b"payload"), true)
        .await
        .unwrap();

    let exchanges = transport.exchanges();
    assert_eq!(exchanges.len(), 2);

    // Phase one goes to the NameNode with an empty body and asks it not to
    // redirect on the wire.
    assert_eq!(exchanges[0].method, "PUT");
    assert!(exchanges[0].uri.starts_with("http://namenode:9870/webhdfs/v1/user/hdfs/data.bin"));
    assert!(exchanges[0].uri.contains("op=CREATE"));
    assert!(exchanges[0].uri.contains("noredirect=true"));
    assert!(exchanges[0].body.is_empty());

    // Phase two carries the payload to exactly the negotiated location.
    assert_eq!(exchanges[1].method, "PUT");
    assert_eq!(
        exchanges[1].uri,
        "http://datanode:9864/webhdfs/v1/user/hdfs/data.bin?op=CREATE&namenoderpcaddress=nn:9000"
    );
    assert_eq!(exchanges[1].body.as_ref(), b"payload");
}

#[tokio::test]
async fn test_create_location_in_body() {
    // Newer servers honor noredirect and put the location in the JSON body
    // of a 200 instead of a Location header.
    let transport = FakeTransport::new();
    transport.push(
        200,
        r#"{"Location": "http://datanode:9864/webhdfs/v1/f?op=CREATE"}"#,
    );
    transport.push(201, "");

    client(&transport)
        .create("/f", Bytes::from_static(b"x"), false)
        .await
        .unwrap();

    let exchanges = transport.exchanges();
    assert_eq!(exchanges.len(), 2);
    assert_eq!(exchanges[1].uri, "http://datanode:9864/webhdfs/v1/f?op=CREATE");
}

#[tokio::test]
async fn test_create_phase_one_failure_stops_transfer() {
    let transport = FakeTransport::new();
    transport.push(
        403,
        r#"{"RemoteException": {"exception": "AccessControlException", "message": "denied"}}"#,
    );

    let err = client(&transport)
        .create("/forbidden", Bytes::from_static(b"payload"), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);

    // The payload must never be sent after a failed first phase.
    assert_eq!(transport.exchanges().len(), 1);
}

#[tokio::test]
async fn test_create_without_location_is_protocol_error() {
    let transport = FakeTransport::new();
    transport.push(200, "{}");

    let err = client(&transport)
        .create("/f", Bytes::from_static(b"x"), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
    assert_eq!(transport.exchanges().len(), 1);
}

#[tokio::test]
async fn test_open_follows_redirects() {
    let transport = FakeTransport::new();
    transport.push(200, "file content");

    let body = client(&transport).open("/f", Some(2), Some(4)).await.unwrap();
    assert_eq!(body.as_ref(), b"file content");

    let exchanges = transport.exchanges();
    assert!(exchanges[0].follow);
    assert!(exchanges[0].uri.contains("op=OPEN"));
    assert!(exchanges[0].uri.contains("offset=2"));
    assert!(exchanges[0].uri.contains("length=4"));
}

#[tokio::test]
async fn test_empty_path_rejected_without_request() {
    let transport = FakeTransport::new();

    let err = client(&transport).get_file_status("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientParameters);
    assert!(transport.exchanges().is_empty());
}

#[tokio::test]
async fn test_list_status_empty_directory() {
    let transport = FakeTransport::new();
    transport.push(200, r#"{"FileStatuses": {"FileStatus": []}}"#);

    let statuses = client(&transport).list_status("/empty").await.unwrap();
    assert!(statuses.is_empty());
}
