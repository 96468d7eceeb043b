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

//! hadoop-rest is a typed client for the HTTP/REST APIs of a Hadoop
//! cluster: WebHDFS, the YARN ResourceManager and NodeManager, and the
//! MapReduce History and Application Master services.
//!
//! Each service exposes a builder and a client; every client method builds
//! the documented URL, performs the HTTP exchange (including WebHDFS's
//! two-step redirect protocol for data-carrying operations) and decodes the
//! JSON response into a typed record.
//!
//! # Quick Start
//!
//! ```no_run
//! use hadoop_rest::services::webhdfs::WebhdfsBuilder;
//! use hadoop_rest::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = WebhdfsBuilder::default()
//!         .endpoint("http://namenode.example.com:9870")
//!         .user_name("hadoop")
//!         .build()?;
//!
//!     // Create a directory.
//!     let created = client.mkdirs("/demo", Some(755)).await?;
//!     assert!(created);
//!
//!     // Upload a file, then stat it.
//!     client.create("/demo/hello.txt", "Hello, World!".into(), true).await?;
//!     let status = client.get_file_status("/demo/hello.txt").await?;
//!     if let Some(status) = status {
//!         println!("length: {}", status.length);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]
// Deny unused qualifications.
#![deny(unused_qualifications)]

// Private module with public types, they will be accessed via `hadoop_rest::Xxxx`
mod types;
pub use types::*;

// Public modules, they will be accessed like `hadoop_rest::services::Xxxx`
pub mod raw;
pub mod services;
