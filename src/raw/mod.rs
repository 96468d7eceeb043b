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

//! Raw modules provide the protocol engine shared by all services.
//!
//! # NOTE
//!
//! This mod is not a part of hadoop-rest's public API contract. We expose it
//! to make it easier to build custom transports and extra services outside
//! the crate.

mod http_util;
pub use http_util::*;

mod serde_util;
pub use serde_util::*;

mod build_util;
pub use build_util::*;

/// BoxedFuture is the type alias of [`futures::future::BoxFuture`].
pub type BoxedFuture<'a, T> = futures::future::BoxFuture<'a, T>;

/// Validate a required string identifier before a URL is ever built.
///
/// Every client method fails fast with `InsufficientParameters` when a
/// required path, job id, task id or application id is empty.
pub fn ensure_non_empty(value: &str, what: &'static str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(crate::Error::new(
            crate::ErrorKind::InsufficientParameters,
            format!("{what} must not be empty"),
        ));
    }
    Ok(())
}
