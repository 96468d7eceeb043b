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

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// Config for the WebHDFS client.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct WebhdfsConfig {
    /// Endpoint of the NameNode, e.g. `http://namenode:9870`.
    /// Defaults to `http://127.0.0.1:9870`.
    pub endpoint: Option<String>,
    /// User name for simple authentication, sent as `user.name=`.
    pub user_name: Option<String>,
    /// Kerberos principal; when set the transport is flagged to negotiate
    /// and no user name is embedded in URLs.
    pub kerberos_principal: Option<String>,
    /// Proxy user sent as `doas=`, regardless of authentication mode.
    pub proxy_user: Option<String>,
    /// Per-call timeout in seconds; `0` blocks indefinitely.
    pub timeout: u64,
    /// Extra headers attached to every request.
    pub headers: HashMap<String, String>,
}

impl Debug for WebhdfsConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsConfig")
            .field("endpoint", &self.endpoint)
            .field("user_name", &self.user_name)
            .field("proxy_user", &self.proxy_user)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
