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

/// Config for the YARN NodeManager web service.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct NodeManagerConfig {
    /// NodeManager address, e.g. `http://nm:8042`.
    ///
    /// Defaults to `http://127.0.0.1:8042` if not set.
    pub endpoint: Option<String>,
    /// User to act as when simple authentication is in effect.
    pub user_name: Option<String>,
    /// Kerberos principal; takes precedence over `user_name`.
    pub kerberos_principal: Option<String>,
    /// User to impersonate via the `doas` mechanism.
    pub proxy_user: Option<String>,
    /// Request timeout in seconds, `0` meaning unbounded.
    pub timeout: u64,
    /// Extra headers attached to every request.
    pub headers: HashMap<String, String>,
}

impl Debug for NodeManagerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeManagerConfig")
            .field("endpoint", &self.endpoint)
            .field("user_name", &self.user_name)
            .field("kerberos_principal", &self.kerberos_principal)
            .field("proxy_user", &self.proxy_user)
            .finish_non_exhaustive()
    }
}
