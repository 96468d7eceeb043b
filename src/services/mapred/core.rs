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

use std::fmt::Debug;
use std::fmt::Formatter;

use bytes::Bytes;
use http::HeaderMap;
use http::Method;
use http::Request;
use http::Response;

use crate::raw::build_rest_url;
use crate::raw::new_request_build_error;
use crate::raw::HttpClient;
use crate::raw::Negotiate;
use crate::types::Auth;
use crate::Result;

/// Prefix of the HistoryServer's job resources.
pub(super) const HISTORY_BASE: &str = "/ws/v1/history/mapreduce";

/// Prefix of the HistoryServer's about resource, one level above the job
/// resources.
pub(super) const HISTORY_ABOUT_BASE: &str = "/ws/v1/history";

/// Prefix of a running job's ApplicationMaster resources, reached through
/// the ResourceManager proxy.
pub(super) fn master_base(application_id: &str) -> String {
    format!("/proxy/{application_id}/ws/v1/mapreduce")
}

/// Shared request plumbing for the MapReduce web services. The base
/// prefix varies per call because the HistoryServer exposes two roots
/// and the ApplicationMaster is addressed per application.
pub struct MapredCore {
    pub endpoint: String,
    pub auth: Auth,
    pub proxy_user: Option<String>,
    pub extra_headers: HeaderMap,
    pub client: HttpClient,
}

impl Debug for MapredCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapredCore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl MapredCore {
    /// Issue a GET against `{endpoint}{base}{path}`.
    pub async fn get(
        &self,
        base: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Response<Bytes>> {
        let url = build_rest_url(
            &self.endpoint,
            base,
            path,
            None,
            params,
            &self.auth,
            self.proxy_user.as_deref(),
        );
        log::debug!("mapred get {url}");

        let mut req = Request::builder().method(Method::GET).uri(&url);
        for (name, value) in self.extra_headers.iter() {
            req = req.header(name, value);
        }
        if self.auth.is_negotiate() {
            req = req.extension(Negotiate);
        }
        let req = req.body(Bytes::new()).map_err(new_request_build_error)?;

        self.client.send(req).await
    }
}
