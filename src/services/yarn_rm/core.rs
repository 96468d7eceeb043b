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
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Request;
use http::Response;
use serde_json::Value;

use crate::raw::build_rest_url;
use crate::raw::new_json_serialize_error;
use crate::raw::new_request_build_error;
use crate::raw::HttpClient;
use crate::raw::Negotiate;
use crate::types::Auth;
use crate::Result;

/// Prefix of every ResourceManager cluster resource.
pub(super) const CLUSTER_BASE: &str = "/ws/v1/cluster";

/// Shared request plumbing for the ResourceManager web service.
pub struct ResourceManagerCore {
    pub endpoint: String,
    pub auth: Auth,
    pub proxy_user: Option<String>,
    pub extra_headers: HeaderMap,
    pub client: HttpClient,
}

impl Debug for ResourceManagerCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManagerCore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ResourceManagerCore {
    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        build_rest_url(
            &self.endpoint,
            CLUSTER_BASE,
            path,
            None,
            params,
            &self.auth,
            self.proxy_user.as_deref(),
        )
    }

    fn build_request(&self, method: Method, url: &str, body: Bytes) -> Result<Request<Bytes>> {
        let mut req = Request::builder().method(method).uri(url);
        for (name, value) in self.extra_headers.iter() {
            req = req.header(name, value);
        }
        if self.auth.is_negotiate() {
            req = req.extension(Negotiate);
        }
        req.body(body).map_err(new_request_build_error)
    }

    /// Issue a GET against a cluster resource.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Response<Bytes>> {
        let url = self.url(path, params);
        log::debug!("resourcemanager get {url}");

        let req = self.build_request(Method::GET, &url, Bytes::new())?;
        self.client.send(req).await
    }

    /// Issue a request carrying a JSON body against a cluster resource.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Response<Bytes>> {
        let url = self.url(path, &[]);
        log::debug!("resourcemanager {method} {url}");

        let body = serde_json::to_vec(body).map_err(new_json_serialize_error)?;
        let mut req = self.build_request(method, &url, Bytes::from(body))?;
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.client.send(req).await
    }
}
