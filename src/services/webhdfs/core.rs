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
use http::header::CONTENT_LENGTH;
use http::HeaderMap;
use http::Method;
use http::Request;
use http::Response;
use log::debug;

use super::error::parse_error;
use crate::raw::*;
use crate::Auth;
use crate::Result;

pub(super) const WEBHDFS_BASE: &str = "/webhdfs/v1";

/// Connection configuration and request plumbing shared by every WebHDFS
/// call. Immutable after construction.
pub struct WebhdfsCore {
    pub endpoint: String,
    pub auth: Auth,
    pub proxy_user: Option<String>,
    pub extra_headers: HeaderMap,
    pub client: HttpClient,
}

impl Debug for WebhdfsCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsCore")
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth)
            .finish()
    }
}

impl WebhdfsCore {
    pub fn url(&self, path: &str, op: &str, params: &[(&str, String)]) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        build_rest_url(
            &self.endpoint,
            WEBHDFS_BASE,
            &path,
            Some(op),
            params,
            &self.auth,
            self.proxy_user.as_deref(),
        )
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        follow: bool,
        body: Bytes,
    ) -> Result<Request<Bytes>> {
        let mut builder = Request::builder().method(method).uri(url);
        for (name, value) in self.extra_headers.iter() {
            builder = builder.header(name, value);
        }
        if follow {
            builder = builder.extension(FollowRedirect);
        }
        if self.auth.is_negotiate() {
            builder = builder.extension(Negotiate);
        }
        builder.body(body).map_err(new_request_build_error)
    }

    /// Perform one body-less WebHDFS operation.
    pub async fn op(
        &self,
        method: Method,
        path: &str,
        op: &str,
        params: &[(&str, String)],
        follow: bool,
    ) -> Result<Response<Bytes>> {
        let url = self.url(path, op, params);
        debug!("webhdfs {op}: {url}");

        let req = self.build_request(method, &url, follow, Bytes::new())?;
        self.client.send(req).await
    }

    /// The two-phase data transfer protocol.
    ///
    /// Phase one asks the NameNode with `noredirect=true` for the DataNode
    /// that will take the payload; phase two sends the payload to exactly
    /// that URL. A failure in phase one never reaches phase two, and a
    /// phase-two failure leaves the resource in whatever state the server
    /// put it in.
    pub async fn transfer(
        &self,
        method: Method,
        path: &str,
        op: &str,
        params: &[(&str, String)],
        payload: Bytes,
    ) -> Result<Response<Bytes>> {
        let mut params = params.to_vec();
        params.push(("noredirect", "true".to_string()));

        let url = self.url(path, op, &params);
        debug!("webhdfs {op} negotiating: {url}");

        let req = self.build_request(method.clone(), &url, false, Bytes::new())?;
        let resp = self.client.send(req).await?;
        let (parts, body) = resp.into_parts();
        if parts.status.as_u16() >= 400 {
            return Err(parse_error(&parts, &body));
        }

        let location = parse_redirect_location(&parts, &body)?;
        debug!("webhdfs {op} transferring to {location}");

        let mut builder = Request::builder()
            .method(method)
            .uri(&location)
            .header(CONTENT_LENGTH, payload.len());
        for (name, value) in self.extra_headers.iter() {
            builder = builder.header(name, value);
        }
        if self.auth.is_negotiate() {
            builder = builder.extension(Negotiate);
        }
        let req = builder.body(payload).map_err(new_request_build_error)?;

        let resp = self.client.send(req).await?;
        let (parts, body) = resp.into_parts();
        if parts.status.as_u16() >= 400 {
            return Err(parse_error(&parts, &body));
        }
        Ok(Response::from_parts(parts, body))
    }
}
