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

//! A scripted transport for exercising clients without a cluster.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use bytes::Bytes;
use hadoop_rest::raw::FollowRedirect;
use hadoop_rest::raw::HttpFetch;
use hadoop_rest::Error;
use hadoop_rest::ErrorKind;
use hadoop_rest::Result;
use http::header::LOCATION;
use http::Request;
use http::Response;
use http::StatusCode;

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: String,
    pub uri: String,
    pub body: Bytes,
    pub follow: bool,
}

/// Answers requests from a fixed script and records what was asked.
#[derive(Default, Clone)]
pub struct FakeTransport {
    exchanges: Arc<Mutex<Vec<Exchange>>>,
    responses: Arc<Mutex<VecDeque<Response<Bytes>>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next response with a JSON (or empty) body.
    pub fn push(&self, status: u16, body: &str) {
        let resp = Response::builder()
            .status(StatusCode::from_u16(status).unwrap())
            .body(Bytes::from(body.to_string()))
            .unwrap();
        self.responses.lock().unwrap().push_back(resp);
    }

    /// Script the next response as a redirect with a `Location` header.
    pub fn push_redirect(&self, status: u16, location: &str) {
        let resp = Response::builder()
            .status(StatusCode::from_u16(status).unwrap())
            .header(LOCATION, location)
            .body(Bytes::new())
            .unwrap();
        self.responses.lock().unwrap().push_back(resp);
    }

    /// Everything that was asked so far, in order.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges.lock().unwrap().clone()
    }
}

impl HttpFetch for FakeTransport {
    async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let follow = req.extensions().get::<FollowRedirect>().is_some();
        let (parts, body) = req.into_parts();
        self.exchanges.lock().unwrap().push(Exchange {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            body,
            follow,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::new(ErrorKind::Unexpected, "transport script exhausted"))
    }
}
