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
use std::future::Future;
use std::mem;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::Request;
use http::Response;

use crate::raw::BoxedFuture;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// Request extension: follow 3xx responses inside the transport instead of
/// surfacing them.
///
/// Only checksum, symlink and snapshot-rename style operations opt in; the
/// two-phase upload flows handle the redirect manually.
#[derive(Debug, Clone, Copy)]
pub struct FollowRedirect;

/// Request extension: the transport should perform SPNEGO (Kerberos)
/// negotiation for this request.
///
/// The default reqwest-backed transport carries this marker through without
/// acting on it; deployments that need Kerberos provide their own
/// [`HttpFetch`] implementation that honors it.
#[derive(Debug, Clone, Copy)]
pub struct Negotiate;

/// HttpFetcher is a type erased [`HttpFetch`].
pub type HttpFetcher = Arc<dyn HttpFetchDyn>;

/// A HTTP client instance for hadoop-rest's services.
///
/// One exchange per call: the whole response body is read into memory and
/// returned together with the status and headers. No retries, no caching.
#[derive(Clone)]
pub struct HttpClient {
    fetcher: HttpFetcher,
}

/// We don't want users to know details about our clients.
impl Debug for HttpClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish()
    }
}

impl HttpClient {
    /// Create a new http client backed by reqwest.
    ///
    /// `timeout` of zero means the call blocks until the server answers; a
    /// positive value fails the exchange with a transport error once
    /// exceeded.
    pub fn new(timeout: Duration) -> Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(timeout)?);
        Ok(Self { fetcher })
    }

    /// Construct `Self` with a caller-provided transport.
    pub fn with(client: impl HttpFetch) -> Self {
        let fetcher = Arc::new(client);
        Self { fetcher }
    }

    /// Send a request and consume the full response.
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.fetcher.fetch(req).await
    }
}

/// HttpFetch is the trait to perform one HTTP exchange in async way.
///
/// Implement this trait to provide a custom transport, e.g. one that honors
/// the [`Negotiate`] extension with a real SPNEGO round trip, or a fake for
/// tests.
pub trait HttpFetch: Send + Sync + Unpin + 'static {
    /// Perform one request/response exchange.
    fn fetch(
        &self,
        req: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// HttpFetchDyn is the dyn version of [`HttpFetch`]
/// which makes it possible to use as `Arc<dyn HttpFetchDyn>`.
/// Users should never implement this trait, but use `HttpFetch` instead.
pub trait HttpFetchDyn: Send + Sync + Unpin + 'static {
    /// The dyn version of [`HttpFetch::fetch`].
    ///
    /// This function returns a boxed future to make it object safe.
    fn fetch_dyn(&self, req: Request<Bytes>) -> BoxedFuture<'_, Result<Response<Bytes>>>;
}

impl<T: HttpFetch + ?Sized> HttpFetchDyn for T {
    fn fetch_dyn(&self, req: Request<Bytes>) -> BoxedFuture<'_, Result<Response<Bytes>>> {
        Box::pin(self.fetch(req))
    }
}

impl<T: HttpFetchDyn + ?Sized> HttpFetch for Arc<T> {
    async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.deref().fetch_dyn(req).await
    }
}

/// The default transport: two reqwest clients sharing one connection pool
/// configuration, one that never follows redirects and one that does. The
/// [`FollowRedirect`] extension picks between them per request.
struct ReqwestFetcher {
    direct: reqwest::Client,
    redirecting: reqwest::Client,
}

impl ReqwestFetcher {
    fn new(timeout: Duration) -> Result<Self> {
        let configure = |builder: reqwest::ClientBuilder| {
            if timeout.is_zero() {
                builder
            } else {
                builder.timeout(timeout)
            }
        };

        let direct = configure(
            reqwest::ClientBuilder::new().redirect(reqwest::redirect::Policy::none()),
        )
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Unexpected, "http client build failed").set_source(err)
        })?;
        let redirecting = configure(reqwest::ClientBuilder::new())
            .build()
            .map_err(|err| {
                Error::new(ErrorKind::Unexpected, "http client build failed").set_source(err)
            })?;

        Ok(Self { direct, redirecting })
    }
}

impl HttpFetch for ReqwestFetcher {
    async fn fetch(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        // Uri stores all string alike data in `Bytes` which means
        // the clone here is cheap.
        let uri = req.uri().clone();
        let follow = req.extensions().get::<FollowRedirect>().is_some();

        let (parts, body) = req.into_parts();

        let client = if follow { &self.redirecting } else { &self.direct };

        let mut req_builder = client
            .request(
                parts.method,
                reqwest::Url::from_str(&uri.to_string()).map_err(|err| {
                    Error::new(ErrorKind::Unexpected, "request url must be valid")
                        .with_context("url", uri.to_string())
                        .set_source(err)
                })?,
            )
            .headers(parts.headers);

        // WebHDFS DataNodes reject chunked uploads without a length, so the
        // body is always attached, even when zero length.
        req_builder = req_builder.body(reqwest::Body::from(body));

        let mut resp = req_builder.send().await.map_err(|err| {
            Error::new(ErrorKind::Unexpected, "send http request")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .set_source(err)
        })?;

        let mut hr = Response::builder()
            .status(resp.status())
            .version(resp.version())
            // Insert uri into response extension so that we can fetch
            // it later.
            .extension(uri.clone());

        // Swap headers directly instead of copy the entire map.
        mem::swap(hr.headers_mut().unwrap(), resp.headers_mut());

        let bs = resp.bytes().await.map_err(|err| {
            Error::new(ErrorKind::Unexpected, "read http response body")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .set_source(err)
        })?;

        let resp = hr.body(bs).expect("response must build succeed");
        Ok(resp)
    }
}
