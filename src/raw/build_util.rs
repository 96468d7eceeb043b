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

//! Shared glue for the per-service builders.

use std::collections::HashMap;
use std::str::FromStr;

use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;

use crate::Auth;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// Normalize a configured endpoint: trim the trailing slash, prepend
/// `http://` when the scheme is missing, fall back to the service default.
pub fn normalize_endpoint(endpoint: Option<&str>, default: &str) -> String {
    match endpoint {
        Some(ep) if !ep.is_empty() => {
            let ep = ep.trim_end_matches('/');
            if ep.starts_with("http://") || ep.starts_with("https://") {
                ep.to_string()
            } else {
                format!("http://{ep}")
            }
        }
        _ => default.to_string(),
    }
}

/// Resolve the authentication mode out of flat config fields.
///
/// A Kerberos principal takes precedence over a simple user name when both
/// are set.
pub fn resolve_auth(user_name: Option<&str>, kerberos_principal: Option<&str>) -> Auth {
    if let Some(principal) = kerberos_principal {
        if !principal.is_empty() {
            return Auth::Kerberos(principal.to_string());
        }
    }
    if let Some(user) = user_name {
        if !user.is_empty() {
            return Auth::Simple(user.to_string());
        }
    }
    Auth::None
}

/// Turn configured extra headers into a typed header map, failing
/// `ConfigInvalid` on names or values http cannot represent.
pub fn build_extra_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_str(name).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, format!("invalid header name: {name}"))
                .set_source(err)
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, format!("invalid header value for {name}"))
                .set_source(err)
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint(None, "http://127.0.0.1:9870"),
            "http://127.0.0.1:9870"
        );
        assert_eq!(
            normalize_endpoint(Some("nn.example.com:9870"), "http://127.0.0.1:9870"),
            "http://nn.example.com:9870"
        );
        assert_eq!(
            normalize_endpoint(Some("https://nn:9871/"), "http://127.0.0.1:9870"),
            "https://nn:9871"
        );
    }

    #[test]
    fn test_resolve_auth_precedence() {
        assert_eq!(resolve_auth(None, None), Auth::None);
        assert_eq!(
            resolve_auth(Some("hdfs"), None),
            Auth::Simple("hdfs".to_string())
        );
        assert_eq!(
            resolve_auth(Some("hdfs"), Some("hdfs@EXAMPLE.COM")),
            Auth::Kerberos("hdfs@EXAMPLE.COM".to_string())
        );
    }
}
