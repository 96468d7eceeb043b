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

use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::Auth;

/// PATH_ENCODE_SET is the encode set for http url path.
///
/// This set follows [encodeURIComponent](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/encodeURIComponent) which will encode all non-ASCII characters except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
///
/// There is a special case for `/` in path: we will allow `/` in path so
/// filesystem paths keep their separators.
static PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// QUERY_ENCODE_SET is the encode set for query parameter values.
///
/// Every value is encoded unconditionally, queue names, application tags and
/// comma-joined filter lists included. The RFC 3986 unreserved characters
/// stay as-is.
static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// percent_encode_path will do percent encoding for a http url path.
pub fn percent_encode_path(path: &str) -> String {
    utf8_percent_encode(path, &PATH_ENCODE_SET).to_string()
}

/// percent_encode_query will do percent encoding for a query value.
pub fn percent_encode_query(value: &str) -> String {
    utf8_percent_encode(value, &QUERY_ENCODE_SET).to_string()
}

/// Compose a full REST URL out of endpoint, API base path, resource path,
/// optional `op=` operation code, query parameters and authentication.
///
/// - `op` is appended as `op=<OPERATION>` only when non-empty; YARN and
///   MapReduce calls pass `None` and use REST sub-paths instead.
/// - every query value is percent-encoded unconditionally.
/// - authentication parameters come last: `user.name=<name>` in simple mode,
///   nothing for Kerberos (handled at the transport level), and
///   `doas=<proxy>` whenever a proxy user is set, regardless of auth mode.
///
/// Pure function, no I/O.
pub fn build_rest_url(
    endpoint: &str,
    base: &str,
    path: &str,
    op: Option<&str>,
    params: &[(&str, String)],
    auth: &Auth,
    proxy_user: Option<&str>,
) -> String {
    let mut url = format!(
        "{}{}{}",
        endpoint.trim_end_matches('/'),
        base,
        percent_encode_path(path),
    );

    let mut first = true;
    let mut push = move |url: &mut String, key: &str, value: &str| {
        url.push(if std::mem::replace(&mut first, false) {
            '?'
        } else {
            '&'
        });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    };

    if let Some(op) = op {
        if !op.is_empty() {
            push(&mut url, "op", op);
        }
    }

    for (key, value) in params {
        push(&mut url, key, &percent_encode_query(value));
    }

    if let Some(user) = auth.query_user_name() {
        push(&mut url, "user.name", &percent_encode_query(user));
    }
    if let Some(proxy) = proxy_user {
        if !proxy.is_empty() {
            push(&mut url, "doas", &percent_encode_query(proxy));
        }
    }

    url
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_percent_encode_path() {
        let cases = vec![
            (
                "Reserved Characters",
                ";,/?:@&=+$",
                "%3B%2C/%3F%3A%40%26%3D%2B%24",
            ),
            ("Unescaped Characters", "-_.!~*'()", "-_.!~*'()"),
            ("Number Sign", "#", "%23"),
            (
                "Alphanumeric Characters + Space",
                "ABC abc 123",
                "ABC%20abc%20123",
            ),
        ];

        for (name, input, expected) in cases {
            let actual = percent_encode_path(input);

            assert_eq!(actual, expected, "{name}");
        }
    }

    #[test]
    fn test_op_appended_only_when_present() {
        let url = build_rest_url(
            "http://nn:9870",
            "/webhdfs/v1",
            "/demo",
            Some("GETFILESTATUS"),
            &[],
            &Auth::None,
            None,
        );
        assert_eq!(url, "http://nn:9870/webhdfs/v1/demo?op=GETFILESTATUS");

        let url = build_rest_url(
            "http://rm:8088",
            "/ws/v1/cluster",
            "/apps/app_1/state",
            None,
            &[],
            &Auth::None,
            None,
        );
        assert_eq!(url, "http://rm:8088/ws/v1/cluster/apps/app_1/state");
    }

    #[test]
    fn test_query_values_always_encoded() {
        let url = build_rest_url(
            "http://rm:8088",
            "/ws/v1/cluster",
            "/apps",
            None,
            &[
                ("states", "RUNNING,ACCEPTED".to_string()),
                ("queue", "root queue".to_string()),
            ],
            &Auth::None,
            None,
        );
        assert_eq!(
            url,
            "http://rm:8088/ws/v1/cluster/apps?states=RUNNING%2CACCEPTED&queue=root%20queue"
        );
    }

    #[test]
    fn test_auth_params_come_last() {
        let url = build_rest_url(
            "http://nn:9870",
            "/webhdfs/v1",
            "/demo",
            Some("MKDIRS"),
            &[("permission", "755".to_string())],
            &Auth::Simple("hdfs".to_string()),
            Some("alice"),
        );
        assert_eq!(
            url,
            "http://nn:9870/webhdfs/v1/demo?op=MKDIRS&permission=755&user.name=hdfs&doas=alice"
        );
    }

    #[test]
    fn test_kerberos_adds_nothing_but_doas_survives() {
        let url = build_rest_url(
            "http://nn:9870",
            "/webhdfs/v1",
            "/demo",
            Some("GETFILESTATUS"),
            &[],
            &Auth::Kerberos("hdfs@EXAMPLE.COM".to_string()),
            Some("alice"),
        );
        assert_eq!(
            url,
            "http://nn:9870/webhdfs/v1/demo?op=GETFILESTATUS&doas=alice"
        );
        assert!(!url.contains("user.name="));
    }

    #[test]
    fn test_trailing_slash_endpoint() {
        let url = build_rest_url(
            "http://nn:9870/",
            "/webhdfs/v1",
            "/",
            Some("LISTSTATUS"),
            &[],
            &Auth::None,
            None,
        );
        assert_eq!(url, "http://nn:9870/webhdfs/v1/?op=LISTSTATUS");
    }
}
