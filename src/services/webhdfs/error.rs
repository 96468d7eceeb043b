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

use http::response::Parts;
use serde::Deserialize;

use crate::raw::with_error_response_context;
use crate::Error;
use crate::ErrorKind;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteExceptionWrapper {
    pub remote_exception: RemoteException,
}

/// RemoteException is the error message returned by the WebHDFS service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct RemoteException {
    exception: String,
    message: String,
    #[serde(default)]
    java_class_name: String,
}

/// Turn a completed exchange carrying a failure status into an
/// [`Error`], keeping the original URL, header blob and body attached.
pub(super) fn parse_error(parts: &Parts, body: &[u8]) -> Error {
    let s = String::from_utf8_lossy(body);

    let message = match serde_json::from_str::<RemoteExceptionWrapper>(&s) {
        Ok(wrapper) => format!("{:?}", wrapper.remote_exception),
        Err(_) => s.to_string(),
    };

    let err = Error::new(ErrorKind::UnexpectedResponse, message).with_context("body", &s);

    with_error_response_context(err, parts)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Response;
    use http::StatusCode;

    use super::*;
    use crate::Result;

    /// Error response example from the WebHDFS documentation.
    #[test]
    fn test_parse_error() -> Result<()> {
        let ill_args = Bytes::from(
            r#"
{
  "RemoteException":
  {
    "exception"    : "IllegalArgumentException",
    "javaClassName": "java.lang.IllegalArgumentException",
    "message"      : "Invalid value for webhdfs parameter \"permission\": ..."
  }
}
    "#,
        );
        let resp = Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(ill_args.clone())
            .unwrap();
        let (parts, body) = resp.into_parts();

        let err = parse_error(&parts, &body);
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
        assert!(err.message().contains("IllegalArgumentException"));
        // The raw body must survive unmodified for diagnostics.
        assert!(err
            .context_value("body")
            .unwrap()
            .contains(r#"Invalid value for webhdfs parameter"#));

        Ok(())
    }

    #[test]
    fn test_parse_error_non_json_body() {
        let resp = Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Bytes::from_static(b"namenode is down"))
            .unwrap();
        let (parts, body) = resp.into_parts();

        let err = parse_error(&parts, &body);
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
        assert_eq!(err.message(), "namenode is down");
    }
}
