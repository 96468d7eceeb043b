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

/// The `RemoteException` envelope the NodeManager wraps failures in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteExceptionWrapper {
    remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteException {
    exception: String,
    message: String,
}

/// Turn a non-2xx NodeManager response into an [`Error`].
pub(super) fn parse_error(parts: &Parts, body: &[u8]) -> Error {
    let message = match serde_json::from_slice::<RemoteExceptionWrapper>(body) {
        Ok(wrapper) => format!(
            "{}: {}",
            wrapper.remote_exception.exception, wrapper.remote_exception.message
        ),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };

    let err = Error::new(ErrorKind::UnexpectedResponse, message);
    with_error_response_context(err, parts)
}

#[cfg(test)]
mod tests {
    use http::Response;
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_parse_not_found() {
        let body = br#"
{
  "RemoteException": {
    "exception": "NotFoundException",
    "message": "java.lang.Exception: app with id application_1_0009 not found"
  }
}
"#;
        let (parts, _) = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(())
            .unwrap()
            .into_parts();

        let err = parse_error(&parts, body);
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
        assert!(err.message().contains("not found"));
    }
}
