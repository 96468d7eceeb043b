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

//! Response classification: status-line scanning over raw header blobs and
//! redirect target extraction for the two-phase WebHDFS protocol.

use http::header::LOCATION;
use http::response::Parts;
use serde_json::Value;

use crate::raw::parse_json_object;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// Scan a raw header blob for every HTTP status line.
///
/// A transport that follows redirects internally may fold a whole chain into
/// one buffer, so a single blob can carry more than one `HTTP/<ver> <code>`
/// line. The order of appearance is preserved.
pub fn parse_status_lines(blob: &str) -> Vec<u16> {
    blob.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("HTTP/")?;
            let mut parts = rest.split_whitespace();
            let _version = parts.next()?;
            parts.next()?.parse().ok()
        })
        .collect()
}

/// The authoritative status of a header blob: the code of the last status
/// line found, if any.
pub fn final_status(blob: &str) -> Option<u16> {
    parse_status_lines(blob).pop()
}

/// Render response parts back into a header blob for diagnostics: the status
/// line followed by every header, one per line.
pub fn format_header_blob(parts: &Parts) -> String {
    let mut blob = format!("{:?} {}\r\n", parts.version, parts.status);
    for (name, value) in parts.headers.iter() {
        blob.push_str(name.as_str());
        blob.push_str(": ");
        blob.push_str(value.to_str().unwrap_or("<opaque>"));
        blob.push_str("\r\n");
    }
    blob
}

/// Extract the redirect target negotiated in phase one of a two-phase
/// operation.
///
/// Older servers answer with a `Location` header; newer ones put a
/// `Location` field into the JSON body when `noredirect=true` is set. The
/// header is tried first, the body second. Absence of both is a protocol
/// error, not a silent default.
pub fn parse_redirect_location(parts: &Parts, body: &[u8]) -> Result<String> {
    if let Some(value) = parts.headers.get(LOCATION) {
        if let Ok(location) = value.to_str() {
            if !location.is_empty() {
                return Ok(location.to_string());
            }
        }
    }

    if let Some(Value::String(location)) = parse_json_object(body).get("Location") {
        if !location.is_empty() {
            return Ok(location.clone());
        }
    }

    Err(
        Error::new(ErrorKind::UnexpectedResponse, "redirect location missing")
            .with_operation("http_util::parse_redirect_location")
            .with_context("header", format_header_blob(parts))
            .with_context("body", String::from_utf8_lossy(body)),
    )
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Response;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parts_of(resp: Response<Bytes>) -> (Parts, Bytes) {
        resp.into_parts()
    }

    #[test]
    fn test_single_status_line() {
        let blob = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n";
        assert_eq!(parse_status_lines(blob), vec![200]);
        assert_eq!(final_status(blob), Some(200));
    }

    #[test]
    fn test_collapsed_redirect_chain_takes_last() {
        let blob = "HTTP/1.1 307 Temporary Redirect\r\n\
                    Location: http://dn:9864/webhdfs/v1/f?op=CREATE\r\n\
                    \r\n\
                    HTTP/1.1 201 Created\r\n\
                    Content-Length: 0\r\n";
        assert_eq!(parse_status_lines(blob), vec![307, 201]);
        assert_eq!(final_status(blob), Some(201));
    }

    #[test]
    fn test_no_status_line() {
        assert_eq!(final_status("Content-Type: text/plain\r\n"), None);
        assert_eq!(final_status(""), None);
    }

    #[test]
    fn test_format_header_blob_round_trips() {
        let resp = Response::builder()
            .status(StatusCode::FORBIDDEN)
            .header("content-type", "application/json")
            .body(Bytes::new())
            .unwrap();
        let (parts, _) = parts_of(resp);

        let blob = format_header_blob(&parts);
        assert!(blob.starts_with("HTTP/1.1 403 Forbidden"));
        assert!(blob.contains("content-type: application/json"));
        assert_eq!(final_status(&blob), Some(403));
    }

    #[test]
    fn test_redirect_location_from_header() {
        let resp = Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .header("Location", "http://dn:9864/webhdfs/v1/f?op=CREATE")
            .body(Bytes::new())
            .unwrap();
        let (parts, body) = parts_of(resp);

        let location = parse_redirect_location(&parts, &body).unwrap();
        assert_eq!(location, "http://dn:9864/webhdfs/v1/f?op=CREATE");
    }

    #[test]
    fn test_redirect_location_from_body() {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(
                br#"{"Location":"http://dn:9864/webhdfs/v1/f?op=APPEND"}"#,
            ))
            .unwrap();
        let (parts, body) = parts_of(resp);

        let location = parse_redirect_location(&parts, &body).unwrap();
        assert_eq!(location, "http://dn:9864/webhdfs/v1/f?op=APPEND");
    }

    #[test]
    fn test_redirect_location_header_wins_over_body() {
        let resp = Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .header("Location", "http://dn-a:9864/f")
            .body(Bytes::from_static(br#"{"Location":"http://dn-b:9864/f"}"#))
            .unwrap();
        let (parts, body) = parts_of(resp);

        assert_eq!(
            parse_redirect_location(&parts, &body).unwrap(),
            "http://dn-a:9864/f"
        );
    }

    #[test]
    fn test_redirect_location_missing_is_protocol_error() {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Bytes::from_static(b"{}"))
            .unwrap();
        let (parts, body) = parts_of(resp);

        let err = parse_redirect_location(&parts, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponse);
    }
}
