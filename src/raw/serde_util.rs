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

//! JSON envelope decoding and the total-defaulting record constructors.
//!
//! Decoding is two-tiered. Tier one parses the response body best-effort: an
//! empty or non-JSON body yields an empty map instead of an error, because
//! several operations legitimately answer with no body at all. Tier two
//! builds a typed record out of a generic value with every field defaulted
//! when missing, so a record itself can never fail to construct; only the
//! wrapping call decides whether an absent envelope key is an empty result
//! or a protocol error.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::ErrorKind;

/// Parse json serialize error into an [`Error`].
pub fn new_json_serialize_error(e: serde_json::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "serialize json").set_source(e)
}

/// Parse json deserialize error into an [`Error`].
pub fn new_json_deserialize_error(e: serde_json::Error) -> Error {
    Error::new(ErrorKind::Unexpected, "deserialize json").set_source(e)
}

/// Parse a response body as a JSON object, best-effort.
///
/// Empty bodies, malformed JSON and non-object top levels all yield an empty
/// map. This never errors.
pub fn parse_json_object(body: &[u8]) -> Map<String, Value> {
    if body.is_empty() {
        return Map::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Unwrap a one-level envelope: `{"FileStatus": {...}}` -> the inner value.
pub fn unwrap_envelope(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

/// Unwrap a two-level collection envelope:
/// `{"jobs": {"job": [...]}}` -> the inner array.
///
/// Absent keys at either level yield an empty vec; collection lookups never
/// fail for "no items".
pub fn unwrap_collection(map: &Map<String, Value>, outer: &str, inner: &str) -> Vec<Value> {
    match map.get(outer).and_then(|v| v.get(inner)) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Unwrap a two-level singular envelope:
/// `{"scheduler": {"schedulerInfo": {...}}}` -> the inner value.
pub fn unwrap_nested(map: &Map<String, Value>, outer: &str, inner: &str) -> Option<Value> {
    map.get(outer)
        .and_then(|v| v.get(inner))
        .filter(|v| !v.is_null())
        .cloned()
}

/// Total-defaulting record construction.
///
/// Records derive `Deserialize` with `#[serde(default)]` as their field
/// table; this trait adds the never-fails outer contract: a value that does
/// not deserialize at all degrades to `Default::default()` instead of
/// erroring.
pub trait FromJson: DeserializeOwned + Default {
    /// Build `Self` from a generic JSON value, defaulting on any mismatch.
    fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl<T: DeserializeOwned + Default> FromJson for T {}

/// Deserialize a float the server may emit as either a JSON number or a
/// numeric string (`"progress": "58.3"`), defaulting to `0.0` on anything
/// unparseable.
pub fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Deserialize an integer the server may emit as number or numeric string,
/// defaulting to `0`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Deserialize a small unsigned integer carried as a digit string, e.g. the
/// octal permission string `"755"` which callers expect back as the number
/// `755`. Defaults to `0`.
pub fn lenient_u16<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0).min(u16::MAX as u64) as u16,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
