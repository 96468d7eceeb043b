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

//! WebHDFS response messages.

use serde::Deserialize;

use crate::raw::lenient_u16;

/// One entry of `FileStatus` / `FileStatuses.FileStatus[]`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FileStatus {
    /// Access time in epoch milliseconds.
    pub access_time: i64,
    /// Block size in bytes.
    pub block_size: i64,
    /// Number of children for directories.
    pub children_num: i64,
    /// HDFS-internal file id.
    pub file_id: i64,
    /// Owning group.
    pub group: String,
    /// File length in bytes.
    pub length: u64,
    /// Modification time in epoch milliseconds.
    pub modification_time: i64,
    /// Owning user.
    pub owner: String,
    /// Name of the entry relative to the listed directory; empty for stat.
    pub path_suffix: String,
    /// Octal permission string parsed as a number, e.g. `"755"` -> `755`.
    #[serde(deserialize_with = "lenient_u16")]
    pub permission: u16,
    /// Replication factor.
    pub replication: i64,
    /// Symlink target, when `type` is SYMLINK.
    pub symlink: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub ty: FileType,
}

/// WebHDFS entry type.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link.
    Symlink,
    /// Unrecognized server vocabulary, kept decodable for forward
    /// compatibility.
    #[default]
    #[serde(other)]
    Invalid,
}

/// The `ContentSummary` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentSummary {
    /// Number of directories under the path, itself included.
    pub directory_count: i64,
    /// Number of files under the path.
    pub file_count: i64,
    /// Total content length in bytes.
    pub length: i64,
    /// Namespace quota, `-1` when unset.
    pub quota: i64,
    /// Disk space consumed, replicas included.
    pub space_consumed: i64,
    /// Disk space quota, `-1` when unset.
    pub space_quota: i64,
}

/// The `FileChecksum` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FileChecksum {
    /// Checksum algorithm name, e.g. `MD5-of-1MD5-of-512CRC32`.
    pub algorithm: String,
    /// Hex-encoded checksum bytes.
    pub bytes: String,
    /// Length of the checksum in bytes.
    pub length: i64,
}

/// The `AclStatus` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AclStatus {
    /// ACL entries in `scope:type:name:perm` spec form.
    pub entries: Vec<String>,
    /// Owning group.
    pub group: String,
    /// Owning user.
    pub owner: String,
    /// Octal permission string parsed as a number.
    #[serde(deserialize_with = "lenient_u16")]
    pub permission: u16,
    /// Whether the sticky bit is set.
    pub sticky_bit: bool,
}

/// One entry of the `XAttrs[]` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct XAttr {
    /// Extended attribute name, prefixed with its namespace.
    pub name: String,
    /// Attribute value as returned for the requested encoding.
    pub value: String,
}

/// Flag for setting an extended attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAttrFlag {
    /// Fail if the attribute already exists.
    Create,
    /// Fail if the attribute does not exist yet.
    Replace,
}

impl XAttrFlag {
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            XAttrFlag::Create => "CREATE",
            XAttrFlag::Replace => "REPLACE",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::raw::parse_json_object;
    use crate::raw::unwrap_envelope;
    use crate::raw::FromJson;

    #[test]
    fn test_file_status() {
        let json = br#"
{
  "FileStatus":
  {
    "accessTime"      : 0,
    "blockSize"       : 0,
    "group"           : "supergroup",
    "length"          : 0,
    "modificationTime": 1320173277227,
    "owner"           : "webuser",
    "pathSuffix"      : "",
    "permission"      : "755",
    "replication"     : 0,
    "type"            : "DIRECTORY"
  }
}
"#;
        let map = parse_json_object(json);
        let status = FileStatus::from_json(unwrap_envelope(&map, "FileStatus").unwrap());
        assert_eq!(status.length, 0);
        assert_eq!(status.modification_time, 1320173277227);
        assert_eq!(status.permission, 755);
        assert_eq!(status.ty, FileType::Directory);
    }

    #[test]
    fn test_file_status_defaults_from_empty_object() {
        let status = FileStatus::from_json(serde_json::json!({}));
        assert_eq!(status.owner, "");
        assert_eq!(status.length, 0);
        assert_eq!(status.permission, 0);
        assert_eq!(status.ty, FileType::Invalid);
    }

    #[test]
    fn test_file_type_unknown_is_invalid() {
        let status = FileStatus::from_json(serde_json::json!({"type": "WORMHOLE"}));
        assert_eq!(status.ty, FileType::Invalid);
    }

    #[test]
    fn test_content_summary() {
        let json = br#"
{
  "ContentSummary":
  {
    "directoryCount": 2,
    "fileCount"     : 1,
    "length"        : 24930,
    "quota"         : -1,
    "spaceConsumed" : 24930,
    "spaceQuota"    : -1
  }
}
"#;
        let map = parse_json_object(json);
        let summary = ContentSummary::from_json(unwrap_envelope(&map, "ContentSummary").unwrap());
        assert_eq!(summary.directory_count, 2);
        assert_eq!(summary.length, 24930);
        assert_eq!(summary.quota, -1);
    }

    #[test]
    fn test_acl_status() {
        let json = br#"
{
  "AclStatus": {
    "entries": ["user:carla:rw-", "group::r-x"],
    "group": "supergroup",
    "owner": "hadoop",
    "permission": "775",
    "stickyBit": false
  }
}
"#;
        let map = parse_json_object(json);
        let acl = AclStatus::from_json(unwrap_envelope(&map, "AclStatus").unwrap());
        assert_eq!(acl.entries.len(), 2);
        assert_eq!(acl.permission, 775);
        assert!(!acl.sticky_bit);
    }
}
