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
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::response::Parts;
use http::Method;
use log::debug;
use serde_json::Value;

use super::config::WebhdfsConfig;
use super::core::WebhdfsCore;
use super::error::parse_error;
use super::message::*;
use crate::raw::*;
use crate::Error;
use crate::ErrorKind;
use crate::Result;

const WEBHDFS_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9870";

/// Builder for [`WebhdfsClient`].
#[derive(Default, Clone)]
pub struct WebhdfsBuilder {
    config: WebhdfsConfig,
    http_client: Option<HttpClient>,
}

impl Debug for WebhdfsBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WebhdfsBuilder {
    /// Set the remote address of the NameNode, default
    /// `http://127.0.0.1:9870`.
    ///
    /// Endpoints should be full uri, e.g.
    ///
    /// - `https://webhdfs.example.com:9870`
    /// - `http://192.168.66.88:9870`
    ///
    /// If user inputs endpoint without scheme, we will
    /// prepend `http://` to it.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        if !endpoint.is_empty() {
            self.config.endpoint = Some(endpoint.to_string());
        }
        self
    }

    /// Set the user name for simple authentication, appended to every URL
    /// as `user.name=`.
    pub fn user_name(&mut self, user_name: &str) -> &mut Self {
        if !user_name.is_empty() {
            self.config.user_name = Some(user_name.to_string());
        }
        self
    }

    /// Set the Kerberos principal; flags the transport to negotiate.
    /// Takes precedence over a simple user name.
    pub fn kerberos_principal(&mut self, principal: &str) -> &mut Self {
        if !principal.is_empty() {
            self.config.kerberos_principal = Some(principal.to_string());
        }
        self
    }

    /// Set the proxy user, appended as `doas=` regardless of the
    /// authentication mode.
    pub fn proxy_user(&mut self, proxy_user: &str) -> &mut Self {
        if !proxy_user.is_empty() {
            self.config.proxy_user = Some(proxy_user.to_string());
        }
        self
    }

    /// Set the per-call timeout in seconds. `0` (the default) blocks
    /// indefinitely.
    pub fn timeout(&mut self, seconds: u64) -> &mut Self {
        self.config.timeout = seconds;
        self
    }

    /// Set an extra header attached to every request.
    pub fn header(&mut self, name: &str, value: &str) -> &mut Self {
        self.config
            .headers
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Use a caller-provided transport instead of the default reqwest one.
    pub fn http_client(&mut self, client: HttpClient) -> &mut Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(&mut self) -> Result<WebhdfsClient> {
        debug!("start building client: {:?}", self);

        let endpoint = normalize_endpoint(self.config.endpoint.take().as_deref(), WEBHDFS_DEFAULT_ENDPOINT);
        debug!("client use endpoint {}", endpoint);

        let auth = resolve_auth(
            self.config.user_name.take().as_deref(),
            self.config.kerberos_principal.take().as_deref(),
        );
        let extra_headers = build_extra_headers(&self.config.headers)?;

        let client = match self.http_client.take() {
            Some(client) => client,
            None => HttpClient::new(Duration::from_secs(self.config.timeout))?,
        };

        Ok(WebhdfsClient {
            core: Arc::new(WebhdfsCore {
                endpoint,
                auth,
                proxy_user: self.config.proxy_user.take(),
                extra_headers,
                client,
            }),
        })
    }
}

/// Typed client for the WebHDFS REST API.
///
/// Cheap to clone; safe to share across tasks since the connection
/// configuration is immutable after build and no state is kept between
/// calls.
#[derive(Debug, Clone)]
pub struct WebhdfsClient {
    core: Arc<WebhdfsCore>,
}

fn ensure_success(parts: Parts, body: Bytes, operation: &'static str) -> Result<(Parts, Bytes)> {
    if parts.status.as_u16() >= 400 {
        return Err(parse_error(&parts, &body).with_operation(operation));
    }
    Ok((parts, body))
}

fn boolean_of(body: &[u8]) -> bool {
    parse_json_object(body)
        .get("boolean")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

impl WebhdfsClient {
    /// `GETFILESTATUS`: stat one path.
    ///
    /// Returns `Ok(None)` when the server answered without a `FileStatus`
    /// envelope.
    pub async fn get_file_status(&self, path: &str) -> Result<Option<FileStatus>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "GETFILESTATUS", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_file_status")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "FileStatus").map(FileStatus::from_json))
    }

    /// `LISTSTATUS`: list a directory. "No items" is an empty vec, never an
    /// error.
    pub async fn list_status(&self, path: &str) -> Result<Vec<FileStatus>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "LISTSTATUS", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::list_status")?;

        let map = parse_json_object(&body);
        Ok(unwrap_collection(&map, "FileStatuses", "FileStatus")
            .into_iter()
            .map(FileStatus::from_json)
            .collect())
    }

    /// `GETCONTENTSUMMARY` of a directory.
    pub async fn get_content_summary(&self, path: &str) -> Result<Option<ContentSummary>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "GETCONTENTSUMMARY", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_content_summary")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "ContentSummary").map(ContentSummary::from_json))
    }

    /// `GETFILECHECKSUM`: the checksum lives on a DataNode, so the
    /// transport follows the redirect automatically.
    pub async fn get_file_checksum(&self, path: &str) -> Result<Option<FileChecksum>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "GETFILECHECKSUM", &[], true)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_file_checksum")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "FileChecksum").map(FileChecksum::from_json))
    }

    /// `GETHOMEDIRECTORY` of the authenticated user.
    pub async fn get_home_directory(&self) -> Result<Option<String>> {
        let resp = self
            .core
            .op(Method::GET, "/", "GETHOMEDIRECTORY", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_home_directory")?;

        let map = parse_json_object(&body);
        Ok(map.get("Path").and_then(Value::as_str).map(str::to_string))
    }

    /// `OPEN`: read file content, optionally a sub-range. The transport
    /// follows the DataNode redirect automatically.
    pub async fn open(
        &self,
        path: &str,
        offset: Option<u64>,
        length: Option<u64>,
    ) -> Result<Bytes> {
        ensure_non_empty(path, "path")?;

        let mut params = Vec::new();
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(length) = length {
            params.push(("length", length.to_string()));
        }

        let resp = self.core.op(Method::GET, path, "OPEN", &params, true).await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::open")?;
        Ok(body)
    }

    /// `MKDIRS`: create a directory and any missing parents.
    pub async fn mkdirs(&self, path: &str, permission: Option<u16>) -> Result<bool> {
        ensure_non_empty(path, "path")?;

        let mut params = Vec::new();
        if let Some(permission) = permission {
            params.push(("permission", permission.to_string()));
        }

        let resp = self
            .core
            .op(Method::PUT, path, "MKDIRS", &params, false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::mkdirs")?;
        Ok(boolean_of(&body))
    }

    /// `CREATE`: upload file content through the two-phase redirect
    /// protocol.
    pub async fn create(&self, path: &str, data: Bytes, overwrite: bool) -> Result<()> {
        ensure_non_empty(path, "path")?;

        self.core
            .transfer(
                Method::PUT,
                path,
                "CREATE",
                &[("overwrite", overwrite.to_string())],
                data,
            )
            .await?;
        Ok(())
    }

    /// [`create`](Self::create) sourcing the payload from a local file.
    ///
    /// The file is opened, read and released within this single call.
    pub async fn create_from_file(
        &self,
        path: &str,
        local_path: &str,
        overwrite: bool,
    ) -> Result<()> {
        let data = read_local_file(local_path)?;
        self.create(path, data, overwrite).await
    }

    /// `APPEND`: append to an existing file through the two-phase
    /// redirect protocol.
    pub async fn append(&self, path: &str, data: Bytes) -> Result<()> {
        ensure_non_empty(path, "path")?;

        self.core
            .transfer(Method::POST, path, "APPEND", &[], data)
            .await?;
        Ok(())
    }

    /// [`append`](Self::append) sourcing the payload from a local file.
    pub async fn append_from_file(&self, path: &str, local_path: &str) -> Result<()> {
        let data = read_local_file(local_path)?;
        self.append(path, data).await
    }

    /// `TRUNCATE` a file to `new_length` bytes.
    ///
    /// Phase two of the protocol carries a zero-length placeholder body.
    pub async fn truncate(&self, path: &str, new_length: i64) -> Result<bool> {
        ensure_non_empty(path, "path")?;
        if new_length < 0 {
            return Err(Error::new(
                ErrorKind::Unsupported,
                format!("cannot truncate to negative length {new_length}"),
            )
            .with_operation("WebhdfsClient::truncate"));
        }

        let resp = self
            .core
            .transfer(
                Method::POST,
                path,
                "TRUNCATE",
                &[("newlength", new_length.to_string())],
                Bytes::new(),
            )
            .await?;

        // DataNodes answer the final phase without a body; a bare success
        // still counts.
        let body = resp.into_body();
        if body.is_empty() {
            return Ok(true);
        }
        Ok(boolean_of(&body))
    }

    /// `DELETE` a path.
    pub async fn delete(&self, path: &str, recursive: bool) -> Result<bool> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(
                Method::DELETE,
                path,
                "DELETE",
                &[("recursive", recursive.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::delete")?;
        Ok(boolean_of(&body))
    }

    /// `RENAME` a path to an absolute destination.
    pub async fn rename(&self, path: &str, destination: &str) -> Result<bool> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(destination, "destination")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "RENAME",
                &[("destination", destination.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::rename")?;
        Ok(boolean_of(&body))
    }

    /// `SETPERMISSION` on a path.
    pub async fn set_permission(&self, path: &str, permission: u16) -> Result<()> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "SETPERMISSION",
                &[("permission", permission.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::set_permission")?;
        Ok(())
    }

    /// `SETOWNER`: change owner and/or group; at least one must be given.
    pub async fn set_owner(
        &self,
        path: &str,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<()> {
        ensure_non_empty(path, "path")?;

        let mut params = Vec::new();
        if let Some(owner) = owner.filter(|v| !v.is_empty()) {
            params.push(("owner", owner.to_string()));
        }
        if let Some(group) = group.filter(|v| !v.is_empty()) {
            params.push(("group", group.to_string()));
        }
        if params.is_empty() {
            return Err(Error::new(
                ErrorKind::InsufficientParameters,
                "either owner or group must be given",
            )
            .with_operation("WebhdfsClient::set_owner"));
        }

        let resp = self
            .core
            .op(Method::PUT, path, "SETOWNER", &params, false)
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::set_owner")?;
        Ok(())
    }

    /// `SETREPLICATION` factor of a file.
    pub async fn set_replication(&self, path: &str, replication: u16) -> Result<bool> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "SETREPLICATION",
                &[("replication", replication.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::set_replication")?;
        Ok(boolean_of(&body))
    }

    /// `SETTIMES`: set modification and/or access time, epoch milliseconds.
    pub async fn set_times(
        &self,
        path: &str,
        modification_time: Option<i64>,
        access_time: Option<i64>,
    ) -> Result<()> {
        ensure_non_empty(path, "path")?;

        let mut params = Vec::new();
        if let Some(mtime) = modification_time {
            params.push(("modificationtime", mtime.to_string()));
        }
        if let Some(atime) = access_time {
            params.push(("accesstime", atime.to_string()));
        }

        let resp = self
            .core
            .op(Method::PUT, path, "SETTIMES", &params, false)
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::set_times")?;
        Ok(())
    }

    /// `CREATESYMLINK`: the redirect is followed automatically.
    pub async fn create_symlink(
        &self,
        path: &str,
        destination: &str,
        create_parent: bool,
    ) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(destination, "destination")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "CREATESYMLINK",
                &[
                    ("destination", destination.to_string()),
                    ("createParent", create_parent.to_string()),
                ],
                true,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::create_symlink")?;
        Ok(())
    }

    /// `GETACLSTATUS` of a path.
    pub async fn get_acl_status(&self, path: &str) -> Result<Option<AclStatus>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "GETACLSTATUS", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_acl_status")?;

        let map = parse_json_object(&body);
        Ok(unwrap_envelope(&map, "AclStatus").map(AclStatus::from_json))
    }

    /// `SETACL`: replace the full ACL of a path with `aclspec`.
    pub async fn set_acl(&self, path: &str, aclspec: &str) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(aclspec, "aclspec")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "SETACL",
                &[("aclspec", aclspec.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::set_acl")?;
        Ok(())
    }

    /// `GETXATTRS`: fetch extended attributes, all of them or the named
    /// subset, text encoded.
    pub async fn get_xattrs(&self, path: &str, names: &[&str]) -> Result<Vec<XAttr>> {
        ensure_non_empty(path, "path")?;

        let mut params: Vec<(&str, String)> = names
            .iter()
            .map(|name| ("xattr.name", name.to_string()))
            .collect();
        params.push(("encoding", "text".to_string()));

        let resp = self
            .core
            .op(Method::GET, path, "GETXATTRS", &params, false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::get_xattrs")?;

        let map = parse_json_object(&body);
        Ok(match map.get("XAttrs") {
            Some(Value::Array(items)) => items.iter().cloned().map(XAttr::from_json).collect(),
            _ => Vec::new(),
        })
    }

    /// `LISTXATTRS`: list extended attribute names.
    ///
    /// The server wraps the names in a JSON string rather than a plain
    /// array; both spellings are accepted.
    pub async fn list_xattrs(&self, path: &str) -> Result<Vec<String>> {
        ensure_non_empty(path, "path")?;

        let resp = self
            .core
            .op(Method::GET, path, "LISTXATTRS", &[], false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::list_xattrs")?;

        let map = parse_json_object(&body);
        Ok(match map.get("XAttrNames") {
            Some(Value::String(inner)) => serde_json::from_str(inner).unwrap_or_default(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// `SETXATTR`: create or replace one extended attribute.
    pub async fn set_xattr(
        &self,
        path: &str,
        name: &str,
        value: &str,
        flag: XAttrFlag,
    ) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(name, "xattr name")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "SETXATTR",
                &[
                    ("xattr.name", name.to_string()),
                    ("xattr.value", value.to_string()),
                    ("flag", flag.as_str().to_string()),
                ],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::set_xattr")?;
        Ok(())
    }

    /// `REMOVEXATTR`: remove one extended attribute.
    pub async fn remove_xattr(&self, path: &str, name: &str) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(name, "xattr name")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "REMOVEXATTR",
                &[("xattr.name", name.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::remove_xattr")?;
        Ok(())
    }

    /// `CREATESNAPSHOT`: returns the snapshot path the server picked.
    pub async fn create_snapshot(
        &self,
        path: &str,
        snapshot_name: Option<&str>,
    ) -> Result<Option<String>> {
        ensure_non_empty(path, "path")?;

        let mut params = Vec::new();
        if let Some(name) = snapshot_name.filter(|v| !v.is_empty()) {
            params.push(("snapshotname", name.to_string()));
        }

        let resp = self
            .core
            .op(Method::PUT, path, "CREATESNAPSHOT", &params, false)
            .await?;
        let (parts, body) = resp.into_parts();
        let (_, body) = ensure_success(parts, body, "WebhdfsClient::create_snapshot")?;

        let map = parse_json_object(&body);
        Ok(map.get("Path").and_then(Value::as_str).map(str::to_string))
    }

    /// `DELETESNAPSHOT` by name.
    pub async fn delete_snapshot(&self, path: &str, snapshot_name: &str) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(snapshot_name, "snapshot name")?;

        let resp = self
            .core
            .op(
                Method::DELETE,
                path,
                "DELETESNAPSHOT",
                &[("snapshotname", snapshot_name.to_string())],
                false,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::delete_snapshot")?;
        Ok(())
    }

    /// `RENAMESNAPSHOT`: single phase with the redirect followed by the
    /// transport.
    pub async fn rename_snapshot(
        &self,
        path: &str,
        old_snapshot_name: &str,
        snapshot_name: &str,
    ) -> Result<()> {
        ensure_non_empty(path, "path")?;
        ensure_non_empty(old_snapshot_name, "old snapshot name")?;
        ensure_non_empty(snapshot_name, "snapshot name")?;

        let resp = self
            .core
            .op(
                Method::PUT,
                path,
                "RENAMESNAPSHOT",
                &[
                    ("oldsnapshotname", old_snapshot_name.to_string()),
                    ("snapshotname", snapshot_name.to_string()),
                ],
                true,
            )
            .await?;
        let (parts, body) = resp.into_parts();
        ensure_success(parts, body, "WebhdfsClient::rename_snapshot")?;
        Ok(())
    }
}

/// Read an upload source within the single call that needs it; the handle
/// is released on every exit path.
fn read_local_file(local_path: &str) -> Result<Bytes> {
    ensure_non_empty(local_path, "local path")?;
    let data = std::fs::read(local_path).map_err(|err| {
        Error::new(
            ErrorKind::InvalidLocalFile,
            format!("cannot read local file {local_path}"),
        )
        .set_source(err)
    })?;
    Ok(Bytes::from(data))
}
