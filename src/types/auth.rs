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

/// Authentication mode attached to every request of a client.
///
/// Hadoop's REST services accept either no authentication, the simple
/// pseudo-authentication carried as a `user.name` query parameter, or a
/// Kerberos (SPNEGO) negotiation performed at the transport level.
///
/// Kerberos mode never embeds a password or ticket in the URL; it only flags
/// the transport to negotiate. The principal is kept so a custom
/// [`HttpFetch`](crate::raw::HttpFetch) implementation can pick the right
/// credential cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No authentication at all.
    #[default]
    None,
    /// Simple authentication: `user.name=<name>` is appended to every URL.
    Simple(String),
    /// Kerberos/SPNEGO: the transport negotiates, the URL stays clean.
    Kerberos(String),
}

impl Auth {
    /// The user name to embed as a query parameter, if any.
    ///
    /// Only simple mode with a non-empty name yields one.
    pub fn query_user_name(&self) -> Option<&str> {
        match self {
            Auth::Simple(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Whether the transport should perform SPNEGO negotiation.
    pub fn is_negotiate(&self) -> bool {
        matches!(self, Auth::Kerberos(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_user_name() {
        assert_eq!(Auth::None.query_user_name(), None);
        assert_eq!(Auth::Simple("".to_string()).query_user_name(), None);
        assert_eq!(
            Auth::Simple("hdfs".to_string()).query_user_name(),
            Some("hdfs")
        );
        // Kerberos never leaks the principal into the URL.
        assert_eq!(
            Auth::Kerberos("hdfs@EXAMPLE.COM".to_string()).query_user_name(),
            None
        );
    }
}
