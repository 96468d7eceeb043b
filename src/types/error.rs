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

//! Errors returned by hadoop-rest.
//!
//! # Examples
//!
//! ```no_run
//! # use hadoop_rest::services::webhdfs::WebhdfsBuilder;
//! use hadoop_rest::ErrorKind;
//! # async fn test() -> hadoop_rest::Result<()> {
//! # let client = WebhdfsBuilder::default().build()?;
//! if let Err(e) = client.get_file_status("/tmp/missing").await {
//!     if e.kind() == ErrorKind::UnexpectedResponse {
//!         println!("server rejected the call: {e}")
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

/// Result that is a wrapper of `Result<T, hadoop_rest::Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// ErrorKind is all kinds of Error of hadoop-rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The transport itself failed: the connection could not be established,
    /// the call timed out, or the request could not even be built. This is
    /// distinct from a completed HTTP exchange that carries an error status.
    Unexpected,
    /// The HTTP exchange completed but the final status code was an error
    /// (>= 400), or a structurally required field such as a redirect
    /// location was absent from the response.
    UnexpectedResponse,
    /// A submitted request's response code could not be classified as a
    /// clear success.
    UnexpectedReturn,
    /// A required string identifier (path, job id, application id, ...) was
    /// empty.
    InsufficientParameters,
    /// The local source for an upload is missing or has an invalid size.
    InvalidLocalFile,
    /// The caller requested a value outside the legal domain of the
    /// operation, e.g. a negative truncate length.
    Unsupported,
    /// A discriminated counter group's `counterGroupName` did not match the
    /// expected family constant.
    InvalidCounterGroup,
    /// The client configuration is invalid, e.g. a malformed endpoint.
    ConfigInvalid,
}

impl ErrorKind {
    /// Convert self into static str.
    pub fn into_static(self) -> &'static str {
        self.into()
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl From<ErrorKind> for &'static str {
    fn from(v: ErrorKind) -> &'static str {
        match v {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::UnexpectedResponse => "UnexpectedResponse",
            ErrorKind::UnexpectedReturn => "UnexpectedReturn",
            ErrorKind::InsufficientParameters => "InsufficientParameters",
            ErrorKind::InvalidLocalFile => "InvalidLocalFile",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::InvalidCounterGroup => "InvalidCounterGroup",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
        }
    }
}

/// Error is the error struct returned by all hadoop-rest functions.
///
/// ## Display
///
/// Error can be displayed in two ways:
///
/// - Via `Display`: like `err.to_string()` or `format!("{err}")`
///
/// Error will be printed in a single line:
///
/// ```shell
/// UnexpectedResponse at WebhdfsClient::mkdirs, context: { url: http://..., status: 403 Forbidden } => mkdirs rejected
/// ```
///
/// - Via `Debug`: like `format!("{err:?}")`
///
/// Error will be printed in multi lines with more details and backtraces (if
/// captured), including the raw response header blob and body the server
/// sent, so callers can diagnose server-side problems without the library
/// masking them.
pub struct Error {
    kind: ErrorKind,
    message: String,

    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
    backtrace: Backtrace,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, print in struct style.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("operation", &self.operation);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }
        if self.backtrace.status() == BacktraceStatus::Captured {
            writeln!(f)?;
            writeln!(f, "Backtrace:")?;
            writeln!(f, "{}", self.backtrace)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),

            operation: "",
            context: Vec::default(),
            source: None,
            // `Backtrace::capture()` will check if backtrace has been enabled
            // internally. It's zero cost if backtrace is disabled.
            backtrace: Backtrace::capture(),
        }
    }

    /// Update error's operation.
    ///
    /// # Notes
    ///
    /// If the error already carries an operation, we will push a new context
    /// `(called, operation)`.
    pub fn with_operation(mut self, operation: impl Into<&'static str>) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }

        self.operation = operation.into();
        self
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Notes
    ///
    /// If the source has been set, we will raise a panic here.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "the source error has been set");

        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fetch a context value previously attached to this error, e.g. the
    /// `url`, `header` or `body` of the failing exchange.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::InsufficientParameters => io::ErrorKind::InvalidInput,
            ErrorKind::InvalidLocalFile => io::ErrorKind::NotFound,
            _ => io::ErrorKind::Other,
        };

        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_error() -> Error {
        Error {
            kind: ErrorKind::UnexpectedResponse,
            message: "mkdirs rejected".to_string(),
            operation: "WebhdfsClient::mkdirs",
            context: vec![
                ("url", "http://127.0.0.1:9870/webhdfs/v1/demo".to_string()),
                ("status", "403 Forbidden".to_string()),
            ],
            source: Some(anyhow!("remote exception")),
            backtrace: Backtrace::disabled(),
        }
    }

    #[test]
    fn test_error_display() {
        let s = format!("{}", test_error());
        assert_eq!(
            s,
            r#"UnexpectedResponse at WebhdfsClient::mkdirs, context: { url: http://127.0.0.1:9870/webhdfs/v1/demo, status: 403 Forbidden } => mkdirs rejected, source: remote exception"#
        );
    }

    #[test]
    fn test_error_context_value() {
        let err = test_error();
        assert_eq!(err.context_value("status"), Some("403 Forbidden"));
        assert_eq!(err.context_value("body"), None);
    }
}
