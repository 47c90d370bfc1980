//! Error types for querent.
//!
//! Errors fall in three groups:
//! - validation errors, raised before any request is sent
//!   ([`Error::is_validation`]),
//! - execution errors, raised by the executor after the round trip
//!   ([`Error::Http`], [`Error::is_transport`], [`Error::Cancelled`]),
//! - mapping errors, raised when a payload does not match the expected shape.

use derive_more::{Display, Error, From};

/// Main error type for querent operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// No parameter set was supplied to the validator.
    #[display("no parameter set supplied")]
    #[from(skip)]
    NullInput,

    /// The predicate is absent or has a shape the extractor does not handle.
    #[display("malformed predicate: {_0}")]
    #[from(skip)]
    MalformedPredicate(#[error(not(source))] String),

    /// The predicate references a field the endpoint does not declare.
    #[display("unknown field '{field}'")]
    #[from(skip)]
    UnknownField {
        /// Name of the unsupported field.
        field: String,
    },

    /// A field required by the operation kind is missing.
    #[display("missing required field '{field}'")]
    #[from(skip)]
    MissingRequiredField {
        /// Name of the first missing field.
        field: String,
    },

    /// Two fields of the same mutually exclusive group are both set.
    #[display("conflicting fields in group '{group}': {fields:?}")]
    #[from(skip)]
    ConflictingFields {
        /// Name of the violated group.
        group: String,
        /// Fields of the group that were set.
        fields: Vec<String>,
    },

    /// A parameter value cannot be canonicalized for its field.
    #[display("invalid value for '{field}': {value}")]
    #[from(skip)]
    InvalidValue {
        /// Field name.
        field: String,
        /// Offending value.
        value: String,
    },

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Raw response body, unmodified.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The call was cancelled before the round trip completed.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Response payload does not match the expected shape.
    #[display("deserialization error at '{path}': {message}")]
    #[from(skip)]
    Deserialization {
        /// JSON path to the error (e.g., `data.0.status`).
        path: String,
        /// Error message.
        message: String,
        /// Original payload, kept for diagnostics.
        #[error(not(source))]
        payload: bytes::Bytes,
    },

    /// Query string or form serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a malformed predicate error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPredicate(message.into())
    }

    /// Create an unknown field error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Create a missing required field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Create a conflicting fields error.
    #[must_use]
    pub fn conflicting(group: impl Into<String>, fields: Vec<String>) -> Self {
        Self::ConflictingFields {
            group: group.into(),
            fields,
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a deserialization error keeping the original payload.
    #[must_use]
    pub fn deserialization(
        path: impl Into<String>,
        message: impl Into<String>,
        payload: bytes::Bytes,
    ) -> Self {
        Self::Deserialization {
            path: path.into(),
            message: message.into(),
            payload,
        }
    }

    /// Returns `true` for errors raised before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NullInput
                | Self::MalformedPredicate(_)
                | Self::UnknownField { .. }
                | Self::MissingRequiredField { .. }
                | Self::ConflictingFields { .. }
                | Self::InvalidValue { .. }
        )
    }

    /// Returns `true` for connection-level failures, retryable at the caller's discretion.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the call was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the raw body as text, if this is an HTTP error with a UTF-8 body.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body().and_then(|body| std::str::from_utf8(body).ok())
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiProblem {
    ///     title: String,
    ///     detail: String,
    /// }
    ///
    /// if let Some(Ok(problem)) = err.decode_body::<ApiProblem>() {
    ///     eprintln!("{}: {}", problem.title, problem.detail);
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
