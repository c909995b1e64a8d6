//! Error types for the Koios client.
//!
//! Errors raised before a request leaves the process (bad client options,
//! reused [`RequestOptions`](crate::RequestOptions)) are plain [`Error`]
//! variants. Everything an endpoint call produces afterwards, including input
//! validation, transport failures and server-reported errors, is surfaced as
//! [`Error::Response`] wrapping a [`ResponseError`] that also carries the
//! response envelope of the failed call.
//!
//! Use [`Error::is`] with an [`ErrorKind`] instead of matching on messages.

use std::fmt;

use crate::response::Response;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of every failure the client can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid client option or request option value.
    Config,
    /// The request options were already used for a dispatched request.
    OptionsLocked,
    /// No payment address was provided.
    MissingAddress,
    /// No stake address was provided.
    MissingStakeAddress,
    /// No pool id was provided.
    MissingPoolId,
    /// No transaction hash was provided.
    MissingTxHash,
    /// No block hash was provided.
    MissingBlockHash,
    /// No script hash was provided.
    MissingScriptHash,
    /// No datum hash was provided.
    MissingDatumHash,
    /// No asset policy was provided.
    MissingAsset,
    /// The request could not be delivered (DNS, TLS, connection, timeout).
    Transport,
    /// The call's context was cancelled.
    Cancelled,
    /// The call's context deadline passed.
    DeadlineExceeded,
    /// Generic response error: no response, or an empty body.
    Response,
    /// The server answered with a failure status.
    Status,
    /// The server answered with a non-JSON content type.
    NonJson,
    /// The response body could not be decompressed or deserialized.
    Decode,
    /// A singular accessor received no result.
    NoData,
    /// A singular accessor received more than one result.
    TooManyResults,
}

impl ErrorKind {
    /// Returns `true` for kinds that mean the server did answer, but not
    /// with usable data.
    pub fn is_response(self) -> bool {
        matches!(
            self,
            ErrorKind::Response | ErrorKind::Status | ErrorKind::NonJson | ErrorKind::Decode
        )
    }

    /// Returns `true` for kinds rejected before any network I/O.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingAddress
                | ErrorKind::MissingStakeAddress
                | ErrorKind::MissingPoolId
                | ErrorKind::MissingTxHash
                | ErrorKind::MissingBlockHash
                | ErrorKind::MissingScriptHash
                | ErrorKind::MissingDatumHash
                | ErrorKind::MissingAsset
        )
    }

    /// Returns `true` when repeating the same call may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::DeadlineExceeded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "invalid option",
            ErrorKind::OptionsLocked => "request options already used",
            ErrorKind::MissingAddress => "missing address",
            ErrorKind::MissingStakeAddress => "missing stake address",
            ErrorKind::MissingPoolId => "missing pool id",
            ErrorKind::MissingTxHash => "missing transaction hash",
            ErrorKind::MissingBlockHash => "missing block hash",
            ErrorKind::MissingScriptHash => "missing script hash",
            ErrorKind::MissingDatumHash => "missing datum hash",
            ErrorKind::MissingAsset => "missing asset policy",
            ErrorKind::Transport => "transport error",
            ErrorKind::Cancelled => "request cancelled",
            ErrorKind::DeadlineExceeded => "request deadline exceeded",
            ErrorKind::Response => "response error",
            ErrorKind::Status => "response error",
            ErrorKind::NonJson => "non-JSON response",
            ErrorKind::Decode => "failed to decode response",
            ErrorKind::NoData => "no data found",
            ErrorKind::TooManyResults => "more than one result",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error attached to a failed endpoint call.
///
/// `message` follows one rule: when the server supplied a message it reads
/// `"<underlying error>: <server message>"`, otherwise it is the underlying
/// error's message verbatim. `code` is the server's error code, or the HTTP
/// status code when the server did not send one.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ResponseError {
    pub kind: ErrorKind,
    pub code: Option<String>,
    pub message: String,
    pub hint: Option<String>,
    pub details: Option<String>,
    /// Envelope of the failed call.
    pub response: Response,
    #[source]
    pub(crate) source: Option<BoxError>,
}

impl ResponseError {
    /// Error of `kind` with the kind's own description as its message.
    pub(crate) fn from_kind(kind: ErrorKind, response: Response) -> Self {
        Self {
            kind,
            code: None,
            message: kind.as_str().to_string(),
            hint: None,
            details: None,
            response,
            source: None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind || (kind == ErrorKind::Response && self.kind.is_response())
    }
}

/// Client error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid option: {0}")]
    Config(String),
    #[error("request options already used")]
    OptionsLocked,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
    #[error(transparent)]
    Response(Box<ResponseError>),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::OptionsLocked => ErrorKind::OptionsLocked,
            Error::Http(_) => ErrorKind::Transport,
            Error::Json(_) => ErrorKind::Decode,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            Error::Response(err) => err.kind,
        }
    }

    /// Returns `true` if this error is of `kind`.
    ///
    /// [`ErrorKind::Response`] also matches the more specific kinds for which
    /// [`ErrorKind::is_response`] holds.
    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            Error::Response(err) => err.is(kind),
            other => other.kind() == kind,
        }
    }

    /// Returns the structured response error, if this is one.
    pub fn response_error(&self) -> Option<&ResponseError> {
        match self {
            Error::Response(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the envelope of the failed call, if one was allocated.
    pub fn response(&self) -> Option<&Response> {
        self.response_error().map(|err| &err.response)
    }
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        Self::Response(Box::new(err))
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
