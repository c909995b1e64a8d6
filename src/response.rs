//! Response envelope and the decode pipeline shared by every endpoint.
//!
//! [`read_and_unmarshal`] turns a dispatched request into either typed data
//! or a [`ResponseError`]:
//!
//! 1. no response at all is a generic response error;
//! 2. the body is fully buffered and `gzip`/`deflate` content encoding is
//!    removed;
//! 3. a content type without `json` is rejected before any parsing;
//! 4. an empty body or failure status takes the error path;
//! 5. the error path decodes the server's `{code, message, details, hint}`
//!    body, if any, into the [`ResponseError`];
//! 6. otherwise the body is deserialized into the caller's type, and a
//!    deserialization failure takes the same error path;
//! 7. timing stats are attached when enabled.

use std::io::{self, Read};
use std::time::Duration;

use chrono::{DateTime, Utc};
use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use reqwest::header::{
    CONTENT_ENCODING, CONTENT_LOCATION, CONTENT_RANGE, CONTENT_TYPE, DATE, HeaderMap, HeaderName,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::context::Context;
use crate::error::{BoxError, Error, ErrorKind, ResponseError, Result};

/// HTTP metadata of one endpoint call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    pub request_method: String,
    pub request_url: String,
    /// Zero when no response was received.
    pub status_code: u16,
    pub status: String,
    pub date: Option<String>,
    pub content_range: Option<String>,
    pub content_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RequestStats>,
}

impl Response {
    pub(crate) fn new(method: &Method, url: impl Into<String>) -> Self {
        Self {
            request_method: method.to_string(),
            request_url: url.into(),
            ..Self::default()
        }
    }

    pub(crate) fn for_request(request: &reqwest::Request) -> Self {
        Self::new(request.method(), request.url().as_str())
    }

    fn record(&mut self, status: StatusCode, headers: &HeaderMap) {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.status_code = status.as_u16();
        self.status = status.to_string();
        self.date = header(DATE);
        self.content_range = header(CONTENT_RANGE);
        self.content_location = header(CONTENT_LOCATION);
    }
}

/// Timing of one request, collected when the client enables stats.
#[derive(Debug, Clone, Serialize)]
pub struct RequestStats {
    /// Wall-clock time the request was dispatched.
    pub req_started_at: DateTime<Utc>,
    /// Until response headers were received.
    pub ttfb: Duration,
    /// Until the body was fully read.
    pub req_dur: Duration,
}

/// Successful endpoint result: the envelope plus the decoded data.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub response: Response,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            response: self.response,
            data: f(self.data),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Narrow a list result to its only element.
    ///
    /// Zero elements is [`ErrorKind::NoData`], more than one is
    /// [`ErrorKind::TooManyResults`]; neither is treated as success.
    pub(crate) fn into_single(self) -> Result<ApiResponse<T>> {
        let ApiResponse { response, data } = self;
        let mut items = data.into_iter();
        match (items.next(), items.next()) {
            (Some(data), None) => Ok(ApiResponse { response, data }),
            (None, _) => Err(ResponseError::from_kind(ErrorKind::NoData, response).into()),
            (Some(_), Some(_)) => {
                Err(ResponseError::from_kind(ErrorKind::TooManyResults, response).into())
            }
        }
    }
}

/// A sent request whose response headers have arrived.
pub(crate) struct Dispatch {
    pub response: reqwest::Response,
    pub timing: Timing,
}

pub(crate) struct Timing {
    pub started: Instant,
    pub started_at: DateTime<Utc>,
    pub ttfb: Duration,
}

/// Failures detected by the pipeline itself, used as the underlying error
/// of a [`ResponseError`].
#[derive(Debug, thiserror::Error)]
enum PipelineError {
    #[error("response error: no response received")]
    NoResponse,
    #[error("response error: empty response body")]
    EmptyBody,
    #[error("response error: {0}")]
    Status(StatusCode),
    #[error("non-JSON response (content-type: {0})")]
    NonJson(String),
    #[error("failed to decompress {encoding} body: {source}")]
    Decompress {
        encoding: String,
        source: io::Error,
    },
}

/// Error body sent by the server. All fields are optional and `code` may be
/// a string or a number.
#[derive(Debug, Default, Deserialize)]
struct ServerError {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    hint: Option<serde_json::Value>,
}

fn value_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Build the [`ResponseError`] for a failed call.
///
/// `body` is inspected for a server error payload when non-empty. A payload
/// that does not parse is ignored.
pub(crate) fn apply_error(
    kind: ErrorKind,
    response: Response,
    underlying: BoxError,
    body: &[u8],
) -> Error {
    let server = if body.is_empty() {
        ServerError::default()
    } else {
        serde_json::from_slice::<ServerError>(body).unwrap_or_default()
    };

    let message = match server.message.as_deref().map(str::trim) {
        Some(msg) if !msg.is_empty() => format!("{underlying}: {msg}"),
        _ => underlying.to_string(),
    };
    let code = server
        .code
        .and_then(value_text)
        .or_else(|| (response.status_code != 0).then(|| response.status_code.to_string()));

    warn!(
        kind = %kind,
        code = code.as_deref().unwrap_or(""),
        url = %response.request_url,
        error = %message,
        "koios request failed"
    );

    ResponseError {
        kind,
        code,
        message,
        hint: server.hint.and_then(value_text),
        details: server.details.and_then(value_text),
        response,
        source: Some(underlying),
    }
    .into()
}

/// Record an error returned by dispatch on the call's envelope.
pub(crate) fn apply_dispatch_error(response: Response, err: Error) -> Error {
    match err {
        Error::Http(e) => apply_error(ErrorKind::Transport, response, Box::new(e), &[]),
        Error::Cancelled => apply_error(ErrorKind::Cancelled, response, Box::new(err), &[]),
        Error::DeadlineExceeded => {
            apply_error(ErrorKind::DeadlineExceeded, response, Box::new(err), &[])
        }
        other => other,
    }
}

/// Upper bound on a decoded body.
const MAX_DECOMPRESSED_BYTES: u64 = 256 * 1024 * 1024;

fn decompress(encoding: Option<&str>, body: Vec<u8>) -> io::Result<Vec<u8>> {
    decompress_limited(encoding, body, MAX_DECOMPRESSED_BYTES)
}

fn decompress_limited(encoding: Option<&str>, body: Vec<u8>, limit: u64) -> io::Result<Vec<u8>> {
    let Some(encoding) = encoding.map(|e| e.trim().to_ascii_lowercase()) else {
        return Ok(body);
    };
    if body.is_empty() {
        return Ok(body);
    }
    let hint = body
        .len()
        .saturating_mul(4)
        .min(usize::try_from(limit).unwrap_or(usize::MAX));
    match encoding.as_str() {
        "gzip" | "x-gzip" => read_capped(MultiGzDecoder::new(body.as_slice()), limit, hint),
        // Servers disagree on whether "deflate" is zlib-wrapped.
        "deflate" => match read_capped(ZlibDecoder::new(body.as_slice()), limit, hint) {
            Err(e) if e.kind() != io::ErrorKind::FileTooLarge => {
                read_capped(DeflateDecoder::new(body.as_slice()), limit, hint)
            }
            decoded => decoded,
        },
        _ => Ok(body),
    }
}

fn read_capped(reader: impl Read, limit: u64, hint: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(hint);
    reader.take(limit.saturating_add(1)).read_to_end(&mut out)?;
    if out.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::FileTooLarge,
            format!("decompressed body exceeds {limit} bytes"),
        ));
    }
    Ok(out)
}

fn finalize(response: &mut Response, timing: &Timing, collect_stats: bool) {
    if collect_stats {
        response.stats = Some(RequestStats {
            req_started_at: timing.started_at,
            ttfb: timing.ttfb,
            req_dur: timing.started.elapsed(),
        });
    }
}

/// Run the decode pipeline for one call.
#[instrument(name = "koios_decode", skip_all, fields(url = %response.request_url, status))]
pub(crate) async fn read_and_unmarshal<T: DeserializeOwned>(
    ctx: &Context,
    dispatch: Option<Dispatch>,
    mut response: Response,
    collect_stats: bool,
) -> Result<ApiResponse<T>> {
    let Some(dispatch) = dispatch else {
        return Err(apply_error(
            ErrorKind::Response,
            response,
            Box::new(PipelineError::NoResponse),
            &[],
        ));
    };
    let Dispatch {
        response: raw,
        timing,
    } = dispatch;

    let status = raw.status();
    tracing::Span::current().record("status", status.as_u16());
    let headers = raw.headers().clone();
    response.record(status, &headers);

    // Consuming the body releases the connection on every path below.
    let body = match ctx.run(raw.bytes()).await {
        Ok(Ok(bytes)) => bytes.to_vec(),
        Ok(Err(e)) => {
            finalize(&mut response, &timing, collect_stats);
            return Err(apply_error(ErrorKind::Transport, response, Box::new(e), &[]));
        }
        Err(e) => {
            finalize(&mut response, &timing, collect_stats);
            return Err(apply_dispatch_error(response, e));
        }
    };
    finalize(&mut response, &timing, collect_stats);

    let encoding = headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = match decompress(encoding.as_deref(), body) {
        Ok(body) => body,
        Err(source) => {
            let err = PipelineError::Decompress {
                encoding: encoding.unwrap_or_default(),
                source,
            };
            return Err(apply_error(ErrorKind::Decode, response, Box::new(err), &[]));
        }
    };

    debug!(
        status = status.as_u16(),
        body_length = body.len(),
        content_range = response.content_range.as_deref().unwrap_or(""),
        "koios response received"
    );

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.to_ascii_lowercase().contains("json") {
        let details = String::from_utf8_lossy(&body).into_owned();
        let err = apply_error(
            ErrorKind::NonJson,
            response,
            Box::new(PipelineError::NonJson(content_type)),
            &[],
        );
        return Err(match err {
            Error::Response(mut inner) => {
                inner.details = (!details.is_empty()).then_some(details);
                Error::Response(inner)
            }
            other => other,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        let (kind, underlying) = if status.is_success() {
            (ErrorKind::Response, PipelineError::EmptyBody)
        } else {
            (ErrorKind::Status, PipelineError::Status(status))
        };
        return Err(apply_error(kind, response, Box::new(underlying), &[]));
    }

    if !status.is_success() {
        return Err(apply_error(
            ErrorKind::Status,
            response,
            Box::new(PipelineError::Status(status)),
            &body,
        ));
    }

    match serde_json::from_slice::<T>(&body) {
        Ok(data) => Ok(ApiResponse { response, data }),
        Err(e) => Err(apply_error(ErrorKind::Decode, response, Box::new(e), &body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
    use std::io::Write;

    fn envelope() -> Response {
        let mut response = Response::new(&Method::GET, "https://api.koios.rest/api/v1/tip");
        response.status_code = 400;
        response.status = "400 Bad Request".to_string();
        response
    }

    #[test]
    fn server_message_is_appended() {
        let body = br#"{"code":"PGRST100","message":"bad request","hint":"check _epoch_no","details":"failed to parse"}"#;
        let err = apply_error(
            ErrorKind::Status,
            envelope(),
            Box::new(PipelineError::Status(StatusCode::BAD_REQUEST)),
            body,
        );
        let err = err.response_error().unwrap();
        assert_eq!(err.code.as_deref(), Some("PGRST100"));
        assert_eq!(err.message, "response error: 400 Bad Request: bad request");
        assert_eq!(err.hint.as_deref(), Some("check _epoch_no"));
        assert_eq!(err.details.as_deref(), Some("failed to parse"));
        assert!(std::error::Error::source(err).is_some());
    }

    #[test]
    fn missing_server_message_uses_underlying() {
        let err = apply_error(
            ErrorKind::Status,
            envelope(),
            Box::new(PipelineError::Status(StatusCode::BAD_REQUEST)),
            br#"{"hint":"none"}"#,
        );
        let err = err.response_error().unwrap();
        assert_eq!(err.message, "response error: 400 Bad Request");
        assert_eq!(err.code.as_deref(), Some("400"));
    }

    #[test]
    fn numeric_code_and_unparseable_body() {
        let numeric = apply_error(
            ErrorKind::Status,
            envelope(),
            Box::new(PipelineError::EmptyBody),
            br#"{"code":429,"message":"slow down"}"#,
        );
        assert_eq!(numeric.response_error().unwrap().code.as_deref(), Some("429"));

        let garbage = apply_error(
            ErrorKind::Decode,
            envelope(),
            Box::new(PipelineError::EmptyBody),
            b"[1, 2",
        );
        let garbage = garbage.response_error().unwrap();
        assert_eq!(garbage.message, "response error: empty response body");
        assert_eq!(garbage.code.as_deref(), Some("400"));
    }

    #[test]
    fn no_status_means_no_fallback_code() {
        let err = apply_error(
            ErrorKind::Transport,
            Response::default(),
            Box::new(PipelineError::NoResponse),
            &[],
        );
        assert_eq!(err.response_error().unwrap().code, None);
    }

    #[test]
    fn gzip_and_deflate_are_transparent() {
        let json = br#"[{"epoch_no":320}]"#;

        let mut gz = GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(json).unwrap();
        let gz = gz.finish().unwrap();
        assert_eq!(decompress(Some("gzip"), gz).unwrap(), json);

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(json).unwrap();
        let zlib = zlib.finish().unwrap();
        assert_eq!(decompress(Some("deflate"), zlib).unwrap(), json);

        assert_eq!(decompress(None, json.to_vec()).unwrap(), json);
        assert_eq!(decompress(Some("identity"), json.to_vec()).unwrap(), json);
    }

    #[test]
    fn raw_deflate_and_multi_member_gzip() {
        let json = br#"[{"epoch_no":320}]"#;

        let mut raw = DeflateEncoder::new(Vec::new(), Compression::default());
        raw.write_all(json).unwrap();
        let raw = raw.finish().unwrap();
        assert_eq!(decompress(Some("deflate"), raw).unwrap(), json);

        let mut body = Vec::new();
        for part in [&b"[{\"epoch_no\":"[..], &b"320}]"[..]] {
            let mut gz = GzEncoder::new(Vec::new(), Compression::default());
            gz.write_all(part).unwrap();
            body.extend(gz.finish().unwrap());
        }
        assert_eq!(decompress(Some("x-gzip"), body).unwrap(), json);
    }

    #[test]
    fn corrupt_gzip_fails() {
        assert!(decompress(Some("gzip"), b"not gzip".to_vec()).is_err());
    }

    #[test]
    fn decoded_body_is_capped() {
        let zeros = vec![0u8; 64 * 1024];

        let mut gz = GzEncoder::new(Vec::new(), Compression::best());
        gz.write_all(&zeros).unwrap();
        let gz = gz.finish().unwrap();
        assert!(gz.len() < 1024);
        let err = decompress_limited(Some("gzip"), gz.clone(), 1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::FileTooLarge);
        assert_eq!(decompress_limited(Some("gzip"), gz, 64 * 1024).unwrap(), zeros);

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::best());
        zlib.write_all(&zeros).unwrap();
        let err = decompress_limited(Some("deflate"), zlib.finish().unwrap(), 1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::FileTooLarge);
    }

    #[tokio::test]
    async fn absent_response_is_generic_error() {
        let err = read_and_unmarshal::<serde_json::Value>(
            &Context::new(),
            None,
            Response::new(&Method::GET, "https://api.koios.rest/api/v1/tip"),
            false,
        )
        .await
        .unwrap_err();
        assert!(err.is(ErrorKind::Response));
        assert_eq!(err.kind(), ErrorKind::Response);
        assert_eq!(
            err.response().unwrap().request_url,
            "https://api.koios.rest/api/v1/tip"
        );
    }

    #[test]
    fn single_from_list() {
        let one = ApiResponse {
            response: Response::default(),
            data: vec![7],
        };
        assert_eq!(one.into_single().unwrap().data, 7);

        let none: ApiResponse<Vec<i32>> = ApiResponse {
            response: Response::default(),
            data: vec![],
        };
        assert!(none.into_single().unwrap_err().is(ErrorKind::NoData));

        let two = ApiResponse {
            response: Response::default(),
            data: vec![1, 2],
        };
        assert!(two.into_single().unwrap_err().is(ErrorKind::TooManyResults));
    }
}
