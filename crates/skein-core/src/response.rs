//! The uniform outcome of a remote call.
//!
//! Every repository and session operation reports its remote outcome through
//! [`XrpcResponse`]: expected failures such as a swap conflict, a missing
//! record or rate limiting are ordinary values here, not `Err`s.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::error::{ProtocolError, TransportError};

/// Rate-limit metadata reported by the server in `ratelimit-*` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed in the current window.
    pub limit: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// When the window resets.
    pub reset: DateTime<Utc>,
    /// The raw policy string (e.g. `3000;w=300`), if sent.
    pub policy: Option<String>,
}

impl RateLimit {
    /// Build rate-limit metadata from raw header values.
    ///
    /// Returns `None` unless `limit`, `remaining` and `reset` are all present
    /// and numeric. `reset` is in Unix seconds.
    pub fn from_header_values(
        limit: Option<&str>,
        remaining: Option<&str>,
        reset: Option<&str>,
        policy: Option<&str>,
    ) -> Option<Self> {
        let limit = limit?.trim().parse().ok()?;
        let remaining = remaining?.trim().parse().ok()?;
        let reset_secs: i64 = reset?.trim().parse().ok()?;
        let reset = Utc.timestamp_opt(reset_secs, 0).single()?;

        Some(Self {
            limit,
            remaining,
            reset,
            policy: policy.map(str::to_string),
        })
    }
}

/// Why a remote call did not produce a payload.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The request never produced an HTTP response (connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with an error status.
    #[error("server error: {0}")]
    Server(#[from] ProtocolError),

    /// The server answered successfully but the body could not be decoded.
    #[error("malformed response body: {message}")]
    Decode { message: String },
}

/// Coarse classification of a [`RemoteError`] for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connectivity or timeout.
    Transport,
    /// A swap guard did not match: someone else moved first.
    ConcurrencyConflict,
    /// The caller is being rate limited.
    RateLimited,
    /// The record failed schema validation on the server.
    Validation,
    /// The record (or record version) is not available.
    NotFound,
    /// Missing, expired or rejected credentials.
    Authentication,
    /// Any other server-reported error.
    Server,
    /// The response body could not be decoded.
    Serialization,
}

impl RemoteError {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteError::Transport(_) => FailureKind::Transport,
            RemoteError::Decode { .. } => FailureKind::Serialization,
            RemoteError::Server(err) => {
                if err.is_swap_conflict() {
                    FailureKind::ConcurrencyConflict
                } else if err.is_rate_limited() {
                    FailureKind::RateLimited
                } else if err.is_validation_failure() {
                    FailureKind::Validation
                } else if err.is_not_found() {
                    FailureKind::NotFound
                } else if err.is_auth_error() {
                    FailureKind::Authentication
                } else {
                    FailureKind::Server
                }
            }
        }
    }

    /// Returns the structured server error, if the server sent one.
    pub fn detail(&self) -> Option<&ProtocolError> {
        match self {
            RemoteError::Server(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of one XRPC call.
///
/// Carries the HTTP status (absent when no response arrived), any rate-limit
/// metadata, and either a decoded payload or a [`RemoteError`]. Callers branch
/// on [`succeeded`](Self::succeeded).
///
/// A failed listing still carries an empty page as its payload, so
/// [`payload`](Self::payload) can be `Some` while `succeeded()` is false.
#[derive(Debug, Clone)]
pub struct XrpcResponse<T> {
    status: Option<u16>,
    rate_limit: Option<RateLimit>,
    payload: Option<T>,
    error: Option<RemoteError>,
}

impl<T> XrpcResponse<T> {
    /// A successful response.
    pub fn success(status: u16, rate_limit: Option<RateLimit>, payload: T) -> Self {
        Self {
            status: Some(status),
            rate_limit,
            payload: Some(payload),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(status: Option<u16>, rate_limit: Option<RateLimit>, error: RemoteError) -> Self {
        Self {
            status,
            rate_limit,
            payload: None,
            error: Some(error),
        }
    }

    /// Returns true when the call produced a payload and no error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.payload.is_some()
    }

    /// HTTP status code, if a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Rate-limit metadata, if the server sent it.
    pub fn rate_limit(&self) -> Option<&RateLimit> {
        self.rate_limit.as_ref()
    }

    /// The decoded payload, if any.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Consume the response, returning the payload if any.
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&RemoteError> {
        self.error.as_ref()
    }

    /// The structured server error (`error` code and `message`), if any.
    pub fn error_detail(&self) -> Option<&ProtocolError> {
        self.error.as_ref().and_then(RemoteError::detail)
    }

    /// Classification of the failure, if any.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(RemoteError::kind)
    }

    /// Returns true if a swap guard was rejected.
    pub fn is_conflict(&self) -> bool {
        self.failure_kind() == Some(FailureKind::ConcurrencyConflict)
    }

    /// Convert into a standard `Result`.
    ///
    /// A failure always maps to `Err`, even when a placeholder payload is
    /// attached.
    pub fn into_result(self) -> Result<T, RemoteError> {
        match (self.error, self.payload) {
            (Some(err), _) => Err(err),
            (None, Some(payload)) => Ok(payload),
            (None, None) => Err(RemoteError::Decode {
                message: "response carried no payload".to_string(),
            }),
        }
    }

    /// Map the payload, keeping status, rate limit and error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> XrpcResponse<U> {
        XrpcResponse {
            status: self.status,
            rate_limit: self.rate_limit,
            payload: self.payload.map(f),
            error: self.error,
        }
    }

    /// Map the payload through a fallible conversion.
    ///
    /// A conversion failure turns a success into a [`RemoteError::Decode`].
    pub fn and_then<U, E: std::fmt::Display>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> XrpcResponse<U> {
        match (self.error, self.payload) {
            (None, Some(payload)) => match f(payload) {
                Ok(mapped) => XrpcResponse {
                    status: self.status,
                    rate_limit: self.rate_limit,
                    payload: Some(mapped),
                    error: None,
                },
                Err(err) => XrpcResponse::failure(
                    self.status,
                    self.rate_limit,
                    RemoteError::Decode {
                        message: err.to_string(),
                    },
                ),
            },
            (error, _) => XrpcResponse {
                status: self.status,
                rate_limit: self.rate_limit,
                payload: None,
                error,
            },
        }
    }

    /// Attach a placeholder payload to a failed response.
    pub fn or_payload(mut self, fallback: impl FnOnce() -> T) -> Self {
        if self.payload.is_none() {
            self.payload = Some(fallback());
        }
        self
    }
}
