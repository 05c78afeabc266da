//! Error types for skein.
//!
//! [`Error`] covers failures detected locally, before any request leaves the
//! process: bad arguments, missing credentials, payloads that cannot be
//! serialized, cancellation. Failures reported by (or on the way to) a remote
//! server are carried by [`RemoteError`](crate::response::RemoteError) inside an
//! [`XrpcResponse`](crate::response::XrpcResponse) instead.

use std::fmt;
use thiserror::Error;

/// The unified local error type for skein operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not be constructed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication preconditions were not met.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Input validation errors (invalid DID, NSID, limit, batch, ...).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A local payload could not be serialized.
    #[error("serialization failed: {message}")]
    Serialization { message: String },

    /// The operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Returns true if this error is a local precondition violation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The operation writes to a repository and needs an access token.
    #[error("operation requires an authenticated client")]
    SessionRequired,

    /// The supplied token cannot be sent as a bearer credential.
    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },
}

/// Protocol-level errors from XRPC responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// XRPC error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.error_is("AuthenticationRequired")
            || self.error_is("ExpiredToken")
            || self.error_is("InvalidToken")
    }

    /// Check if a swap guard (`swapRecord` / `swapCommit`) was rejected.
    pub fn is_swap_conflict(&self) -> bool {
        self.error_is("InvalidSwap")
    }

    /// Check if the request was rejected by rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429 || self.error_is("RateLimitExceeded")
    }

    /// Check if the server rejected the record against its schema.
    pub fn is_validation_failure(&self) -> bool {
        self.error_is("InvalidRecord")
    }

    /// Check if the requested record (or record version) does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.error_is("RecordNotFound")
    }

    fn error_is(&self, code: &str) -> bool {
        self.error.as_deref() == Some(code)
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error)]
pub enum InvalidInputError {
    /// Invalid DID format.
    #[error("invalid DID '{value}': {reason}")]
    Did { value: String, reason: String },

    /// Invalid handle format.
    #[error("invalid handle '{value}': {reason}")]
    Handle { value: String, reason: String },

    /// Invalid NSID format.
    #[error("invalid NSID '{value}': {reason}")]
    Nsid { value: String, reason: String },

    /// Invalid AT URI format.
    #[error("invalid AT URI '{value}': {reason}")]
    AtUri { value: String, reason: String },

    /// Invalid PDS URL format.
    #[error("invalid PDS URL '{value}': {reason}")]
    PdsUrl { value: String, reason: String },

    /// Invalid record key format.
    #[error("invalid rkey '{value}': {reason}")]
    Rkey { value: String, reason: String },

    /// Invalid CID format.
    #[error("invalid CID '{value}': {reason}")]
    Cid { value: String, reason: String },

    /// Invalid record value.
    #[error("invalid record value: {reason}")]
    RecordValue { reason: String },

    /// Page size outside the accepted range.
    #[error("limit {value} must be between {min} and {max}")]
    Limit { value: u32, min: u32, max: u32 },

    /// A batch write was submitted with no operations.
    #[error("batch writes cannot be empty")]
    EmptyBatch,

    /// A batch write exceeds the protocol limit.
    #[error("batch of {count} writes exceeds the maximum of {max}")]
    BatchTooLarge { count: usize, max: usize },

    /// Blob payload is unusable.
    #[error("invalid blob: {reason}")]
    Blob { reason: String },

    /// MIME type is not of the form `type/subtype`.
    #[error("invalid MIME type '{value}': must be in the format 'type/subtype'")]
    MimeType { value: String },

    /// A facet feature (mention, link, hashtag) is unusable.
    #[error("invalid facet: {reason}")]
    Facet { reason: String },

    /// Text exceeds a length limit.
    #[error("{what} is too long: {actual} {unit} exceeds the maximum of {max}")]
    TextTooLong {
        what: &'static str,
        unit: &'static str,
        actual: usize,
        max: usize,
    },

    /// The requested embed combination is not representable.
    #[error("invalid embed: {reason}")]
    Embed { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
