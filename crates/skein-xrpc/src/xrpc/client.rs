//! XRPC HTTP client implementation.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use skein_core::error::{ProtocolError, TransportError};
use skein_core::{Error, PdsUrl, RateLimit, RemoteError, Result, XrpcResponse};

use super::endpoints::XrpcErrorResponse;

/// HTTP client for XRPC requests.
///
/// Every call yields an [`XrpcResponse`]: transport failures, error statuses
/// and undecodable bodies are reported inside it rather than as `Err`.
#[derive(Debug, Clone)]
pub struct XrpcClient {
    http: reqwest::Client,
    pds: PdsUrl,
}

impl XrpcClient {
    /// Create a new XRPC client for the given PDS.
    pub fn new(pds: PdsUrl) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("skein/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(transport_error(&e)))?;

        Ok(Self { http, pds })
    }

    /// Create a client that shares a caller-configured HTTP client.
    pub fn with_http_client(http: reqwest::Client, pds: PdsUrl) -> Self {
        Self { http, pds }
    }

    /// Returns the PDS URL this client is configured for.
    pub fn pds(&self) -> &PdsUrl {
        &self.pds
    }

    /// Returns the underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Make an XRPC query (GET request).
    #[instrument(skip(self, params, token), fields(pds = %self.pds))]
    pub async fn query<Q, R>(&self, method: &str, params: &Q, token: Option<&str>) -> XrpcResponse<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, authenticated = token.is_some(), "XRPC query");
        trace!(?params, "query parameters");

        let request = authorize(self.http.get(&url).query(params), token);
        self.execute(request).await
    }

    /// Make an XRPC procedure (POST request) with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error only if `body` cannot be serialized.
    #[instrument(skip(self, body, token), fields(pds = %self.pds))]
    pub async fn procedure<B, R>(
        &self,
        method: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<XrpcResponse<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, authenticated = token.is_some(), "XRPC procedure");

        let body = serde_json::to_vec(body)?;
        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        Ok(self.execute(authorize(request, token)).await)
    }

    /// Make an XRPC procedure with no request body.
    ///
    /// Used for endpoints like refreshSession that take their input from the
    /// Authorization header.
    #[instrument(skip(self, token), fields(pds = %self.pds))]
    pub async fn procedure_no_body<R>(&self, method: &str, token: Option<&str>) -> XrpcResponse<R>
    where
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, "XRPC procedure (no body)");

        self.execute(authorize(self.http.post(&url), token)).await
    }

    /// Make an XRPC procedure with a raw byte body.
    #[instrument(skip(self, bytes, token), fields(pds = %self.pds, size = bytes.len()))]
    pub async fn procedure_bytes<R>(
        &self,
        method: &str,
        bytes: Vec<u8>,
        content_type: &str,
        token: Option<&str>,
    ) -> XrpcResponse<R>
    where
        R: DeserializeOwned,
    {
        let url = self.pds.xrpc_url(method);
        debug!(method, content_type, "XRPC procedure (raw body)");

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);

        self.execute(authorize(request, token)).await
    }

    /// Send a request and fold every outcome into an [`XrpcResponse`].
    async fn execute<R: DeserializeOwned>(&self, request: RequestBuilder) -> XrpcResponse<R> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "XRPC transport failure");
                return XrpcResponse::failure(None, None, transport_error(&err).into());
            }
        };

        let status = response.status();
        let rate_limit = rate_limit(response.headers());
        trace!(status = %status, "XRPC response");

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                debug!(error = %err, "failed to read XRPC response body");
                return XrpcResponse::failure(
                    Some(status.as_u16()),
                    rate_limit,
                    transport_error(&err).into(),
                );
            }
        };

        if !status.is_success() {
            let error = parse_error_body(status, &body);
            debug!(%error, "XRPC error response");
            return XrpcResponse::failure(Some(status.as_u16()), rate_limit, error.into());
        }

        // Some procedures answer 200 with an empty body.
        let body: &[u8] = if body.is_empty() { b"{}" } else { &body };
        match serde_json::from_slice::<R>(body) {
            Ok(payload) => XrpcResponse::success(status.as_u16(), rate_limit, payload),
            Err(err) => {
                debug!(error = %err, "failed to decode XRPC response body");
                XrpcResponse::failure(
                    Some(status.as_u16()),
                    rate_limit,
                    RemoteError::Decode {
                        message: err.to_string(),
                    },
                )
            }
        }
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Parse an XRPC error body, tolerating bodies that are not XRPC errors.
fn parse_error_body(status: StatusCode, body: &[u8]) -> ProtocolError {
    match serde_json::from_slice::<XrpcErrorResponse>(body) {
        Ok(error_body) => ProtocolError::new(status.as_u16(), error_body.error, error_body.message),
        Err(_) => ProtocolError::new(status.as_u16(), None, None),
    }
}

fn rate_limit(headers: &HeaderMap) -> Option<RateLimit> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    RateLimit::from_header_values(
        header("ratelimit-limit"),
        header("ratelimit-remaining"),
        header("ratelimit-reset"),
        header("ratelimit-policy"),
    )
}

/// Classify a reqwest error.
pub(crate) fn transport_error(err: &reqwest::Error) -> TransportError {
    let message = err.to_string();
    if err.is_timeout() {
        TransportError::Timeout { message }
    } else if err.is_connect() {
        TransportError::Connection { message }
    } else {
        TransportError::Http { message }
    }
}
