//! The AT Protocol client value.

use tracing::{debug, instrument};

use skein_core::error::AuthError;
use skein_core::{AccessToken, Did, Handle, PdsUrl, Result, XrpcResponse};

use crate::xrpc::XrpcClient;
use crate::xrpc::endpoints::{RESOLVE_HANDLE, ResolveHandleQuery, ResolveHandleResponse};

/// A client for one PDS, optionally authenticated.
///
/// Immutable: authenticating produces a new value via
/// [`with_access_token`](Self::with_access_token). Cloning is cheap and clones
/// share the underlying connection pool.
///
/// Repository operations live in the [`repo`](crate::repo) module, session
/// operations in [`session`](crate::session).
#[derive(Debug, Clone)]
pub struct AtpClient {
    xrpc: XrpcClient,
    token: Option<AccessToken>,
}

impl AtpClient {
    /// Create an unauthenticated client for `pds`.
    pub fn new(pds: PdsUrl) -> Result<Self> {
        Ok(Self::from_xrpc(XrpcClient::new(pds)?))
    }

    /// Wrap an existing XRPC client.
    pub fn from_xrpc(xrpc: XrpcClient) -> Self {
        Self { xrpc, token: None }
    }

    /// A copy of this client that sends `token` as its bearer credential.
    pub fn with_access_token(&self, token: AccessToken) -> Self {
        Self {
            xrpc: self.xrpc.clone(),
            token: Some(token),
        }
    }

    /// A copy of this client with no credential.
    pub fn unauthenticated(&self) -> Self {
        Self::from_xrpc(self.xrpc.clone())
    }

    pub fn pds(&self) -> &PdsUrl {
        self.xrpc.pds()
    }

    pub fn xrpc(&self) -> &XrpcClient {
        &self.xrpc
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token to send, if any.
    pub(crate) fn bearer(&self) -> Option<&str> {
        self.token.as_ref().map(AccessToken::as_str)
    }

    /// The bearer token for an operation that cannot run without one.
    pub(crate) fn require_token(&self) -> Result<&str> {
        self.bearer().ok_or_else(|| AuthError::SessionRequired.into())
    }

    /// Ask the PDS to resolve `handle`.
    ///
    /// Unlike [`HandleResolver`](crate::identity::HandleResolver) this trusts
    /// the server's answer.
    #[instrument(skip(self), fields(%handle))]
    pub async fn resolve_handle(&self, handle: &Handle) -> XrpcResponse<Did> {
        debug!("resolving handle via PDS");
        let query = ResolveHandleQuery {
            handle: handle.as_str(),
        };
        let response: XrpcResponse<ResolveHandleResponse> =
            self.xrpc.query(RESOLVE_HANDLE, &query, self.bearer()).await;
        response.map(|r| r.did)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_access_token_returns_new_value() {
        let client = AtpClient::new(PdsUrl::new("https://bsky.social").unwrap()).unwrap();
        let authed = client.with_access_token(AccessToken::new("token-value").unwrap());

        assert!(!client.is_authenticated());
        assert!(authed.is_authenticated());
        assert!(!authed.unauthenticated().is_authenticated());
        assert_eq!(authed.pds(), client.pds());
    }

    #[test]
    fn require_token_without_session() {
        let client = AtpClient::new(PdsUrl::new("https://bsky.social").unwrap()).unwrap();
        let err = client.require_token().unwrap_err();
        assert!(matches!(
            err,
            skein_core::Error::Auth(AuthError::SessionRequired)
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let client = AtpClient::new(PdsUrl::new("https://bsky.social").unwrap())
            .unwrap()
            .with_access_token(AccessToken::new("super-secret-jwt").unwrap());
        assert!(!format!("{:?}", client).contains("super-secret-jwt"));
    }
}
