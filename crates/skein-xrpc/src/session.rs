//! Session creation and refresh.
//!
//! The client never keeps tokens itself. Callers take the tokens out of
//! [`SessionInfo`], persist them as they see fit, and build authenticated
//! clients with [`AtpClient::with_access_token`].

use tracing::{debug, info, instrument};

use skein_core::{
    AccessToken, Credentials, Did, Handle, RefreshToken, Result, XrpcResponse,
};

use crate::client::AtpClient;
use crate::xrpc::endpoints::{
    CREATE_SESSION, CreateSessionRequest, REFRESH_SESSION, SessionResponse,
};

/// An authenticated session as reported by the server.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub did: Did,
    pub handle: Handle,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub email: Option<String>,
    pub email_confirmed: Option<bool>,
    /// Whether the account is active; absent on older servers.
    pub active: Option<bool>,
}

impl TryFrom<SessionResponse> for SessionInfo {
    type Error = skein_core::Error;

    fn try_from(response: SessionResponse) -> Result<Self> {
        Ok(Self {
            did: response.did,
            handle: response.handle,
            access_token: AccessToken::new(response.access_jwt)?,
            refresh_token: RefreshToken::new(response.refresh_jwt)?,
            email: response.email,
            email_confirmed: response.email_confirmed,
            active: response.active,
        })
    }
}

impl AtpClient {
    /// Log in with a handle, DID or email and a password.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request cannot be serialized. Rejected
    /// credentials are reported in the response.
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    pub async fn create_session(
        &self,
        credentials: &Credentials,
    ) -> Result<XrpcResponse<SessionInfo>> {
        info!("creating session");

        let request = CreateSessionRequest {
            identifier: credentials.identifier(),
            password: credentials.password(),
            auth_factor_token: credentials.auth_factor_token(),
        };

        let response: XrpcResponse<SessionResponse> =
            self.xrpc().procedure(CREATE_SESSION, &request, None).await?;
        Ok(response.and_then(SessionInfo::try_from))
    }

    /// Exchange a refresh token for a fresh token pair.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<XrpcResponse<SessionInfo>> {
        debug!("refreshing session");

        let response: XrpcResponse<SessionResponse> = self
            .xrpc()
            .procedure_no_body(REFRESH_SESSION, Some(refresh_token.as_str()))
            .await;
        Ok(response.and_then(SessionInfo::try_from))
    }
}
