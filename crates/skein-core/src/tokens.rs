//! Bearer token types.

use std::fmt;

use crate::error::{AuthError, Error};

/// An access token for authenticated XRPC requests.
///
/// Short-lived JWT supplied by the caller (or returned by session creation).
/// Never shown in Debug output.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or cannot be sent in an
    /// `Authorization` header.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        let token = token.into();
        validate_bearer(&token)?;
        Ok(Self(token))
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Never shown in Debug output.
#[derive(Clone)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Wrap a token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or cannot be sent in an
    /// `Authorization` header.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        let token = token.into();
        validate_bearer(&token)?;
        Ok(Self(token))
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

fn validate_bearer(token: &str) -> Result<(), Error> {
    if token.is_empty() {
        return Err(AuthError::InvalidToken {
            reason: "token cannot be empty".to_string(),
        }
        .into());
    }
    if !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(AuthError::InvalidToken {
            reason: "token must be visible ASCII without whitespace".to_string(),
        }
        .into());
    }
    Ok(())
}
