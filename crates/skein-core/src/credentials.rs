//! Login credentials type.

use std::fmt;

/// Login credentials for creating a session.
///
/// Holds the identifier (handle, DID or email) and the password or app
/// password. The password never appears in Debug output.
///
/// # Example
///
/// ```
/// use skein_core::Credentials;
///
/// let creds = Credentials::new("alice.bsky.social", "app-password-here");
/// assert_eq!(creds.identifier(), "alice.bsky.social");
/// ```
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: String,
    auth_factor_token: Option<String>,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            auth_factor_token: None,
        }
    }

    /// Attach the emailed sign-in code for accounts with two-factor auth.
    pub fn with_auth_factor_token(mut self, token: impl Into<String>) -> Self {
        self.auth_factor_token = Some(token.into());
        self
    }

    /// Returns the identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password.
    ///
    /// Only for building the session request; never log it.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the two-factor sign-in code, if any.
    pub fn auth_factor_token(&self) -> Option<&str> {
        self.auth_factor_token.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .field(
                "auth_factor_token",
                &self.auth_factor_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_secrets_in_debug() {
        let creds = Credentials::new("alice.bsky.social", "secret123")
            .with_auth_factor_token("ABCDE-12345");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice.bsky.social"));
        assert!(!debug.contains("secret123"));
        assert!(!debug.contains("ABCDE"));
    }
}
