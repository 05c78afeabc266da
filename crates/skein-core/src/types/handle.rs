//! Handle type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum length of a handle (a DNS hostname) in bytes.
const MAX_HANDLE_LENGTH: usize = 253;

/// Maximum length of a single DNS label in bytes.
const MAX_LABEL_LENGTH: usize = 63;

/// A validated AT Protocol handle.
///
/// Handles are DNS hostnames that alias a [`Did`](super::Did). A handle is not an
/// identity on its own: it has to be resolved, and resolution may legitimately
/// find nothing. Handles are case-insensitive and stored lowercased.
///
/// # Example
///
/// ```
/// use skein_core::Handle;
///
/// let handle = Handle::new("Alice.bsky.social").unwrap();
/// assert_eq!(handle.as_str(), "alice.bsky.social");
/// assert!(Handle::new("not a hostname").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Create a new handle from a string, validating DNS hostname syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a syntactically valid hostname.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Returns the handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the top-level domain label.
    pub fn tld(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::Handle {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }

        if s.len() > MAX_HANDLE_LENGTH {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_HANDLE_LENGTH
            )));
        }

        let labels: Vec<&str> = s.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("must have at least two labels".to_string()));
        }

        for label in &labels {
            if label.is_empty() {
                return Err(invalid("contains an empty label".to_string()));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(invalid(format!(
                    "label '{}' exceeds {} characters",
                    label, MAX_LABEL_LENGTH
                )));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid(format!(
                    "label '{}' cannot start or end with a hyphen",
                    label
                )));
            }
            if let Some(c) = label
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
            {
                return Err(invalid(format!(
                    "label '{}' contains invalid character '{}'",
                    label, c
                )));
            }
        }

        let tld = labels[labels.len() - 1];
        if !tld.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid("top-level domain must start with a letter".to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Handle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
