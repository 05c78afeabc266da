//! Namespaced Identifier (NSID) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated AT Protocol Namespaced Identifier (NSID).
///
/// NSIDs use reverse-DNS notation to identify lexicon types and the record
/// collections named after them.
///
/// # Example
///
/// ```
/// use skein_core::Nsid;
///
/// let nsid = Nsid::new("app.bsky.feed.post").unwrap();
/// assert_eq!(nsid.authority(), "app.bsky.feed");
/// assert_eq!(nsid.name(), "post");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nsid(String);

impl Nsid {
    /// Create a new NSID from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid NSID format.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the domain authority (every segment but the last).
    pub fn authority(&self) -> &str {
        self.0.rsplit_once('.').map(|(a, _)| a).unwrap_or("")
    }

    /// Returns the name (the last segment).
    pub fn name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    /// Returns the full NSID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the segments of the NSID.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Nsid {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > 317 {
            return Err(InvalidInputError::Nsid {
                value: s.to_string(),
                reason: "exceeds maximum length of 317 characters".to_string(),
            }
            .into());
        }

        let segments: Vec<&str> = s.split('.').collect();

        if segments.len() < 3 {
            return Err(InvalidInputError::Nsid {
                value: s.to_string(),
                reason: "must have at least 3 segments (e.g., 'app.bsky.feed')".to_string(),
            }
            .into());
        }

        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(InvalidInputError::Nsid {
                    value: s.to_string(),
                    reason: format!("segment {} is empty", i + 1),
                }
                .into());
            }

            if segment.len() > 63 {
                return Err(InvalidInputError::Nsid {
                    value: s.to_string(),
                    reason: format!("segment '{}' exceeds 63 characters", segment),
                }
                .into());
            }

            if !segment.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(InvalidInputError::Nsid {
                    value: s.to_string(),
                    reason: format!("segment '{}' must start with a letter", segment),
                }
                .into());
            }

            // The name segment is letters and digits only; authority segments
            // may also carry hyphens.
            let allowed = |c: char| c.is_ascii_alphanumeric() || (i != last && c == '-');
            if let Some(c) = segment.chars().find(|c| !allowed(*c)) {
                return Err(InvalidInputError::Nsid {
                    value: s.to_string(),
                    reason: format!("segment '{}' contains invalid character '{}'", segment, c),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for Nsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Nsid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Nsid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Nsid> for String {
    fn from(nsid: Nsid) -> Self {
        nsid.0
    }
}

impl AsRef<str> for Nsid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
