//! Repository identifier: a DID or a handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Did, Handle};
use crate::error::{Error, InvalidInputError};

/// Names a repository by DID or by handle.
///
/// Read operations accept either form; the server resolves handles itself.
/// Writes take a [`Did`] directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AtIdentifier {
    Did(Did),
    Handle(Handle),
}

impl AtIdentifier {
    /// Parse a DID (`did:` prefix) or a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        if s.starts_with("did:") {
            return Ok(Self::Did(Did::new(s)?));
        }
        Handle::new(s.clone()).map(Self::Handle).map_err(|_| {
            InvalidInputError::Other {
                message: format!("'{}' is neither a DID nor a handle", s),
            }
            .into()
        })
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Did(did) => did.as_str(),
            Self::Handle(handle) => handle.as_str(),
        }
    }

    /// Returns the DID if this identifier is one.
    pub fn as_did(&self) -> Option<&Did> {
        match self {
            Self::Did(did) => Some(did),
            Self::Handle(_) => None,
        }
    }
}

impl From<Did> for AtIdentifier {
    fn from(did: Did) -> Self {
        Self::Did(did)
    }
}

impl From<&Did> for AtIdentifier {
    fn from(did: &Did) -> Self {
        Self::Did(did.clone())
    }
}

impl From<Handle> for AtIdentifier {
    fn from(handle: Handle) -> Self {
        Self::Handle(handle)
    }
}

impl fmt::Display for AtIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AtIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AtIdentifier {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AtIdentifier> for String {
    fn from(id: AtIdentifier) -> Self {
        match id {
            AtIdentifier::Did(did) => did.into(),
            AtIdentifier::Handle(handle) => handle.into(),
        }
    }
}
