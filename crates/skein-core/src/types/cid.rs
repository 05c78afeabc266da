//! Content Identifier (CID) type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum accepted length of a CID string in bytes.
const MAX_CID_LENGTH: usize = 256;

/// A content identifier naming one immutable version of a record or commit.
///
/// CIDs are produced by the server and treated as opaque tokens: they are
/// compared for equality (for swap guards) and never ordered or computed
/// locally. Only the multibase text form is accepted, so the check is limited
/// to "non-empty ASCII alphanumeric".
///
/// # Example
///
/// ```
/// use skein_core::Cid;
///
/// let cid = Cid::new("bafyreie5737gdxlw5i64vzichcalba3z2v5n6icifvx5xytvske7mr3hpm").unwrap();
/// assert!(Cid::new("not a cid").is_err());
/// # let _ = cid;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

impl Cid {
    /// Create a new CID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, or contains
    /// characters outside the multibase alphabets.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the CID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Cid {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > MAX_CID_LENGTH {
            return Err(InvalidInputError::Cid {
                value: s.to_string(),
                reason: format!("exceeds maximum length of {} characters", MAX_CID_LENGTH),
            }
            .into());
        }

        if let Some(c) = s.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(InvalidInputError::Cid {
                value: s.to_string(),
                reason: format!("contains invalid character '{}'", c),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Cid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
