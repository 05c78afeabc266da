//! AT URI type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Did, Nsid, Rkey};
use crate::error::{Error, InvalidInputError};

/// A validated AT Protocol record URI: `at://<did>/<collection>/<rkey>`.
///
/// The URI names a record's identity across versions; pair it with a
/// [`Cid`](super::Cid) (see [`StrongRef`](crate::repo::StrongRef)) to name one
/// version.
///
/// # Example
///
/// ```
/// use skein_core::AtUri;
///
/// let uri = AtUri::new("at://did:plc:z72i7hdynmk6r22z27h6tvur/app.bsky.feed.post/3jui7kd54zh2y").unwrap();
/// assert_eq!(uri.collection().as_str(), "app.bsky.feed.post");
/// assert_eq!(uri.rkey().as_str(), "3jui7kd54zh2y");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AtUri {
    repo: Did,
    collection: Nsid,
    rkey: Rkey,
}

impl AtUri {
    /// Parse an AT URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid record URI.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref())
    }

    /// Build an AT URI from its components.
    pub fn from_parts(repo: Did, collection: Nsid, rkey: Rkey) -> Self {
        Self {
            repo,
            collection,
            rkey,
        }
    }

    /// Returns the repository DID.
    pub fn repo(&self) -> &Did {
        &self.repo
    }

    /// Returns the collection NSID.
    pub fn collection(&self) -> &Nsid {
        &self.collection
    }

    /// Returns the record key.
    pub fn rkey(&self) -> &Rkey {
        &self.rkey
    }

    fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::AtUri {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        let rest = s
            .strip_prefix("at://")
            .ok_or_else(|| invalid("must start with 'at://'".to_string()))?;

        let mut parts = rest.split('/');
        let (Some(repo), Some(collection), Some(rkey), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid(
                "must have format 'at://<repo>/<collection>/<rkey>'".to_string(),
            ));
        };

        let repo = Did::new(repo).map_err(|_| invalid(format!("invalid DID: {}", repo)))?;
        let collection = Nsid::new(collection)
            .map_err(|_| invalid(format!("invalid NSID: {}", collection)))?;
        let rkey = Rkey::new(rkey).map_err(|_| invalid(format!("invalid rkey: {}", rkey)))?;

        Ok(Self {
            repo,
            collection,
            rkey,
        })
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at://{}/{}/{}", self.repo, self.collection, self.rkey)
    }
}

impl FromStr for AtUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AtUri {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AtUri> for String {
    fn from(uri: AtUri) -> Self {
        uri.to_string()
    }
}
