//! Record keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Longest accepted record key, in bytes.
pub const MAX_RKEY_LEN: usize = 512;

/// The key of one record within a collection.
///
/// Keys are chosen at creation (by the caller or the server) and never change.
/// Server-assigned keys are TIDs; singleton records such as profiles use
/// `self`.
///
/// ```
/// use skein_core::Rkey;
///
/// let rkey = Rkey::new("3jui7kd54zh2y").unwrap();
/// assert_eq!(rkey.as_str(), "3jui7kd54zh2y");
/// assert!(Rkey::new("..").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rkey(String);

impl Rkey {
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        match rejection(&s) {
            None => Ok(Self(s)),
            Some(reason) => Err(InvalidInputError::Rkey { value: s, reason }.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_rkey_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '~' | ':')
}

/// Why `s` is not a record key, if it is not one.
fn rejection(s: &str) -> Option<String> {
    if s.is_empty() {
        return Some("cannot be empty".to_string());
    }
    if s.len() > MAX_RKEY_LEN {
        return Some(format!("longer than {} bytes", MAX_RKEY_LEN));
    }
    if matches!(s, "." | "..") {
        return Some("cannot be '.' or '..'".to_string());
    }
    s.chars()
        .find(|c| !is_rkey_char(*c))
        .map(|c| format!("contains invalid character '{}'", c))
}

impl fmt::Display for Rkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Rkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Rkey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Rkey> for String {
    fn from(rkey: Rkey) -> Self {
        rkey.0
    }
}

impl AsRef<str> for Rkey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
