//! Repository operation types.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::types::{AtUri, Cid, Did, Handle, Nsid};

/// A record from the repository.
///
/// `cid` names the version that was read; servers may omit it for records
/// served from a cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// The AT URI of this record.
    pub uri: AtUri,

    /// The CID of this version of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<Cid>,

    /// The decoded record value.
    pub value: T,
}

/// One page of a listing.
///
/// The cursor is opaque and only meaningful when passed back to the same
/// listing call with the same filters.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedCollection<T> {
    /// Items in server order.
    pub items: Vec<T>,

    /// Cursor for the next page, if the server reported more.
    pub cursor: Option<String>,
}

impl<T> PagedCollection<T> {
    /// A page with no items and no cursor.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }

    /// Number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the server reported another page.
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for PagedCollection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for PagedCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Repository state after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// CID of the new commit.
    pub cid: Cid,
    /// Revision string (TID) of the new commit.
    pub rev: String,
}

/// A reference to one version of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrongRef {
    pub uri: AtUri,
    pub cid: Cid,
}

impl StrongRef {
    pub fn new(uri: AtUri, cid: Cid) -> Self {
        Self { uri, cid }
    }
}

/// A reference to uploaded binary data.
///
/// In JSON the reference is `{"$type": "blob", "ref": {"$link": cid},
/// "mimeType": .., "size": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(rename = "ref")]
    pub reference: CidLink,
    pub mime_type: String,
    pub size: u64,
}

impl Blob {
    /// CID of the blob content.
    pub fn cid(&self) -> &Cid {
        &self.reference.link
    }
}

impl Serialize for Blob {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("$type", "blob")?;
        map.serialize_entry("ref", &self.reference)?;
        map.serialize_entry("mimeType", &self.mime_type)?;
        map.serialize_entry("size", &self.size)?;
        map.end()
    }
}

/// A CID wrapped as `{"$link": cid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: Cid,
}

/// Output of `com.atproto.repo.describeRepo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoDescription {
    pub handle: Handle,
    pub did: Did,
    /// The DID document, left undecoded.
    #[serde(default)]
    pub did_doc: Value,
    /// Collections that contain at least one record.
    #[serde(default)]
    pub collections: Vec<Nsid>,
    /// Whether the handle currently resolves to this DID.
    pub handle_is_correct: bool,
}

/// How the server should validate a written record against its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Validate and reject the write on failure (`validate: true`).
    Enforce,
    /// Skip validation (`validate: false`).
    Skip,
    /// Validate only records whose schema the server knows (`validate` omitted).
    #[default]
    KnownLexiconsOnly,
}

impl ValidationMode {
    /// The wire value of the `validate` flag.
    pub fn validate_flag(self) -> Option<bool> {
        match self {
            ValidationMode::Enforce => Some(true),
            ValidationMode::Skip => Some(false),
            ValidationMode::KnownLexiconsOnly => None,
        }
    }
}

/// Compare-and-swap preconditions for a write.
///
/// `record` must equal the record's current CID (absent means "no check");
/// `commit` must equal the repository's current commit CID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapGuard {
    pub record: Option<Cid>,
    pub commit: Option<Cid>,
}

impl SwapGuard {
    /// No preconditions: last writer wins.
    pub fn none() -> Self {
        Self::default()
    }

    /// Guard on the record's current CID.
    pub fn record(cid: Cid) -> Self {
        Self {
            record: Some(cid),
            commit: None,
        }
    }

    /// Guard on the repository's current commit.
    pub fn commit(cid: Cid) -> Self {
        Self {
            record: None,
            commit: Some(cid),
        }
    }

    pub fn with_record(mut self, cid: Cid) -> Self {
        self.record = Some(cid);
        self
    }

    pub fn with_commit(mut self, cid: Cid) -> Self {
        self.commit = Some(cid);
        self
    }
}

/// Output of `com.atproto.repo.createRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordOutput {
    pub uri: AtUri,
    pub cid: Cid,
    #[serde(default)]
    pub commit: Option<Commit>,
    /// `valid` or `unknown`, when the server reports it.
    #[serde(default)]
    pub validation_status: Option<String>,
}

impl CreateRecordOutput {
    /// Reference to the created version.
    pub fn strong_ref(&self) -> StrongRef {
        StrongRef::new(self.uri.clone(), self.cid.clone())
    }
}

/// Output of `com.atproto.repo.putRecord`.
///
/// Same shape as [`CreateRecordOutput`].
pub type PutRecordOutput = CreateRecordOutput;
