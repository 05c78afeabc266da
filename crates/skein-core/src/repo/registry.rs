//! Collection-to-type registry for decoding records.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Record, RecordValue};
use crate::error::Error;
use crate::richtext::Post;
use crate::types::Nsid;

/// A record type with a fixed collection NSID.
pub trait LexiconRecord: Serialize + DeserializeOwned {
    /// The collection this record type lives in.
    const NSID: &'static str;

    /// [`NSID`](Self::NSID) as a validated [`Nsid`].
    fn collection() -> Result<Nsid, Error> {
        Nsid::new(Self::NSID)
    }
}

/// A record decoded through a [`RecordRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub enum KnownRecord {
    Post(Box<Post>),
    /// A record from a collection with no registered type.
    Unknown(RecordValue),
}

impl From<Post> for KnownRecord {
    fn from(post: Post) -> Self {
        KnownRecord::Post(Box::new(post))
    }
}

type Decoder = fn(&RecordValue) -> Result<KnownRecord, Error>;

fn decode_as<R>(value: &RecordValue) -> Result<KnownRecord, Error>
where
    R: LexiconRecord + Into<KnownRecord>,
{
    Ok(value.decode::<R>()?.into())
}

/// Maps collection NSIDs to typed decoders.
///
/// The default registry knows `app.bsky.feed.post`.
///
/// ```
/// use skein_core::{KnownRecord, Nsid, RecordRegistry, RecordValue};
/// use serde_json::json;
///
/// let registry = RecordRegistry::default();
/// let value = RecordValue::new(json!({
///     "$type": "app.bsky.feed.post",
///     "text": "hello",
///     "createdAt": "2024-01-01T00:00:00Z"
/// })).unwrap();
///
/// let collection = Nsid::new("app.bsky.feed.post").unwrap();
/// let record = registry.decode(&collection, value).unwrap();
/// assert!(matches!(record, KnownRecord::Post(_)));
/// ```
#[derive(Clone)]
pub struct RecordRegistry {
    decoders: HashMap<Nsid, Decoder>,
}

impl RecordRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register `R` under its collection.
    pub fn register<R>(&mut self) -> Result<&mut Self, Error>
    where
        R: LexiconRecord + Into<KnownRecord>,
    {
        let collection = R::collection()?;
        self.decoders.insert(collection, decode_as::<R>);
        Ok(self)
    }

    /// Returns true if `collection` has a registered decoder.
    pub fn contains(&self, collection: &Nsid) -> bool {
        self.decoders.contains_key(collection)
    }

    /// Decode a value read from `collection`.
    ///
    /// Unregistered collections yield [`KnownRecord::Unknown`]. A value in a
    /// registered collection that does not match its type is an error.
    pub fn decode(&self, collection: &Nsid, value: RecordValue) -> Result<KnownRecord, Error> {
        match self.decoders.get(collection) {
            Some(decode) => decode(&value),
            None => Ok(KnownRecord::Unknown(value)),
        }
    }

    /// Decode a record using the collection from its URI.
    pub fn decode_record(&self, record: Record<RecordValue>) -> Result<Record<KnownRecord>, Error> {
        let value = self.decode(record.uri.collection(), record.value)?;
        Ok(Record {
            uri: record.uri,
            cid: record.cid,
            value,
        })
    }
}

impl Default for RecordRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        let post = Nsid::new(Post::NSID);
        if let Ok(collection) = post {
            registry.decoders.insert(collection, decode_as::<Post>);
        }
        registry
    }
}

impl fmt::Debug for RecordRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}
