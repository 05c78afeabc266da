//! Batch write operations for `com.atproto.repo.applyWrites`.

use serde::{Deserialize, Serialize};

use super::{Commit, RecordValue};
use crate::error::Error;
use crate::types::{AtUri, Cid, Nsid, Rkey};

/// Maximum number of operations in one batch.
pub const MAX_BATCH_WRITES: usize = 200;

/// One operation in an atomic batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum WriteOp {
    /// Create a record; the server assigns a key when `rkey` is absent.
    #[serde(rename = "com.atproto.repo.applyWrites#create")]
    Create {
        collection: Nsid,
        #[serde(skip_serializing_if = "Option::is_none")]
        rkey: Option<Rkey>,
        value: RecordValue,
    },

    /// Replace an existing record.
    #[serde(rename = "com.atproto.repo.applyWrites#update")]
    Update {
        collection: Nsid,
        rkey: Rkey,
        value: RecordValue,
    },

    /// Delete a record.
    #[serde(rename = "com.atproto.repo.applyWrites#delete")]
    Delete { collection: Nsid, rkey: Rkey },
}

impl WriteOp {
    /// A create with a server-assigned key.
    ///
    /// `$type` is filled in from `collection` when the payload lacks it.
    pub fn create<T: Serialize + ?Sized>(collection: Nsid, value: &T) -> Result<Self, Error> {
        let value = RecordValue::from_serializable(&collection, value)?;
        Ok(WriteOp::Create {
            collection,
            rkey: None,
            value,
        })
    }

    /// A create at a caller-chosen key.
    pub fn create_at<T: Serialize + ?Sized>(
        collection: Nsid,
        rkey: Rkey,
        value: &T,
    ) -> Result<Self, Error> {
        let value = RecordValue::from_serializable(&collection, value)?;
        Ok(WriteOp::Create {
            collection,
            rkey: Some(rkey),
            value,
        })
    }

    pub fn update<T: Serialize + ?Sized>(
        collection: Nsid,
        rkey: Rkey,
        value: &T,
    ) -> Result<Self, Error> {
        let value = RecordValue::from_serializable(&collection, value)?;
        Ok(WriteOp::Update {
            collection,
            rkey,
            value,
        })
    }

    pub fn delete(collection: Nsid, rkey: Rkey) -> Self {
        WriteOp::Delete { collection, rkey }
    }

    /// The collection this operation targets.
    pub fn collection(&self) -> &Nsid {
        match self {
            WriteOp::Create { collection, .. }
            | WriteOp::Update { collection, .. }
            | WriteOp::Delete { collection, .. } => collection,
        }
    }
}

/// Per-operation result of a batch, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum WriteResult {
    #[serde(
        rename = "com.atproto.repo.applyWrites#createResult",
        rename_all = "camelCase"
    )]
    Create {
        uri: AtUri,
        cid: Cid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation_status: Option<String>,
    },

    #[serde(
        rename = "com.atproto.repo.applyWrites#updateResult",
        rename_all = "camelCase"
    )]
    Update {
        uri: AtUri,
        cid: Cid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation_status: Option<String>,
    },

    #[serde(rename = "com.atproto.repo.applyWrites#deleteResult")]
    Delete,
}

impl WriteResult {
    /// The written record's URI (absent for deletes).
    pub fn uri(&self) -> Option<&AtUri> {
        match self {
            WriteResult::Create { uri, .. } | WriteResult::Update { uri, .. } => Some(uri),
            WriteResult::Delete => None,
        }
    }

    /// The written record's new CID (absent for deletes).
    pub fn cid(&self) -> Option<&Cid> {
        match self {
            WriteResult::Create { cid, .. } | WriteResult::Update { cid, .. } => Some(cid),
            WriteResult::Delete => None,
        }
    }
}

/// Output of `com.atproto.repo.applyWrites`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplyWritesOutput {
    #[serde(default)]
    pub commit: Option<Commit>,
    #[serde(default)]
    pub results: Vec<WriteResult>,
}
