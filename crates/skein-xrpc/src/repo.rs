//! Repository operations.
//!
//! Writes need an authenticated [`AtpClient`]; reads send the token when the
//! client has one. Arguments are checked before anything is sent, and those
//! checks are the only `Err` outcomes apart from local serialization. Every
//! remote outcome, including swap conflicts, is in the returned
//! [`XrpcResponse`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use skein_core::error::InvalidInputError;
use skein_core::repo::MAX_BATCH_WRITES;
use skein_core::{
    ApplyWritesOutput, AtIdentifier, Blob, Cid, Commit, CreateRecordOutput, Did, Nsid,
    PagedCollection, PutRecordOutput, Record, RecordValue, RepoDescription, Result, Rkey,
    SwapGuard, ValidationMode, WriteOp, XrpcResponse,
};

use crate::client::AtpClient;
use crate::xrpc::endpoints::*;

/// Smallest page size accepted by `list_records`.
pub const MIN_LIST_LIMIT: u32 = 1;

/// Largest page size accepted by `list_records`.
pub const MAX_LIST_LIMIT: u32 = 100;

impl AtpClient {
    /// Create a record.
    ///
    /// `record` must serialize to a JSON object; a missing `$type` is filled in
    /// from `collection`. Without `rkey` the server assigns the key. With
    /// `swap_commit`, the write only happens if the repository is still at
    /// that commit.
    #[instrument(skip(self, record), fields(%repo, %collection))]
    pub async fn create_record<T: Serialize + ?Sized>(
        &self,
        repo: &Did,
        collection: &Nsid,
        record: &T,
        rkey: Option<&Rkey>,
        validation: ValidationMode,
        swap_commit: Option<&Cid>,
    ) -> Result<XrpcResponse<CreateRecordOutput>> {
        let token = self.require_token()?;
        let record = RecordValue::from_serializable(collection, record)?;
        debug!(rkey = ?rkey.map(Rkey::as_str), "creating record");

        let request = CreateRecordRequest {
            repo: repo.as_str(),
            collection: collection.as_str(),
            rkey: rkey.map(Rkey::as_str),
            validate: validation.validate_flag(),
            record: &record,
            swap_commit: swap_commit.map(Cid::as_str),
        };

        self.xrpc()
            .procedure(CREATE_RECORD, &request, Some(token))
            .await
    }

    /// Create or replace the record at `rkey`.
    ///
    /// `swap.record` must match the record's current CID and `swap.commit`
    /// the repository's current commit, or the server rejects the write as a
    /// conflict.
    #[instrument(skip(self, record, swap), fields(%repo, %collection, %rkey))]
    pub async fn put_record<T: Serialize + ?Sized>(
        &self,
        repo: &Did,
        collection: &Nsid,
        rkey: &Rkey,
        record: &T,
        validation: ValidationMode,
        swap: &SwapGuard,
    ) -> Result<XrpcResponse<PutRecordOutput>> {
        let token = self.require_token()?;
        let record = RecordValue::from_serializable(collection, record)?;
        debug!(
            swap_record = ?swap.record.as_ref().map(Cid::as_str),
            swap_commit = ?swap.commit.as_ref().map(Cid::as_str),
            "putting record"
        );

        let request = PutRecordRequest {
            repo: repo.as_str(),
            collection: collection.as_str(),
            rkey: rkey.as_str(),
            validate: validation.validate_flag(),
            record: &record,
            swap_record: swap.record.as_ref().map(Cid::as_str),
            swap_commit: swap.commit.as_ref().map(Cid::as_str),
        };

        self.xrpc().procedure(PUT_RECORD, &request, Some(token)).await
    }

    /// Delete the record at `rkey`.
    ///
    /// The commit is absent when the server reports none.
    #[instrument(skip(self, swap), fields(%repo, %collection, %rkey))]
    pub async fn delete_record(
        &self,
        repo: &AtIdentifier,
        collection: &Nsid,
        rkey: &Rkey,
        swap: &SwapGuard,
    ) -> Result<XrpcResponse<Option<Commit>>> {
        let token = self.require_token()?;
        debug!("deleting record");

        let request = DeleteRecordRequest {
            repo: repo.as_str(),
            collection: collection.as_str(),
            rkey: rkey.as_str(),
            swap_record: swap.record.as_ref().map(Cid::as_str),
            swap_commit: swap.commit.as_ref().map(Cid::as_str),
        };

        let response: XrpcResponse<DeleteRecordResponse> = self
            .xrpc()
            .procedure(DELETE_RECORD, &request, Some(token))
            .await?;
        Ok(response.map(|r| r.commit))
    }

    /// Apply up to 200 creates, updates and deletes atomically.
    ///
    /// Either every operation is applied or none is. Results come back in
    /// submission order.
    #[instrument(skip(self, writes), fields(%repo, count = writes.len()))]
    pub async fn apply_writes(
        &self,
        repo: &Did,
        writes: &[WriteOp],
        validation: ValidationMode,
        swap_commit: Option<&Cid>,
    ) -> Result<XrpcResponse<ApplyWritesOutput>> {
        let token = self.require_token()?;
        if writes.is_empty() {
            return Err(InvalidInputError::EmptyBatch.into());
        }
        if writes.len() > MAX_BATCH_WRITES {
            return Err(InvalidInputError::BatchTooLarge {
                count: writes.len(),
                max: MAX_BATCH_WRITES,
            }
            .into());
        }
        debug!("applying writes");

        let request = ApplyWritesRequest {
            repo: repo.as_str(),
            validate: validation.validate_flag(),
            writes,
            swap_commit: swap_commit.map(Cid::as_str),
        };

        self.xrpc()
            .procedure(APPLY_WRITES, &request, Some(token))
            .await
    }

    /// Read one record, optionally a specific version of it.
    #[instrument(skip(self), fields(%repo, %collection, %rkey))]
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        repo: &AtIdentifier,
        collection: &Nsid,
        rkey: &Rkey,
        cid: Option<&Cid>,
    ) -> Result<XrpcResponse<Record<T>>> {
        debug!("getting record");

        let query = GetRecordQuery {
            repo: repo.as_str(),
            collection: collection.as_str(),
            rkey: rkey.as_str(),
            cid: cid.map(Cid::as_str),
        };

        Ok(self.xrpc().query(GET_RECORD, &query, self.bearer()).await)
    }

    /// List one page of a collection.
    ///
    /// `limit` must be within 1..=100 when given. A failed listing still
    /// carries an empty page, with [`succeeded`](XrpcResponse::succeeded)
    /// false.
    #[instrument(skip(self, cursor), fields(%repo, %collection))]
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        repo: &AtIdentifier,
        collection: &Nsid,
        limit: Option<u32>,
        cursor: Option<&str>,
        reverse: bool,
    ) -> Result<XrpcResponse<PagedCollection<Record<T>>>> {
        if let Some(limit) = limit.filter(|l| !(MIN_LIST_LIMIT..=MAX_LIST_LIMIT).contains(l)) {
            return Err(InvalidInputError::Limit {
                value: limit,
                min: MIN_LIST_LIMIT,
                max: MAX_LIST_LIMIT,
            }
            .into());
        }
        debug!(?limit, has_cursor = cursor.is_some(), "listing records");

        let query = ListRecordsQuery {
            repo: repo.as_str(),
            collection: collection.as_str(),
            limit,
            cursor,
            reverse: reverse.then_some(true),
        };

        let response: XrpcResponse<ListRecordsResponse<T>> =
            self.xrpc().query(LIST_RECORDS, &query, self.bearer()).await;

        Ok(response
            .map(|page| PagedCollection {
                items: page.records,
                cursor: page.cursor,
            })
            .or_payload(PagedCollection::empty))
    }

    /// Upload binary data for use in a record.
    ///
    /// `mime_type` must look like `type/subtype`.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_blob(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<XrpcResponse<Blob>> {
        let token = self.require_token()?;
        if bytes.is_empty() {
            return Err(InvalidInputError::Blob {
                reason: "blob cannot be empty".to_string(),
            }
            .into());
        }
        validate_mime_type(mime_type)?;
        debug!("uploading blob");

        let response: XrpcResponse<UploadBlobResponse> = self
            .xrpc()
            .procedure_bytes(UPLOAD_BLOB, bytes, mime_type, Some(token))
            .await;
        Ok(response.map(|r| r.blob))
    }

    /// Describe a repository: its handle, DID document and collections.
    #[instrument(skip(self), fields(%repo))]
    pub async fn describe_repo(
        &self,
        repo: &AtIdentifier,
    ) -> Result<XrpcResponse<RepoDescription>> {
        debug!("describing repo");

        let query = DescribeRepoQuery {
            repo: repo.as_str(),
        };

        Ok(self.xrpc().query(DESCRIBE_REPO, &query, self.bearer()).await)
    }
}

/// Accept `type/subtype` with exactly one `/`, non-empty halves and no
/// whitespace.
pub(crate) fn validate_mime_type(mime_type: &str) -> Result<()> {
    let invalid = || InvalidInputError::MimeType {
        value: mime_type.to_string(),
    };

    if mime_type.chars().any(char::is_whitespace) {
        return Err(invalid().into());
    }
    match mime_type.split_once('/') {
        Some((kind, subtype))
            if !kind.is_empty() && !subtype.is_empty() && !subtype.contains('/') =>
        {
            Ok(())
        }
        _ => Err(invalid().into()),
    }
}
