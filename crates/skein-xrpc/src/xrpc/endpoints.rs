//! XRPC endpoint names and wire request/response types.

use serde::{Deserialize, Serialize};

use skein_core::{Blob, Commit, Did, Handle, Record, RecordValue, WriteOp};

// ============================================================================
// Endpoint Names
// ============================================================================

pub const CREATE_SESSION: &str = "com.atproto.server.createSession";
pub const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";

pub const RESOLVE_HANDLE: &str = "com.atproto.identity.resolveHandle";

pub const CREATE_RECORD: &str = "com.atproto.repo.createRecord";
pub const PUT_RECORD: &str = "com.atproto.repo.putRecord";
pub const DELETE_RECORD: &str = "com.atproto.repo.deleteRecord";
pub const APPLY_WRITES: &str = "com.atproto.repo.applyWrites";
pub const GET_RECORD: &str = "com.atproto.repo.getRecord";
pub const LIST_RECORDS: &str = "com.atproto.repo.listRecords";
pub const UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";
pub const DESCRIBE_REPO: &str = "com.atproto.repo.describeRepo";

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_factor_token: Option<&'a str>,
}

/// Response from createSession and refreshSession.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub did: Did,
    pub handle: Handle,
    pub access_jwt: String,
    pub refresh_jwt: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ResolveHandleQuery<'a> {
    pub handle: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ResolveHandleResponse {
    pub did: Did,
}

// ============================================================================
// Repository writes
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rkey: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
    pub record: &'a RecordValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_commit: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
    pub record: &'a RecordValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_record: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_commit: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_record: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_commit: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteRecordResponse {
    #[serde(default)]
    pub commit: Option<Commit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyWritesRequest<'a> {
    pub repo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
    pub writes: &'a [WriteOp],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_commit: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct UploadBlobResponse {
    pub blob: Blob,
}

// ============================================================================
// Repository reads
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GetRecordQuery<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ListRecordsQuery<'a> {
    pub repo: &'a str,
    pub collection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListRecordsResponse<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<Record<T>>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DescribeRepoQuery<'a> {
    pub repo: &'a str,
}

// ============================================================================
// Errors
// ============================================================================

/// XRPC error response body.
#[derive(Debug, Deserialize)]
pub struct XrpcErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
