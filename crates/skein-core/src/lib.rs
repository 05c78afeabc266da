//! skein-core - Core AT Protocol types.
//!
//! Identifier types, the error taxonomy, the uniform [`XrpcResponse`] wrapper,
//! repository data types and the rich text [`PostBuilder`](richtext::PostBuilder).
//! Nothing in this crate performs network I/O.

pub mod credentials;
pub mod error;
pub mod repo;
pub mod response;
pub mod richtext;
pub mod tokens;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use repo::{
    ApplyWritesOutput, Blob, Commit, CreateRecordOutput, KnownRecord, LexiconRecord,
    PagedCollection, PutRecordOutput, Record, RecordRegistry, RecordValue, RepoDescription,
    StrongRef, SwapGuard, ValidationMode, WriteOp, WriteResult,
};
pub use response::{FailureKind, RateLimit, RemoteError, XrpcResponse};
pub use tokens::{AccessToken, RefreshToken};
pub use types::{AtIdentifier, AtUri, Cid, Did, Handle, Nsid, PdsUrl, Rkey};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
