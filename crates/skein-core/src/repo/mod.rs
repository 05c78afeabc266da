//! Repository types.
//!
//! The operations themselves are methods on the client in `skein-xrpc`.

mod record_value;
mod registry;
mod types;
mod writes;

pub use record_value::RecordValue;
pub use registry::{KnownRecord, LexiconRecord, RecordRegistry};
pub use types::{
    Blob, CidLink, Commit, CreateRecordOutput, PagedCollection, PutRecordOutput, Record,
    RepoDescription, StrongRef, SwapGuard, ValidationMode,
};
pub use writes::{ApplyWritesOutput, MAX_BATCH_WRITES, WriteOp, WriteResult};
