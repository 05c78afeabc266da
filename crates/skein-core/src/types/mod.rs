//! Core AT Protocol identifier types.
//!
//! These types enforce protocol invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod at_identifier;
mod at_uri;
mod cid;
mod did;
mod handle;
mod nsid;
mod pds_url;
mod rkey;

pub use at_identifier::AtIdentifier;
pub use at_uri::AtUri;
pub use cid::Cid;
pub use did::Did;
pub use handle::Handle;
pub use nsid::Nsid;
pub use pds_url::PdsUrl;
pub use rkey::{MAX_RKEY_LEN, Rkey};
