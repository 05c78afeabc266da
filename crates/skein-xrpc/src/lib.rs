//! skein-xrpc - AT Protocol client over XRPC.
//!
//! [`AtpClient`] wraps one PDS and carries the repository, session and
//! posting operations. [`identity::HandleResolver`] resolves handles to DIDs
//! through DNS and the well-known HTTPS document.
//!
//! ```no_run
//! use skein_core::richtext::PostBuilder;
//! use skein_core::{Credentials, PdsUrl};
//! use skein_xrpc::AtpClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AtpClient::new(PdsUrl::new("https://bsky.social")?)?;
//! let session = client
//!     .create_session(&Credentials::new("alice.bsky.social", "app-password"))
//!     .await?
//!     .into_result()?;
//!
//! let authed = client.with_access_token(session.access_token);
//! let post = PostBuilder::with_text("hello from skein").build()?;
//! let created = authed.create_post(&session.did, &post).await?;
//! println!("posted {:?}", created.payload().map(|p| &p.uri));
//! # Ok(())
//! # }
//! ```

mod client;
pub mod identity;
mod post;
pub mod repo;
pub mod session;
pub mod xrpc;

pub use client::AtpClient;
pub use identity::{HandleResolver, ResolverOptions, TxtResolver};
pub use session::SessionInfo;
pub use xrpc::XrpcClient;
