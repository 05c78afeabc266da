//! XRPC protocol implementation.

pub mod client;
pub(crate) mod endpoints;

pub use client::XrpcClient;
