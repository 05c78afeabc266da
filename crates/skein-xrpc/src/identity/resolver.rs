//! Handle to DID resolution.
//!
//! Two methods are tried in order, never raced:
//!
//! 1. DNS TXT record at `_atproto.<handle>` holding `did=<did>`
//! 2. HTTPS GET `https://<handle>/.well-known/atproto-did`
//!
//! Lookup failures of either method just mean "not found here"; only bad
//! input and cancellation are errors.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use skein_core::error::InvalidInputError;
use skein_core::{Did, Error, Handle, Result};

use super::dns::{HickoryTxtResolver, TxtResolver};
use crate::xrpc::client::transport_error;

/// Default bound on each lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

const WELL_KNOWN_PATH: &str = "/.well-known/atproto-did";

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Bound on the TXT lookup.
    pub dns_timeout: Duration,
    /// Bound on the well-known HTTPS request.
    pub http_timeout: Duration,
    /// Fetch the well-known document from this origin instead of
    /// `https://<handle>`.
    pub well_known_origin: Option<Url>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            dns_timeout: DEFAULT_LOOKUP_TIMEOUT,
            http_timeout: DEFAULT_LOOKUP_TIMEOUT,
            well_known_origin: None,
        }
    }
}

/// Resolves handles to DIDs.
#[derive(Clone)]
pub struct HandleResolver {
    http: reqwest::Client,
    dns: Arc<dyn TxtResolver>,
    options: ResolverOptions,
}

impl HandleResolver {
    /// Create a resolver using the system DNS configuration.
    pub fn new(options: ResolverOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("skein/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(transport_error(&e)))?;
        let dns = Arc::new(HickoryTxtResolver::from_system_conf(options.dns_timeout));

        Ok(Self::with_parts(http, dns, options))
    }

    /// Create a resolver from its parts.
    pub fn with_parts(
        http: reqwest::Client,
        dns: Arc<dyn TxtResolver>,
        options: ResolverOptions,
    ) -> Self {
        Self { http, dns, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Parse `handle` and resolve it.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if `handle` is not a valid handle,
    /// before any lookup is made.
    pub async fn resolve_str(
        &self,
        handle: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Did>> {
        let handle = Handle::new(handle)?;
        self.resolve(&handle, cancel).await
    }

    /// Resolve `handle` to a DID.
    ///
    /// Returns `Ok(None)` when neither method yields a DID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if `cancel` fires before or during a
    /// lookup.
    #[instrument(skip(self, cancel), fields(%handle))]
    pub async fn resolve(
        &self,
        handle: &Handle,
        cancel: &CancellationToken,
    ) -> Result<Option<Did>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let from_dns = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            did = self.resolve_dns(handle) => did,
        };
        if let Some(did) = from_dns {
            debug!(%did, "resolved handle via DNS");
            return Ok(Some(did));
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let from_http = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            did = self.resolve_well_known(handle) => did,
        };
        match &from_http {
            Some(did) => debug!(%did, "resolved handle via well-known"),
            None => debug!("handle did not resolve"),
        }
        Ok(from_http)
    }

    async fn resolve_dns(&self, handle: &Handle) -> Option<Did> {
        let name = format!("_atproto.{}.", handle);
        let records =
            match tokio::time::timeout(self.options.dns_timeout, self.dns.txt_records(&name)).await
            {
                Ok(Ok(records)) => records,
                Ok(Err(err)) => {
                    debug!(%name, error = %err, "TXT lookup failed");
                    return None;
                }
                Err(_) => {
                    debug!(%name, "TXT lookup timed out");
                    return None;
                }
            };
        trace!(?records, "TXT records");

        let value = records.iter().find_map(|r| r.strip_prefix("did="))?;
        match Did::new(value.trim()) {
            Ok(did) => Some(did),
            Err(err) => {
                warn!(%name, value, error = %err, "ignoring malformed DID in TXT record");
                None
            }
        }
    }

    async fn resolve_well_known(&self, handle: &Handle) -> Option<Did> {
        let url = match self.well_known_url(handle) {
            Ok(url) => url,
            Err(err) => {
                debug!(error = %err, "cannot build well-known URL");
                return None;
            }
        };

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "text/plain")
            .timeout(self.options.http_timeout)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "well-known request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "well-known request unsuccessful");
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(%url, error = %err, "failed to read well-known body");
                return None;
            }
        };

        let value = body.trim();
        if value.is_empty() {
            return None;
        }
        match Did::new(value) {
            Ok(did) => Some(did),
            Err(err) => {
                warn!(%url, error = %err, "ignoring malformed DID in well-known document");
                None
            }
        }
    }

    fn well_known_url(&self, handle: &Handle) -> std::result::Result<Url, Error> {
        let parsed = match &self.options.well_known_origin {
            Some(origin) => origin.join(WELL_KNOWN_PATH),
            None => Url::parse(&format!("https://{}{}", handle, WELL_KNOWN_PATH)),
        };
        parsed.map_err(|e| {
            InvalidInputError::Handle {
                value: handle.to_string(),
                reason: format!("cannot form well-known URL: {}", e),
            }
            .into()
        })
    }
}

impl std::fmt::Debug for HandleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
