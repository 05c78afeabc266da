//! DNS TXT lookups for handle resolution.

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tracing::debug;

use skein_core::error::TransportError;

/// Looks up TXT records.
///
/// The default implementation is [`HickoryTxtResolver`]; tests and callers
/// with their own DNS stack can supply another.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Return every TXT string at `name`, in answer order.
    ///
    /// A name with no TXT records is `Ok(vec![])`.
    async fn txt_records(&self, name: &str) -> Result<Vec<String>, TransportError>;
}

/// [`TxtResolver`] backed by `hickory-resolver`.
#[derive(Clone)]
pub struct HickoryTxtResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryTxtResolver {
    /// Use the system resolver configuration, falling back to the resolver's
    /// default upstreams if it cannot be read.
    pub fn from_system_conf(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(err) => {
                debug!(error = %err, "system DNS configuration unavailable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        Self::with_config(config, opts)
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl std::fmt::Debug for HickoryTxtResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryTxtResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn txt_records(&self, name: &str) -> Result<Vec<String>, TransportError> {
        let lookup = match self.resolver.txt_lookup(name).await {
            Ok(lookup) => lookup,
            Err(err) => {
                if matches!(
                    err.kind(),
                    hickory_resolver::error::ResolveErrorKind::NoRecordsFound { .. }
                ) {
                    return Ok(Vec::new());
                }
                debug!(name, error = %err, "TXT lookup failed");
                return Err(TransportError::Dns {
                    host: name.to_string(),
                });
            }
        };

        let mut out = Vec::new();
        for txt in lookup.iter() {
            for data in txt.txt_data().iter() {
                out.push(String::from_utf8_lossy(data).into_owned());
            }
        }
        Ok(out)
    }
}
