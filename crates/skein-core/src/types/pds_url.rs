//! The base URL of a Personal Data Server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::{Host, Url};

use crate::error::{Error, InvalidInputError};

/// Where a PDS serves XRPC.
///
/// HTTPS is required except for loopback hosts, which may use plain HTTP for
/// local development servers. A trailing slash is dropped, and a path prefix
/// (for a PDS behind a reverse proxy) is kept.
///
/// ```
/// use skein_core::PdsUrl;
///
/// let pds = PdsUrl::new("https://bsky.social/").unwrap();
/// assert_eq!(pds.xrpc_url("com.atproto.repo.createRecord"),
///            "https://bsky.social/xrpc/com.atproto.repo.createRecord");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PdsUrl(Url);

impl PdsUrl {
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| invalid(s, e.to_string()))?;
        Self::from_url(url).map_err(|reason| invalid(s, reason))
    }

    fn from_url(mut url: Url) -> Result<Self, String> {
        if !matches!(url.scheme(), "https" | "http") {
            return Err(format!("unsupported scheme '{}'", url.scheme()));
        }
        let Some(host) = url.host() else {
            return Err("must have a host".to_string());
        };
        if url.scheme() == "http" && !is_loopback(&host) {
            return Err("plain HTTP is only allowed for loopback hosts".to_string());
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err("must not carry a query or fragment".to_string());
        }

        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        Ok(Self(url))
    }

    /// The URL of XRPC `method` on this server.
    pub fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.as_str().trim_end_matches('/'), method)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Whether this server runs on the local machine.
    pub fn is_loopback(&self) -> bool {
        self.0.host().is_some_and(|h| is_loopback(&h))
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => name.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    }
}

fn invalid(value: &str, reason: String) -> Error {
    InvalidInputError::PdsUrl {
        value: value.to_string(),
        reason,
    }
    .into()
}

impl fmt::Display for PdsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdsUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PdsUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PdsUrl> for String {
    fn from(pds: PdsUrl) -> Self {
        pds.0.into()
    }
}

impl AsRef<str> for PdsUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_host() {
        let pds = PdsUrl::new("https://bsky.social").unwrap();
        assert_eq!(pds.host(), Some("bsky.social"));
        assert!(!pds.is_loopback());
    }

    #[test]
    fn plain_http_on_loopback_only() {
        for url in ["http://127.0.0.1:2583", "http://localhost:2583", "http://[::1]:2583"] {
            let pds = PdsUrl::new(url).unwrap();
            assert!(pds.is_loopback(), "{url}");
        }
        assert!(PdsUrl::new("http://bsky.social").is_err());
        assert!(PdsUrl::new("http://10.0.0.1").is_err());
    }

    #[test]
    fn xrpc_url_ignores_trailing_slash() {
        let with = PdsUrl::new("https://bsky.social/").unwrap();
        let without = PdsUrl::new("https://bsky.social").unwrap();
        assert_eq!(with, without);
        assert_eq!(
            with.xrpc_url("com.atproto.repo.getRecord"),
            "https://bsky.social/xrpc/com.atproto.repo.getRecord"
        );
    }

    #[test]
    fn keeps_path_prefix() {
        let pds = PdsUrl::new("https://proxy.example.com/pds/").unwrap();
        assert_eq!(
            pds.xrpc_url("com.atproto.repo.listRecords"),
            "https://proxy.example.com/pds/xrpc/com.atproto.repo.listRecords"
        );
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(PdsUrl::new("/xrpc/method").is_err());
        assert!(PdsUrl::new("file:///tmp/pds").is_err());
        assert!(PdsUrl::new("https://bsky.social/?x=1").is_err());
        assert!(PdsUrl::new("wss://bsky.social").is_err());
    }

    #[test]
    fn serde_round_trip_validates() {
        let pds: PdsUrl = serde_json::from_str("\"https://bsky.social\"").unwrap();
        assert_eq!(serde_json::to_string(&pds).unwrap(), "\"https://bsky.social/\"");
        assert!(serde_json::from_str::<PdsUrl>("\"http://bsky.social\"").is_err());
    }
}
