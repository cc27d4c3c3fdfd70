//! Host allow-list for claim URLs.

use std::collections::BTreeSet;

use url::{Host, Url};

use super::FaucetError;

/// Hosts that may always receive claims.
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["signetfaucet.com"];

/// Longest DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Exact-match set of permitted faucet hosts.
///
/// No wildcard or subdomain matching: `www.signetfaucet.com` is not covered
/// by `signetfaucet.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    hosts: BTreeSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl AllowList {
    /// The built-in hosts plus `extra`.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts = DEFAULT_ALLOWED_HOSTS
            .iter()
            .map(|h| h.to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        Self { hosts }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Parse `url` and check that it targets an allowed, well-formed domain.
    pub fn validate(&self, url: &str) -> Result<Url, FaucetError> {
        let invalid = |reason: &'static str| FaucetError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|_| invalid("not a valid URL"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(invalid("scheme must be http or https"));
        }

        let host = match parsed.host() {
            Some(Host::Domain(domain)) if is_valid_domain(domain) => domain.to_string(),
            Some(Host::Domain(_)) => return Err(invalid("host is not a valid domain")),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
                return Err(invalid("host is an IP address, not a domain"))
            }
            None => return Err(invalid("missing host")),
        };

        if !self.contains(&host) {
            log::warn!("Rejecting claim URL with untrusted host {}", host);
            return Err(FaucetError::UntrustedUrl {
                url: url.to_string(),
                host,
            });
        }

        Ok(parsed)
    }
}

/// Syntactic DNS name check: two or more labels of letters, digits and inner
/// hyphens, each at most 63 bytes, with a non-numeric top-level label.
pub fn is_valid_domain(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let label_ok = |label: &str| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !labels.iter().all(|&l| label_ok(l)) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.starts_with("xn--") || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
