//! Client address and TTL resolution.
//!
//! Both values come from a short ordered list of sources, evaluated top-down.
//! A source either yields a value, passes to the next one, or fails the request.
//! Override headers fail closed: when one is configured but missing, the request is rejected
//! instead of falling back to the proxy's own address.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::Query,
    http::{HeaderMap, HeaderName, Uri, header::AsHeaderName},
};
use knock_model::Ttl;

use crate::{config::HttpConfig, error::ApiError};

/// Header read for the TTL before any configured override.
pub const DEFAULT_TTL_HEADER: &str = "cf-ttl";

/// Query parameter carrying an explicit client IP.
const IP_PARAM: &str = "ip";

/// Request metadata the resolver looks at.
pub struct RequestMeta<'a> {
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    /// TCP peer of the connection, if known.
    pub peer: Option<SocketAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IpSource {
    /// Configured reverse-proxy header. Wins unconditionally; missing means misconfiguration.
    RealIpHeader(HeaderName),
    /// `?ip=`, only when explicit IPs are trusted.
    QueryParam,
    /// Connection remote address.
    Peer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TtlSource {
    DefaultHeader,
    /// Configured override header, consulted when the default one is empty.
    TimeHandler(HeaderName),
}

/// Ordered resolution policy derived from [`HttpConfig`].
#[derive(Debug, Clone)]
pub struct Resolver {
    ip_policy: Vec<IpSource>,
    ttl_policy: Vec<TtlSource>,
}

impl Resolver {
    pub fn new(cfg: &HttpConfig) -> Self {
        let ip_policy = match &cfg.real_ip_header {
            Some(header) => vec![IpSource::RealIpHeader(header.clone())],
            None if cfg.explicit_ip => vec![IpSource::QueryParam, IpSource::Peer],
            None => vec![IpSource::Peer],
        };

        let mut ttl_policy = vec![TtlSource::DefaultHeader];
        if let Some(header) = &cfg.time_handler {
            ttl_policy.push(TtlSource::TimeHandler(header.clone()));
        }

        Self {
            ip_policy,
            ttl_policy,
        }
    }

    /// Resolve the effective client IP and TTL.
    ///
    /// Order of checks: TTL source, IP source, IP syntax, TTL syntax.
    /// IPv4-mapped IPv6 addresses come out as plain IPv4, whatever the source.
    pub fn resolve(&self, meta: &RequestMeta<'_>) -> Result<(IpAddr, Ttl), ApiError> {
        let raw_ttl = self.raw_ttl(meta)?;
        let raw_ip = self.raw_ip(meta)?;

        let ip = raw_ip
            .parse::<IpAddr>()
            .map(|ip| ip.to_canonical())
            .map_err(|_| ApiError::MalformedIp(raw_ip.clone()))?;
        let ttl = parse_ttl(&raw_ttl)?;
        Ok((ip, ttl))
    }

    fn raw_ttl(&self, meta: &RequestMeta<'_>) -> Result<String, ApiError> {
        for source in &self.ttl_policy {
            let value = match source {
                TtlSource::DefaultHeader => header_value(meta.headers, DEFAULT_TTL_HEADER),
                TtlSource::TimeHandler(name) => {
                    let value = header_value(meta.headers, name);
                    if value.is_empty() {
                        return Err(ApiError::EmptyRealTtlHeader);
                    }
                    value
                }
            };
            if !value.is_empty() {
                return Ok(value);
            }
        }
        Ok(String::new())
    }

    fn raw_ip(&self, meta: &RequestMeta<'_>) -> Result<String, ApiError> {
        for source in &self.ip_policy {
            let value = match source {
                IpSource::RealIpHeader(name) => {
                    let value = header_value(meta.headers, name);
                    if value.is_empty() {
                        return Err(ApiError::EmptyRealIpHeader);
                    }
                    value
                }
                IpSource::QueryParam => query_value(meta.uri, IP_PARAM),
                IpSource::Peer => match meta.peer {
                    Some(addr) => addr.ip().to_string(),
                    None => return Err(ApiError::MissingPeerAddress),
                },
            };
            if !value.is_empty() {
                return Ok(value);
            }
        }
        Err(ApiError::MissingPeerAddress)
    }
}

fn header_value<K: AsHeaderName>(headers: &HeaderMap, name: K) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
        .unwrap_or_default()
}

/// First value of `key` in the query string; empty when absent or unparsable.
fn query_value(uri: &Uri, key: &str) -> String {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(pairs)| pairs.into_iter().find(|(k, _)| k == key))
        .map(|(_, v)| v)
        .unwrap_or_default()
}

/// Decimal digits only, must fit in 16 bits.
fn parse_ttl(raw: &str) -> Result<Ttl, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::MalformedTtl(raw.to_string()));
    }
    raw.parse::<Ttl>()
        .map_err(|_| ApiError::MalformedTtl(raw.to_string()))
}
