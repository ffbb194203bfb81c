//! Upstream origin identification.

use axum::http::uri::{Authority, Scheme as UriScheme};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Errors produced while parsing an origin URL.
#[derive(Debug, Error)]
pub enum OriginError {
    /// The string is not a URL at all.
    #[error("invalid origin URL: {0}")]
    Url(#[from] url::ParseError),

    /// The URL uses a scheme other than http or https.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL has no host component.
    #[error("origin has no host: {0}")]
    MissingHost(String),
}

/// Transport scheme of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Scheme + host (+ optional port) identifying exactly one upstream endpoint.
///
/// Immutable once parsed. The port is retained only when it appears
/// explicitly in the configured URL, so the `Host` header sent upstream
/// matches what a direct client would send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parse an origin from a URL string such as `https://repo.example.com:8443`.
    pub fn parse(s: &str) -> Result<Self, OriginError> {
        let url = Url::parse(s)?;
        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(OriginError::UnsupportedScheme(other.to_string())),
        };
        let host = url
            .host_str()
            .ok_or_else(|| OriginError::MissingHost(s.to_string()))?
            .to_string();

        Ok(Self {
            scheme,
            host,
            port: url.port(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Value for the outbound `Host` header: `host` or `host:port`.
    pub fn host_header(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// URI authority for the rewritten request.
    pub fn authority(&self) -> Authority {
        // host_header() is built from an already-parsed URL, so this cannot fail.
        Authority::from_str(&self.host_header()).expect("parsed origin produces valid authority")
    }

    /// URI scheme for the rewritten request.
    pub fn uri_scheme(&self) -> UriScheme {
        match self.scheme {
            Scheme::Http => UriScheme::HTTP,
            Scheme::Https => UriScheme::HTTPS,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host_header())
    }
}
