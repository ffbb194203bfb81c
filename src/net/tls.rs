//! TLS configuration and certificate loading for the listener.
//!
//! # Responsibilities
//! - Load the server certificate chain and private key from PEM files
//! - Restrict the handshake to the configured TLS version bounds
//! - Pin ALPN to HTTP/1.1 (no upgrade to h2)
//!
//! # Design Decisions
//! - Certificate material is loaded exactly once, at startup; any problem
//!   here is fatal before the listener binds

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ServerConfig, SupportedProtocolVersion};
use thiserror::Error;

use crate::config::ListenerTlsConfig;
use crate::transport::tls::ensure_crypto_provider;

/// Errors raised while assembling the listener TLS configuration.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0}")]
    NoCertificates(String),

    #[error("no private key found in {0}")]
    NoPrivateKey(String),

    #[error("unsupported TLS version: {0}")]
    UnsupportedVersion(String),

    #[error("TLS configuration rejected: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Load the listener TLS configuration from PEM files on disk.
pub fn load_tls_config(config: &ListenerTlsConfig) -> Result<RustlsConfig, TlsError> {
    ensure_crypto_provider();

    let certs = load_certs(Path::new(&config.cert_path))?;
    let key = load_private_key(Path::new(&config.key_path))?;
    let versions = protocol_versions(&config.min_version, &config.max_version)?;

    let mut server_config = ServerConfig::builder_with_protocol_versions(&versions)
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    // HTTP/1.1 only; no ALPN upgrade path to HTTP/2.
    server_config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .collect::<Result<_, _>>()
        .map_err(|source| TlsError::Io {
            path: path.display().to_string(),
            source,
        })?;

    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.display().to_string()));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| TlsError::Io {
            path: path.display().to_string(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(path.display().to_string()))
}

fn protocol_versions(
    min: &str,
    max: &str,
) -> Result<Vec<&'static SupportedProtocolVersion>, TlsError> {
    fn rank(version: &str) -> Result<u8, TlsError> {
        match version {
            "1.2" => Ok(2),
            "1.3" => Ok(3),
            other => Err(TlsError::UnsupportedVersion(other.to_string())),
        }
    }

    let lo = rank(min)?;
    let hi = rank(max)?;
    if lo > hi {
        return Err(TlsError::UnsupportedVersion(format!(
            "min {min} exceeds max {max}"
        )));
    }

    let mut versions: Vec<&'static SupportedProtocolVersion> = Vec::new();
    if lo <= 2 && 2 <= hi {
        versions.push(&rustls::version::TLS12);
    }
    if lo <= 3 && 3 <= hi {
        versions.push(&rustls::version::TLS13);
    }
    Ok(versions)
}
