//! Upstream-side TLS configuration.
//!
//! # Responsibilities
//! - Install the process-wide crypto provider exactly once
//! - Build rustls client configs for upstream connections
//! - Provide the certificate-verification bypass for upstreams that opt in
//!
//! # Design Decisions
//! - Verification bypass is per-upstream, decided at pool construction;
//!   there is no transport-wide trust override

use std::sync::{Arc, Once};

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};

static CRYPTO_PROVIDER_INIT: Once = Once::new();

/// Install the ring crypto provider as the process default.
///
/// Safe to call from multiple threads; only the first call has an effect.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Client config that accepts any upstream certificate.
///
/// Used only for upstreams configured with `skip_tls_verify = true`.
pub fn insecure_client_config() -> ClientConfig {
    ensure_crypto_provider();
    ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoCertificateVerification))
        .with_no_client_auth()
}

/// Certificate verifier that accepts everything.
#[derive(Debug)]
struct NoCertificateVerification;

impl ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insecure_config_builds() {
        let config = insecure_client_config();
        // No ALPN: protocol selection stays with the connector (HTTP/1.1 only).
        assert!(config.alpn_protocols.is_empty());
    }

    #[test]
    fn provider_install_is_idempotent() {
        ensure_crypto_provider();
        ensure_crypto_provider();
    }
}
