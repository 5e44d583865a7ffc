//! Self-signed TLS for the starter.
//!
//! The certificate is generated at startup and lives only as long as the
//! process. Clients have to accept it explicitly (`submit --insecure`, or the
//! browser warning).

use anyhow::{Context, Result};
use rustls::{
    crypto::ring,
    pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer},
    ServerConfig,
};
use std::sync::Arc;
use tracing::debug;

/// Subject alternative name used when none is configured.
pub const DEFAULT_NAME: &str = "localhost";

/// Build a rustls server config around a fresh self-signed certificate valid
/// for `names` (DNS names or IP addresses).
///
/// # Errors
/// Returns an error if a name is not usable as a subject alternative name or
/// the certificate cannot be generated.
pub fn self_signed(names: &[String]) -> Result<ServerConfig> {
    let names = if names.is_empty() {
        vec![DEFAULT_NAME.to_string()]
    } else {
        names.to_vec()
    };

    let certified = rcgen::generate_simple_self_signed(names.clone())
        .with_context(|| format!("Failed to generate a certificate for {names:?}"))?;

    let cert_chain: Vec<CertificateDer<'static>> = vec![certified.cert.der().clone()];
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        certified.key_pair.serialize_der(),
    ));

    let mut config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .context("Failed to select TLS protocol versions")?
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .context("Failed to build TLS server config")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    debug!(?names, "self-signed certificate generated");

    Ok(config)
}
