//! Trust store construction from a PEM bundle
//!
//! Every certificate in the bundle becomes a trusted root for the
//! worker's client. A configured bundle replaces the built-in roots.

use crate::error::TrustStoreError;
use crate::http::describe_error;
use reqwest::blocking::ClientBuilder;
use reqwest::Certificate;
use tracing::debug;

/// Parse all certificates from a PEM bundle
pub fn load_bundle(pem: &[u8]) -> Result<Vec<Certificate>, TrustStoreError> {
    let certs = Certificate::from_pem_bundle(pem)
        .map_err(|e| TrustStoreError::Unreadable(describe_error(&e)))?;

    if certs.is_empty() {
        return Err(TrustStoreError::Empty);
    }

    Ok(certs)
}

/// Install the bundle as the client's only trusted roots
pub fn install_bundle(builder: ClientBuilder, pem: &[u8]) -> Result<ClientBuilder, TrustStoreError> {
    let certs = load_bundle(pem)?;
    debug!(certificates = certs.len(), "Installing CA bundle");

    Ok(certs
        .into_iter()
        .fold(builder.tls_built_in_root_certs(false), |builder, cert| {
            builder.add_root_certificate(cert)
        }))
}
