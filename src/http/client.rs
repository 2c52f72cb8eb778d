//! HTTP transport built on reqwest's blocking client
//!
//! Each worker owns one `HttpTransport`. The client is configured once
//! from the scan configuration (default headers, auth, redirect policy,
//! TLS verification, protocol version) and reused for every request that
//! worker makes, so keep-alive connections stay with their worker.

use crate::config::{HttpMethod, HttpVersion, ScanConfig};
use crate::error::{ProbeError, TrustStoreError};
use crate::http::types::{Connector, ProbeOutcome, ProbeResponse, Transport};
use crate::http::{describe_error, tls};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::{Method, Url, Version};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Redirect hops followed when redirects are enabled
const MAX_REDIRECTS: usize = 10;

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Options => Method::OPTIONS,
        }
    }
}

/// Connector producing real HTTP transports
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Transport = HttpTransport;

    fn connect(&self, config: &ScanConfig) -> Result<HttpTransport, TrustStoreError> {
        HttpTransport::new(config)
    }
}

/// A worker's HTTP client bound to one base URL
pub struct HttpTransport {
    client: Client,
    config: ScanConfig,
    method: Method,
}

impl HttpTransport {
    /// Build the client for a scan configuration
    pub fn new(config: &ScanConfig) -> Result<Self, TrustStoreError> {
        let redirect = if config.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        // Bodies are never decoded, so Content-Length is reported as received
        let mut builder = Client::builder()
            .default_headers(request_headers(&config.headers))
            .redirect(redirect)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_certs);

        builder = match config.http_version {
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Http10 | HttpVersion::Http11 => builder.http1_only(),
        };

        if config.verify_certs {
            if let Some(bundle) = &config.ca_bundle {
                builder = tls::install_bundle(builder, bundle)?;
            }
        }

        let client = builder
            .build()
            .map_err(|e| TrustStoreError::ClientBuild(describe_error(&e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            method: config.method.into(),
        })
    }

    fn send(&self, url: Url) -> reqwest::Result<reqwest::blocking::Response> {
        let mut request = self.client.request(self.method.clone(), url);

        if self.config.http_version == HttpVersion::Http10 {
            request = request.version(Version::HTTP_10);
        }

        // Basic credentials take precedence over a bearer token
        if let Some(creds) = &self.config.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        } else if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        if self.config.method.carries_body() {
            if let Some(body) = &self.config.body {
                request = request.body(body.clone());
            }
        }

        request.send()
    }
}

impl Transport for HttpTransport {
    fn probe(&mut self, path: &str) -> ProbeOutcome {
        let path = escape_fragment(path);
        let target = self.config.url_for(&path);

        // The URL parser would resolve these away and request a different resource
        if has_dot_segment(&path) {
            return Err(ProbeError::InvalidUrl {
                url: target,
                reason: "path contains a dot segment".into(),
            });
        }

        let url = Url::parse(&target).map_err(|e| ProbeError::InvalidUrl {
            url: target.clone(),
            reason: e.to_string(),
        })?;

        let mut response = self.send(url).map_err(|e| ProbeError::Transport {
            url: target.clone(),
            reason: describe_error(&e),
        })?;

        let result = ProbeResponse::from_headers(response.status().as_u16(), response.headers());

        // Drain the body so the connection can be reused
        if let Err(e) = response.copy_to(&mut std::io::sink()) {
            debug!(url = %target, error = %e, "Failed to read response body");
        }

        trace!(url = %target, status = result.status, "Probe completed");
        Ok(result)
    }
}

/// Configured headers plus `Accept-Encoding: gzip` unless one is configured
fn request_headers(configured: &HeaderMap) -> HeaderMap {
    let mut headers = configured.clone();
    if !headers.contains_key(ACCEPT_ENCODING) {
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    }
    headers
}

/// Keep `#` in the requested path instead of letting it start a fragment
fn escape_fragment(path: &str) -> Cow<'_, str> {
    if path.contains('#') {
        path.replace('#', "%23").into()
    } else {
        path.into()
    }
}

/// Check for `.` or `..` segments, plain or percent-encoded, before any query
fn has_dot_segment(path: &str) -> bool {
    let path = path.split_once('?').map_or(path, |(path, _)| path);

    path.split(['/', '\\']).any(|segment| {
        matches!(
            segment.to_ascii_lowercase().as_str(),
            "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
        )
    })
}
