//! Probe result types and the transport seam
//!
//! A `Transport` performs one request per call and is owned by a single
//! worker. A `Connector` builds one transport per worker from the shared
//! scan configuration, which lets the pool run against scripted fakes.

use crate::config::ScanConfig;
use crate::error::{ProbeResult, TrustStoreError};
use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SET_COOKIE};

/// Response headers and status retained from a completed request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// `Content-Type` header
    pub content_type: Option<String>,

    /// `Content-Length` header
    pub content_length: Option<u64>,

    /// `Set-Cookie` header (first value)
    pub set_cookie: Option<String>,

    /// `Location` header
    pub location: Option<String>,
}

impl ProbeResponse {
    /// Create a response with only a status code
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Extract the retained headers from a response header map
    pub fn from_headers(status: u16, headers: &HeaderMap) -> Self {
        let text = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };

        Self {
            status,
            content_type: text(CONTENT_TYPE),
            content_length: text(CONTENT_LENGTH).and_then(|v| v.trim().parse().ok()),
            set_cookie: text(SET_COOKIE),
            location: text(LOCATION),
        }
    }

    /// Set the `Location` header
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the `Content-Type` header
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the `Content-Length` header
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Set the `Set-Cookie` header
    pub fn with_set_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }

    /// Check if the status is a redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Check if the path was found (exactly 200)
    pub fn is_found(&self) -> bool {
        self.status == 200
    }
}

/// Outcome of probing one path
pub type ProbeOutcome = ProbeResult<ProbeResponse>;

/// One worker's private request channel to the target
pub trait Transport {
    /// Request a normalized path (always starting with `/`)
    fn probe(&mut self, path: &str) -> ProbeOutcome;
}

/// Builds a transport for each worker from the shared configuration
pub trait Connector: Send + Sync + 'static {
    type Transport: Transport;

    /// Build a transport; failure terminates only the calling worker
    fn connect(&self, config: &ScanConfig) -> Result<Self::Transport, TrustStoreError>;
}
