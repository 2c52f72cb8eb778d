//! HTTP access module
//!
//! This module issues the probe requests. Workers only see the
//! `Transport` and `Connector` traits; the reqwest-backed implementation
//! lives in `client`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HttpTransport                      │
//! │  - One per worker thread, built by HttpConnector     │
//! │  - Default headers, auth, redirect policy            │
//! │  - Keep-alive connections stay with their worker     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │            reqwest::blocking + rustls                │
//! │  - Trust store from a PEM bundle or built-in roots   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use http_walker::config::ScanConfig;
//! use http_walker::http::{Connector, HttpConnector, Transport};
//!
//! let config = ScanConfig::for_target("https://example.com").unwrap();
//! let mut transport = HttpConnector.connect(&config).unwrap();
//!
//! match transport.probe("/admin") {
//!     Ok(response) => println!("{} {:?}", response.status, response.content_type),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod client;
pub mod tls;
pub mod types;

pub use client::{HttpConnector, HttpTransport};
pub use types::{Connector, ProbeOutcome, ProbeResponse, Transport};

/// Render an error and its source chain on one line
pub(crate) fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
