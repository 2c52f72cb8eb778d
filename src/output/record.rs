//! Result record and its line format
//!
//! Success records:
//! `status;"path";"content-type";content-length;"set-cookie";extra`
//! where `extra` is the redirect target for 3xx responses.
//!
//! Failure records:
//! `-1;"path";;;;error-description`

use crate::error::ProbeError;
use crate::http::ProbeResponse;
use std::fmt;

/// Status written for probes that produced no response
pub const FAILURE_STATUS: i32 = -1;

/// One classified probe result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// HTTP status, or `FAILURE_STATUS`
    pub status: i32,

    /// Normalized probed path
    pub path: String,

    /// `Content-Type` header
    pub content_type: Option<String>,

    /// `Content-Length` header
    pub content_length: Option<u64>,

    /// `Set-Cookie` header
    pub set_cookie: Option<String>,

    /// Redirect target (3xx) or error description (failure)
    pub detail: Option<String>,
}

impl ResultRecord {
    /// Record for a completed response
    pub fn from_response(path: &str, response: &ProbeResponse) -> Self {
        let detail = if response.is_redirect() {
            response.location.clone()
        } else {
            None
        };

        Self {
            status: i32::from(response.status),
            path: path.to_string(),
            content_type: response.content_type.clone(),
            content_length: response.content_length,
            set_cookie: response.set_cookie.clone(),
            detail,
        }
    }

    /// Record for a probe that failed before a response arrived
    pub fn failure(path: &str, error: &ProbeError) -> Self {
        Self {
            status: FAILURE_STATUS,
            path: path.to_string(),
            content_type: None,
            content_length: None,
            set_cookie: None,
            detail: Some(error.to_string()),
        }
    }

    /// Check if this record describes a failure
    pub fn is_failure(&self) -> bool {
        self.status == FAILURE_STATUS
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = single_line(self.detail.as_deref().unwrap_or(""));

        if self.is_failure() {
            return write!(f, "{};\"{}\";;;;{}", self.status, self.path, detail);
        }

        write!(
            f,
            "{};\"{}\";\"{}\";{};\"{}\";{}",
            self.status,
            self.path,
            single_line(self.content_type.as_deref().unwrap_or("")),
            self.content_length.unwrap_or(0),
            single_line(self.set_cookie.as_deref().unwrap_or("")),
            detail,
        )
    }
}

/// Keep one record on one line
fn single_line(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        value.replace(['\r', '\n'], " ").into()
    } else {
        value.into()
    }
}
