//! Error types for http-walker
//!
//! This module defines the error hierarchy that covers:
//! - Probe failures (transport errors and malformed target URLs)
//! - Trust store construction from a PEM bundle
//! - Configuration and CLI errors
//! - Word list loading
//! - Result output and worker thread errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what to do
//! - Probe failures are handled inside the worker loop and never stop the pool

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the http-walker application
#[derive(Error, Debug)]
pub enum WalkerError {
    /// Probe-related errors
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Trust store errors
    #[error("Trust store error: {0}")]
    TrustStore(#[from] TrustStoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Word list errors
    #[error("Word list error: {0}")]
    Wordlist(#[from] WordlistError),

    /// Result output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to obtain a response for a single path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The request could not be completed (connect, DNS, timeout, TLS handshake)
    #[error("{reason}")]
    Transport { url: String, reason: String },

    /// The target URL could not be formed from base URL and path
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ProbeError {
    /// Check if this error is recoverable (the same request may succeed later)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProbeError::Transport { .. })
    }

    /// The URL that was being requested
    pub fn url(&self) -> &str {
        match self {
            ProbeError::Transport { url, .. } => url,
            ProbeError::InvalidUrl { url, .. } => url,
        }
    }
}

/// Errors building a worker's TLS trust store
#[derive(Error, Debug)]
pub enum TrustStoreError {
    /// The PEM bundle could not be parsed
    #[error("CA certificates cannot be read: {0}")]
    Unreadable(String),

    /// The bundle parsed but held no certificates
    #[error("CA bundle contains no certificates")]
    Empty,

    /// The HTTP client could not be created with the trust store
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Base URL missing or unparsable
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Header not in `Name: value` form or not a valid HTTP header
    #[error("Invalid header '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },

    /// Credentials not in `username:password` form
    #[error("Invalid credentials: expected USERNAME:PASSWORD")]
    InvalidCredentials,

    /// Unknown HTTP method
    #[error("Invalid method '{0}': expected one of GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS")]
    InvalidMethod(String),

    /// Unknown HTTP version
    #[error("Invalid HTTP version '{0}': expected 1.0, 1.1 or 2.0")]
    InvalidHttpVersion(String),

    /// Status code outside 100..=999
    #[error("Invalid status code {0}")]
    InvalidStatusCode(u16),

    /// CA bundle could not be read
    #[error("Cannot read CA bundle '{path}': {reason}")]
    InvalidCaBundle { path: PathBuf, reason: String },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

/// Word list loading errors
#[derive(Error, Debug)]
pub enum WordlistError {
    /// Word list could not be opened or read
    #[error("Failed to read word list '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result record output errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// Writing a record to its stream failed
    #[error("Failed to write record: {0}")]
    Write(#[from] std::io::Error),

    /// Output file could not be created
    #[error("Failed to create output file '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker initialization failed
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },

    /// Worker thread could not be spawned
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Result type alias for WalkerError
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for ProbeError
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Result type alias for OutputError
pub type OutputResult<T> = std::result::Result<T, OutputError>;
