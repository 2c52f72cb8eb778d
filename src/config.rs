//! Configuration types for http-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime scan configuration with validation
//! - Header, credential, method and status code parsing

use crate::error::ConfigError;
use clap::{ArgAction, Parser};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::Url;
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Default worker count (requests are I/O bound)
pub const DEFAULT_WORKERS: usize = 40;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Status codes whose results are written to the success stream by default
pub const DEFAULT_STATUS_CODES: [u16; 8] = [200, 204, 301, 302, 307, 308, 401, 403];

/// User-Agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("http-walker/", env!("CARGO_PKG_VERSION"));

/// Fast, multithreaded HTTP path discovery
#[derive(Parser, Debug, Clone)]
#[command(
    name = "http-walker",
    version,
    about = "Fast, multithreaded HTTP path discovery",
    long_about = "Requests every path from the given word lists against a base URL.\n\n\
                  Paths that answer 200 are probed again with each configured variation\n\
                  appended. Results go to stdout as `;`-separated records, transport\n\
                  failures to stderr.",
    after_help = "EXAMPLES:\n    \
        http-walker https://example.com -w common.txt\n    \
        http-walker https://example.com -w common.txt -X .php,.bak -V _,_old -t 64\n    \
        http-walker https://example.com -w api.txt -b $TOKEN --status-codes 200,401\n    \
        http-walker https://example.com -w words.txt --verify-certs --ca-bundle ca.pem"
)]
pub struct CliArgs {
    /// Base URL for all requests, e.g. https://example.com (no trailing slash)
    #[arg(value_name = "BASE_URL")]
    pub base_url: String,

    /// Word list file (can be repeated)
    #[arg(short = 'w', long = "word-list", value_name = "FILE", action = ArgAction::Append)]
    pub word_lists: Vec<PathBuf>,

    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub threads: usize,

    /// Extensions appended to every word list entry, e.g. .php,.bak
    #[arg(short = 'X', long, value_name = "EXT,...", value_delimiter = ',')]
    pub probe_extensions: Vec<String>,

    /// Variations appended to every path that was found, e.g. _,_admin
    #[arg(short = 'V', long, value_name = "EXT,...", value_delimiter = ',')]
    pub probe_variations: Vec<String>,

    /// Extra request header in `Name: value` form (can be repeated)
    #[arg(short = 'H', long = "header", value_name = "HEADER", action = ArgAction::Append)]
    pub headers: Vec<String>,

    /// Cookie header sent with each request
    #[arg(long, value_name = "COOKIE")]
    pub cookie: Option<String>,

    /// Content-Type header sent with each request
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<String>,

    /// User-Agent header sent with each request
    #[arg(long, default_value = DEFAULT_USER_AGENT, value_name = "USERAGENT")]
    pub user_agent: String,

    /// Basic authentication credentials
    #[arg(short = 'p', long, value_name = "USERNAME:PASSWORD")]
    pub credentials: Option<String>,

    /// Bearer token, e.g. a JWT
    #[arg(short = 'b', long, value_name = "TOKEN")]
    pub bearer_token: Option<String>,

    /// HTTP request method (GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS)
    #[arg(short = 'm', long, default_value = "GET", value_name = "VERB")]
    pub method: String,

    /// Request body (POST, PUT and PATCH only)
    #[arg(long, value_name = "BODY")]
    pub body: Option<String>,

    /// HTTP version: 1.0, 1.1 or 2.0
    #[arg(long, default_value = "1.1", value_name = "VERSION")]
    pub http_version: String,

    /// Follow redirects to their final destination
    #[arg(short = 'f', long)]
    pub follow_redirects: bool,

    /// Verify server certificates (HTTPS only)
    #[arg(long)]
    pub verify_certs: bool,

    /// PEM bundle of trusted CA certificates (implies --verify-certs)
    #[arg(long, value_name = "FILE")]
    pub ca_bundle: Option<PathBuf>,

    /// Status codes written to the output
    #[arg(
        long,
        value_name = "CODE,...",
        value_delimiter = ',',
        default_values_t = DEFAULT_STATUS_CODES
    )]
    pub status_codes: Vec<u16>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout: u64,

    /// Give up on a path after this many failed retries (unlimited if not set)
    #[arg(long, value_name = "NUM")]
    pub max_retries: Option<u32>,

    /// Write result records to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase verbosity (-v header and summary, -vv debug logging)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    /// Whether a configured body is sent with this method
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(ConfigError::InvalidMethod(s.to_string())),
        }
    }
}

/// HTTP protocol version used by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
    Http2,
}

impl FromStr for HttpVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" => Ok(HttpVersion::Http10),
            "1.1" => Ok(HttpVersion::Http11),
            "2" | "2.0" => Ok(HttpVersion::Http2),
            other => Err(ConfigError::InvalidHttpVersion(other.to_string())),
        }
    }
}

/// Basic authentication credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse `username:password`; the password may itself contain colons
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let (username, password) = s.split_once(':').ok_or(ConfigError::InvalidCredentials)?;
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::InvalidCredentials);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Parse a `Name: value` header, validating both halves
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let (name, value) = raw.split_once(':').ok_or_else(|| ConfigError::InvalidHeader {
        header: raw.to_string(),
        reason: "expected `Name: value`".into(),
    })?;
    let name = name.trim();

    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
        header: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value(name, value.trim_start())?))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
        header: name.to_string(),
        reason: e.to_string(),
    })
}

/// Validate a base URL and strip any trailing slash
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "missing host".into(),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validated scan configuration, shared read-only by all workers
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Base URL without trailing slash
    pub base_url: String,

    /// Default headers sent with every request
    pub headers: HeaderMap,

    /// Basic authentication
    pub credentials: Option<Credentials>,

    /// Bearer token authentication
    pub bearer_token: Option<String>,

    /// Request method
    pub method: HttpMethod,

    /// Request body for methods that carry one
    pub body: Option<String>,

    /// Protocol version
    pub http_version: HttpVersion,

    /// Verify server certificates
    pub verify_certs: bool,

    /// PEM bundle of trusted roots (replaces the built-in roots when set)
    pub ca_bundle: Option<Vec<u8>>,

    /// Follow redirects
    pub follow_redirects: bool,

    /// Per-request timeout
    pub timeout: Duration,

    /// Suffixes appended to each word list entry before the first probe
    pub extensions: Vec<String>,

    /// Suffixes appended to each path that answered 200
    pub variations: Vec<String>,

    /// Status codes written to the success stream
    pub status_codes: HashSet<u16>,

    /// Retry cap for transport failures (unbounded if None)
    pub max_retries: Option<u32>,

    /// Number of worker threads requested
    pub worker_count: usize,

    /// Word list files
    pub word_lists: Vec<PathBuf>,

    /// Success record destination (stdout if None)
    pub output_path: Option<PathBuf>,

    /// Verbosity level
    pub verbosity: u8,
}

impl ScanConfig {
    /// Configuration with defaults for the given base URL
    pub fn for_target(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            headers: HeaderMap::from_iter([(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT))]),
            credentials: None,
            bearer_token: None,
            method: HttpMethod::Get,
            body: None,
            http_version: HttpVersion::Http11,
            verify_certs: false,
            ca_bundle: None,
            follow_redirects: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extensions: Vec::new(),
            variations: Vec::new(),
            status_codes: DEFAULT_STATUS_CODES.into_iter().collect(),
            max_retries: None,
            worker_count: DEFAULT_WORKERS,
            word_lists: Vec::new(),
            output_path: None,
            verbosity: 0,
        })
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::for_target(&args.base_url)?;

        // Validate worker count
        if args.threads == 0 || args.threads > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.threads,
                max: MAX_WORKERS,
            });
        }

        let mut headers = HeaderMap::new();
        for raw in &args.headers {
            let (name, value) = parse_header(raw)?;
            headers.append(name, value);
        }
        if let Some(cookie) = &args.cookie {
            headers.append(COOKIE, header_value("Cookie", cookie)?);
        }
        if let Some(content_type) = &args.content_type {
            headers.append(CONTENT_TYPE, header_value("Content-Type", content_type)?);
        }
        headers.append(USER_AGENT, header_value("User-Agent", &args.user_agent)?);

        let credentials = args.credentials.as_deref().map(Credentials::parse).transpose()?;

        let status_codes = args
            .status_codes
            .iter()
            .map(|&code| {
                if (100..=999).contains(&code) {
                    Ok(code)
                } else {
                    Err(ConfigError::InvalidStatusCode(code))
                }
            })
            .collect::<Result<HashSet<_>, _>>()?;

        let ca_bundle = match &args.ca_bundle {
            Some(path) => Some(std::fs::read(path).map_err(|e| ConfigError::InvalidCaBundle {
                path: path.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        // Validate output path
        if let Some(output) = &args.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ConfigError::InvalidOutputPath {
                        path: output.clone(),
                        reason: format!("Parent directory '{}' does not exist", parent.display()),
                    });
                }
            }
        }

        config.headers = headers;
        config.credentials = credentials;
        config.bearer_token = args.bearer_token.filter(|t| !t.is_empty());
        config.method = args.method.parse()?;
        config.body = args.body;
        config.http_version = args.http_version.parse()?;
        config.verify_certs = args.verify_certs || ca_bundle.is_some();
        config.ca_bundle = ca_bundle;
        config.follow_redirects = args.follow_redirects;
        config.timeout = Duration::from_secs(args.timeout);
        config.extensions = args.probe_extensions;
        config.variations = args.probe_variations;
        config.status_codes = status_codes;
        config.max_retries = args.max_retries;
        config.worker_count = args.threads;
        config.word_lists = args.word_lists;
        config.output_path = args.output;
        config.verbosity = args.verbose;

        Ok(config)
    }

    /// Check if results with this status go to the success stream
    pub fn is_accepted(&self, status: u16) -> bool {
        self.status_codes.contains(&status)
    }

    /// Full URL for a normalized path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
