//! http-walker - Concurrent HTTP path discovery
//!
//! Probes a web server for the existence of resources by requesting
//! candidate paths taken from word lists, and reports every response whose
//! status is of interest.
//!
//! # Features
//!
//! - **Parallel Probing**: Worker threads each with their own HTTP client,
//!   sharing one unbounded work queue.
//!
//! - **Variation Expansion**: Every path that answers 200 is requeued once
//!   per configured suffix (`/admin` → `/admin.bak`, `/admin_old`, ...).
//!
//! - **Retry on Transport Failure**: Unreachable paths are reported on the
//!   error stream and requeued, optionally up to a retry cap.
//!
//! - **Line Records**: One `;`-separated line per result, never interleaved
//!   between workers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      seed       ┌──────────────────────────┐
//! │  Word lists  │ ──────────────► │        Work Queue        │
//! │ (+ exts)     │                 │  (crossbeam unbounded)   │
//! └──────────────┘                 └────────────┬─────────────┘
//!                                     ▲         │ try_recv
//!                      variations /   │         ▼
//!                      retries        │  ┌─────────────────────┐
//!                                     └──│   Worker Threads    │
//!                                        │ probe → classify    │
//!                                        └──────────┬──────────┘
//!                                                   │ HTTP
//!                                                   ▼
//!                                        ┌─────────────────────┐
//!                                        │    Target Server    │
//!                                        └─────────────────────┘
//!
//!            success records ──► stdout / -o file
//!            failure records ──► stderr
//! ```
//!
//! # Example
//!
//! ```bash
//! # Basic scan
//! http-walker https://example.test -w words.txt
//!
//! # Extensions, variations and a custom filter
//! http-walker https://example.test -w words.txt -X .php,.bak -V _old,~ \
//!     --status-codes 200,403 -t 64 -o found.txt
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod progress;
pub mod walker;
pub mod wordlist;

pub use config::{CliArgs, ScanConfig};
pub use error::{Result, WalkerError};
pub use output::{ResultRecord, ResultSink};
pub use walker::{WalkCoordinator, WalkResult};
