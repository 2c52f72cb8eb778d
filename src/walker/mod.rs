//! Parallel path walker
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │    WalkCoordinator      │
//!                     │  - seeds the queue      │
//!                     │  - min(N, seeds) workers│
//!                     └───────────┬─────────────┘
//!                                 │
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │ transport │             │ transport │             │ transport │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       │   try_recv / expand / requeue                     │
//!       └──────────────────► WorkQueue ◄────────────────────┘
//! ```
//!
//! Each worker classifies its probe outcome (`classifier`) and writes the
//! record to the shared `ResultSink`.

pub mod classifier;
pub mod coordinator;
pub mod queue;
pub mod worker;

pub use classifier::{classify, Channel, FollowUp, Verdict};
pub use coordinator::{WalkCoordinator, WalkResult};
pub use queue::{normalize_path, Task, WorkQueue};
pub use worker::{Worker, WorkerStats};
