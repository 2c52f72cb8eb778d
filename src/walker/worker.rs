//! Worker thread logic for parallel path probing
//!
//! Each worker:
//! - Builds its own transport (no client state is shared between threads)
//! - Pulls tasks from the work queue until it finds the queue empty
//! - Probes the normalized path and classifies the outcome
//! - Writes the record to the success or error channel
//! - Pushes variations and retries back to the work queue

use crate::config::ScanConfig;
use crate::error::WorkerError;
use crate::http::{Connector, Transport};
use crate::output::ResultSink;
use crate::walker::classifier::{classify, Channel, FollowUp};
use crate::walker::queue::{Task, WorkQueueReceiver, WorkQueueSender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Requests issued
    pub probes: AtomicU64,

    /// Records written to the success channel
    pub results: AtomicU64,

    /// Records written to the error channel
    pub failures: AtomicU64,

    /// Empty paths dropped without a request
    pub discarded: AtomicU64,

    /// Failed tasks that were not retried
    pub abandoned: AtomicU64,
}

impl WorkerStats {
    fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_result(&self) {
        self.results.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_discard(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_abandon(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }
}

/// Totals over all workers of a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTotals {
    pub probes: u64,
    pub results: u64,
    pub failures: u64,
    pub discarded: u64,
    pub abandoned: u64,
}

/// A worker thread that probes queued paths
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<Result<(), WorkerError>>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn<C: Connector>(
        id: usize,
        config: Arc<ScanConfig>,
        connector: Arc<C>,
        queue_rx: WorkQueueReceiver,
        queue_tx: WorkQueueSender,
        sink: ResultSink,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("walker-{}", id))
            .spawn(move || {
                worker_loop(id, config, connector, queue_rx, queue_tx, sink, shutdown, stats_clone)
            })
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Shared handle to the statistics, still valid after `join`
    pub fn stats_handle(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(result) => result,
                Err(_) => Err(WorkerError::Panicked {
                    id: self.id,
                    message: "Worker thread panicked".into(),
                }),
            }
        } else {
            Ok(())
        }
    }
}

/// Main worker loop
#[allow(clippy::too_many_arguments)]
fn worker_loop<C: Connector>(
    id: usize,
    config: Arc<ScanConfig>,
    connector: Arc<C>,
    queue_rx: WorkQueueReceiver,
    queue_tx: WorkQueueSender,
    sink: ResultSink,
    shutdown: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
) -> Result<(), WorkerError> {
    debug!(worker = id, "Worker starting");

    let mut transport = match connector.connect(&config) {
        Ok(transport) => transport,
        Err(e) => {
            error!(
                worker = id,
                file = file!(),
                line = line!(),
                error = %e,
                "Failed to build HTTP client"
            );
            return Err(WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            });
        }
    };

    // An empty queue means this worker is done, even if others may still expand it
    while !shutdown.load(Ordering::Relaxed) {
        let task = match queue_rx.try_recv() {
            Some(task) => task,
            None => break,
        };

        process_task(id, task, &config, &mut transport, &queue_tx, &sink, &stats);
    }

    info!(
        worker = id,
        probes = stats.probes.load(Ordering::Relaxed),
        results = stats.results.load(Ordering::Relaxed),
        failures = stats.failures.load(Ordering::Relaxed),
        "Worker finished"
    );

    Ok(())
}

/// Probe one task and act on the verdict
fn process_task<T: Transport>(
    worker_id: usize,
    task: Task,
    config: &ScanConfig,
    transport: &mut T,
    queue_tx: &WorkQueueSender,
    sink: &ResultSink,
    stats: &WorkerStats,
) {
    if task.path.is_empty() {
        stats.record_discard();
        trace!(worker = worker_id, "Empty path discarded");
        return;
    }

    let path = task.normalized_path();
    stats.record_probe();
    let outcome = transport.probe(&path);
    let verdict = classify(&task, &path, &outcome, config);

    match verdict.channel {
        Channel::Results => {
            stats.record_result();
            if let Err(e) = sink.emit_result(&verdict.record) {
                error!(worker = worker_id, path = %path, error = %e, "Failed to write result");
            }
        }
        Channel::Errors => {
            stats.record_failure();
            if let Err(e) = sink.emit_failure(&verdict.record) {
                error!(worker = worker_id, path = %path, error = %e, "Failed to write failure");
            }
        }
        Channel::Suppressed => {
            trace!(worker = worker_id, path = %path, status = verdict.record.status, "Status filtered");
        }
    }

    match verdict.follow_up {
        FollowUp::Done => {}
        FollowUp::Expand(paths) => match queue_tx.expand(paths) {
            Ok(count) => {
                debug!(worker = worker_id, path = %path, count = count, "Queued variations");
            }
            Err(()) => error!(worker = worker_id, path = %path, "Work queue closed, variations lost"),
        },
        FollowUp::Retry(retry) => {
            let attempt = retry.retries;
            match queue_tx.requeue(retry) {
                Ok(()) => debug!(worker = worker_id, path = %path, attempt = attempt, "Requeued after failure"),
                Err(()) => error!(worker = worker_id, path = %path, "Work queue closed, retry lost"),
            }
        }
        FollowUp::Abandon => {
            stats.record_abandon();
            warn!(
                worker = worker_id,
                path = %path,
                reason = verdict.record.detail.as_deref().unwrap_or(""),
                "Giving up on path"
            );
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(workers: &[Arc<WorkerStats>]) -> WorkerTotals {
    workers.iter().fold(WorkerTotals::default(), |mut totals, stats| {
        totals.probes += stats.probes.load(Ordering::Relaxed);
        totals.results += stats.results.load(Ordering::Relaxed);
        totals.failures += stats.failures.load(Ordering::Relaxed);
        totals.discarded += stats.discarded.load(Ordering::Relaxed);
        totals.abandoned += stats.abandoned.load(Ordering::Relaxed);
        totals
    })
}
