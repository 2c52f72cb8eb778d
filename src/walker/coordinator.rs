//! Walk coordinator - orchestrates the parallel path discovery
//!
//! The coordinator is responsible for:
//! - Seeding the work queue
//! - Sizing, starting and joining the worker pool
//! - Exposing the shutdown flag for signal handling
//! - Final statistics and flushing the output channels

use crate::config::ScanConfig;
use crate::error::{Result, WalkerError};
use crate::http::{Connector, HttpConnector};
use crate::output::ResultSink;
use crate::walker::queue::WorkQueue;
use crate::walker::worker::{aggregate_stats, Worker, WorkerTotals};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed walk
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    /// Requests issued
    pub probes: u64,

    /// Records written to the success channel
    pub results: u64,

    /// Records written to the error channel
    pub failures: u64,

    /// Tasks ever queued, seeds included
    pub queued: u64,

    /// Tasks taken off the queue
    pub dequeued: u64,

    /// Tasks still queued when the walk ended
    pub pending: usize,

    /// Tasks derived from found paths
    pub expansions: u64,

    /// Tasks put back after a transport failure
    pub retries: u64,

    /// Empty paths dropped without a request
    pub discarded: u64,

    /// Failed tasks that were not retried
    pub abandoned: u64,

    /// Workers started
    pub workers: usize,

    /// Time taken for the walk
    pub duration: Duration,

    /// Whether the walk completed (vs was interrupted)
    pub completed: bool,
}

/// Coordinates the parallel walk over candidate paths
pub struct WalkCoordinator<C: Connector = HttpConnector> {
    /// Configuration
    config: Arc<ScanConfig>,

    /// Builds one transport per worker
    connector: Arc<C>,

    /// Work queue for path tasks
    queue: WorkQueue,

    /// Success and error channels
    sink: ResultSink,

    /// Worker threads
    workers: Vec<Worker>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl WalkCoordinator<HttpConnector> {
    /// Create a coordinator probing over HTTP
    pub fn new(config: ScanConfig, sink: ResultSink) -> Self {
        Self::with_connector(config, HttpConnector, sink)
    }
}

impl<C: Connector> WalkCoordinator<C> {
    /// Create a coordinator with a custom transport factory
    pub fn with_connector(config: ScanConfig, connector: C, sink: ResultSink) -> Self {
        Self {
            config: Arc::new(config),
            connector: Arc::new(connector),
            queue: WorkQueue::new(),
            sink,
            workers: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Add initial paths to the queue, returning how many were added
    pub fn seed<I>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        self.queue.seed(paths)
    }

    /// Target every path is resolved against
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Number of tasks waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of workers `run` will start for the current queue
    pub fn planned_workers(&self) -> usize {
        self.config.worker_count.min(self.queue.len())
    }

    /// Run the walk until every worker has found the queue empty
    pub fn run(mut self) -> Result<WalkResult> {
        let start_time = Instant::now();
        let worker_count = self.planned_workers();

        info!(
            url = %self.config.base_url,
            workers = worker_count,
            tasks = self.queue.len(),
            "Starting walk"
        );

        if worker_count == 0 {
            debug!("Nothing to probe");
            return Ok(WalkResult {
                queued: self.queue.stats().enqueued_count(),
                duration: start_time.elapsed(),
                completed: true,
                ..WalkResult::default()
            });
        }

        if let Err(e) = self.spawn_workers(worker_count) {
            self.shutdown.store(true, Ordering::SeqCst);
            self.join_workers();
            return Err(e);
        }

        let totals = self.join_workers();

        if let Err(e) = self.sink.flush() {
            warn!(error = %e, "Failed to flush output");
        }

        let duration = start_time.elapsed();
        let completed = !self.shutdown.load(Ordering::SeqCst);
        let queue_stats = self.queue.stats();
        let pending = self.queue.len();

        info!(
            probes = totals.probes,
            pending = pending,
            results = totals.results,
            failures = totals.failures,
            duration_secs = duration.as_secs(),
            completed = completed,
            "Walk finished"
        );

        Ok(WalkResult {
            probes: totals.probes,
            results: totals.results,
            failures: totals.failures,
            queued: queue_stats.enqueued_count(),
            dequeued: queue_stats.throughput(),
            pending,
            expansions: queue_stats.expansion_count(),
            retries: queue_stats.retry_count(),
            discarded: totals.discarded,
            abandoned: totals.abandoned,
            workers: worker_count,
            duration,
            completed,
        })
    }

    /// Spawn worker threads
    fn spawn_workers(&mut self, count: usize) -> Result<()> {
        for id in 0..count {
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.config),
                Arc::clone(&self.connector),
                self.queue.receiver(),
                self.queue.sender(),
                self.sink.clone(),
                Arc::clone(&self.shutdown),
            )
            .map_err(WalkerError::from)?;

            self.workers.push(worker);
        }

        debug!(count = self.workers.len(), "Workers spawned");
        Ok(())
    }

    /// Join all worker threads and collect final stats
    fn join_workers(&mut self) -> WorkerTotals {
        let workers = std::mem::take(&mut self.workers);

        // Stats are read after every join so late increments are counted
        let mut finished = Vec::with_capacity(workers.len());
        for worker in workers {
            let id = worker.id();
            let stats = worker.stats_handle();
            if let Err(e) = worker.join() {
                warn!(worker = id, error = %e, "Worker failed");
            }
            finished.push(stats);
        }

        aggregate_stats(&finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;

    #[test]
    fn test_empty_queue_starts_no_workers() {
        let config = ScanConfig::for_target("http://127.0.0.1:9").unwrap();
        let sink = ResultSink::new(Arc::new(MemorySink::new()), Arc::new(MemorySink::new()));
        let coordinator = WalkCoordinator::new(config, sink);

        assert_eq!(coordinator.planned_workers(), 0);
        let result = coordinator.run().unwrap();
        assert_eq!(result.workers, 0);
        assert_eq!(result.probes, 0);
        assert_eq!(result.queued, 0);
        assert!(result.completed);
    }

    #[test]
    fn test_pool_never_exceeds_seeded_tasks() {
        let mut config = ScanConfig::for_target("http://127.0.0.1:9").unwrap();
        config.worker_count = 40;
        let sink = ResultSink::new(Arc::new(MemorySink::new()), Arc::new(MemorySink::new()));
        let coordinator = WalkCoordinator::new(config, sink);

        assert_eq!(coordinator.seed(vec!["/a".into(), "/b".into(), "/c".into()]), 3);
        assert_eq!(coordinator.queue_len(), 3);
        assert_eq!(coordinator.planned_workers(), 3);
    }
}
