//! Unbounded work queue of candidate paths
//!
//! All workers share one queue. Seeds, expansions and retries are pushed
//! through `WorkQueueSender`; workers pull with a non-blocking
//! `try_recv`. An empty queue is never waited on: a worker that finds
//! it empty is done. Since expansion and retry are pushed by the worker
//! that consumed the task, before its own next dequeue, no follow-up
//! work is lost when other workers exit early.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A candidate path awaiting a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Path as seeded or derived; normalized before the request
    pub path: String,

    /// Transport-failure retries already spent on this path
    pub retries: u32,
}

impl Task {
    /// Create a fresh task
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            retries: 0,
        }
    }

    /// Path with a leading `/`
    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }
}

/// Prefix `/` when absent, so `admin` and `/admin` request the same URL
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued (seeds included)
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,

    /// Tasks added by variation expansion
    pub expansions: AtomicU64,

    /// Tasks re-added after a transport failure
    pub retries: AtomicU64,
}

impl QueueStats {
    /// Get number of tasks ever enqueued
    pub fn enqueued_count(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Get queue throughput (dequeued tasks)
    pub fn throughput(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Get number of expansion tasks
    pub fn expansion_count(&self) -> u64 {
        self.expansions.load(Ordering::Relaxed)
    }

    /// Get number of retry tasks
    pub fn retry_count(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }
}

/// Shared FIFO of pending tasks
pub struct WorkQueue {
    /// Sender for adding tasks
    sender: Sender<Task>,

    /// Receiver for getting tasks
    receiver: Receiver<Task>,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender for this queue (clone for each worker)
    pub fn sender(&self) -> WorkQueueSender {
        WorkQueueSender {
            sender: self.sender.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Seed the queue with initial paths, returning how many were added
    pub fn seed<I>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut count = 0;
        for path in paths {
            // The queue owns a receiver, so the channel cannot be disconnected here
            if self.sender.send(Task::new(path)).is_ok() {
                count += 1;
            }
        }
        self.stats.enqueued.fetch_add(count as u64, Ordering::Relaxed);
        count
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for sending tasks to the queue
#[derive(Clone)]
pub struct WorkQueueSender {
    sender: Sender<Task>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Append a task to the back of the queue
    ///
    /// Returns `Err` if every receiver is gone.
    pub fn send(&self, task: Task) -> Result<(), ()> {
        self.sender.send(task).map_err(|_| ())?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Enqueue paths derived from a found path
    pub fn expand<I>(&self, paths: I) -> Result<usize, ()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut count = 0;
        for path in paths {
            self.send(Task::new(path))?;
            count += 1;
        }
        self.stats.expansions.fetch_add(count as u64, Ordering::Relaxed);
        Ok(count)
    }

    /// Put a failed task back for another attempt
    pub fn requeue(&self, task: Task) -> Result<(), ()> {
        self.send(task)?;
        self.stats.retries.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for receiving tasks from the queue
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<Task>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Take the front task without blocking; `None` means the queue is empty
    pub fn try_recv(&self) -> Option<Task> {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}
