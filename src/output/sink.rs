//! Serialized record sinks
//!
//! Each channel is guarded by its own lock so one record is always
//! written as one uninterrupted line, whichever worker emits it.

use crate::error::{OutputError, OutputResult};
use crate::output::record::ResultRecord;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// A destination for result records
pub trait RecordSink: Send + Sync {
    /// Write one record atomically
    fn emit(&self, record: &ResultRecord) -> OutputResult<()>;

    /// Flush buffered records
    fn flush(&self) -> OutputResult<()> {
        Ok(())
    }
}

/// Writes each record as a line to any `Write`
pub struct StreamSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StreamSink {
    /// Wrap a writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink writing to standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Sink writing to a newly created file
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path).map_err(|e| OutputError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl RecordSink for StreamSink {
    fn emit(&self, record: &ResultRecord) -> OutputResult<()> {
        let line = format!("{}\n", record);
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> OutputResult<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

/// Collects records in memory
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<ResultRecord>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records emitted so far
    pub fn records(&self) -> Vec<ResultRecord> {
        self.records.lock().clone()
    }

    /// Number of records emitted so far
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: &ResultRecord) -> OutputResult<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// The pair of channels shared by all workers
#[derive(Clone)]
pub struct ResultSink {
    output: Arc<dyn RecordSink>,
    errors: Arc<dyn RecordSink>,
}

impl ResultSink {
    /// Combine a success channel and an error channel
    pub fn new(output: Arc<dyn RecordSink>, errors: Arc<dyn RecordSink>) -> Self {
        Self { output, errors }
    }

    /// Results to stdout, failures to stderr
    pub fn stdio() -> Self {
        Self::new(Arc::new(StreamSink::stdout()), Arc::new(StreamSink::stderr()))
    }

    /// Write an accepted result to the success channel
    pub fn emit_result(&self, record: &ResultRecord) -> OutputResult<()> {
        self.output.emit(record)
    }

    /// Write a failure to the error channel
    pub fn emit_failure(&self, record: &ResultRecord) -> OutputResult<()> {
        self.errors.emit(record)
    }

    /// Flush both channels
    pub fn flush(&self) -> OutputResult<()> {
        self.output.flush()?;
        self.errors.flush()
    }
}
