//! Result output
//!
//! Records are written to two independent channels:
//! - success: results whose status is in the accepted set (stdout or a file)
//! - errors: probes that failed before a response arrived (stderr)

pub mod record;
pub mod sink;

pub use record::{ResultRecord, FAILURE_STATUS};
pub use sink::{MemorySink, RecordSink, ResultSink, StreamSink};
