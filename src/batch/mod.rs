//! Batch orchestration around the extractor.
//!
//! A previous stage's error log yields the queue, each document is extracted
//! under a timeout, records land as JSON files and every outcome is appended
//! to the stage log.

mod queue;
mod runner;
mod stage_log;

pub use queue::{load_timeout_queue, parse_timeout_queue, DEFAULT_TIMEOUT_MARKER};
pub use runner::{
    record_path, BatchOptions, BatchOutcome, BatchReport, BatchRunner, BatchSummary, DEFAULT_STAGE_LOG,
};
pub use stage_log::{StageLog, TIMESTAMP_FORMAT};
