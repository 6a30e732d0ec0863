//! Parallel batch runner with a per-document timeout.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::stage_log::StageLog;
use crate::error::{Error, Result};
use crate::model::FrontMatterRecord;
use crate::parser::{ExtractOptions, FrontMatterExtractor};
use crate::render::{to_json, JsonFormat};
use crate::source::{PdfWordSource, WordSource};

/// Default stage log file name inside the output directory.
pub const DEFAULT_STAGE_LOG: &str = "fallback_errors.log";

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory the queued filenames are resolved against.
    pub pdf_dir: PathBuf,

    /// Directory JSON records are written to.
    pub out_dir: PathBuf,

    /// Stage log path.
    pub stage_log: PathBuf,

    /// Wall-clock budget per document.
    pub timeout: Duration,

    /// Worker count (0 = rayon default).
    pub parallelism: usize,

    /// JSON output format.
    pub json_format: JsonFormat,

    /// Options handed to the extractor.
    pub extract: ExtractOptions,
}

impl BatchOptions {
    /// Create options for a PDF directory and an output directory.
    pub fn new(pdf_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        let out_dir = out_dir.into();
        Self {
            pdf_dir: pdf_dir.into(),
            stage_log: out_dir.join(DEFAULT_STAGE_LOG),
            out_dir,
            timeout: Duration::from_secs(60),
            parallelism: 0,
            json_format: JsonFormat::Pretty,
            extract: ExtractOptions::default(),
        }
    }

    /// Write the stage log somewhere other than the output directory.
    pub fn with_stage_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.stage_log = path.into();
        self
    }

    /// Set the per-document timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of worker threads.
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers;
        self
    }

    /// Set the JSON output format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A record was written.
    Ok,
    /// The file is not in the PDF directory.
    Missing,
    /// Opening, extracting or writing failed.
    Failed(String),
    /// The document did not finish within the budget.
    TimedOut(Duration),
}

impl fmt::Display for BatchOutcome {
    /// The outcome column of the stage log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Ok => f.write_str("OK"),
            BatchOutcome::Missing => f.write_str("FILE_NOT_FOUND"),
            BatchOutcome::Failed(reason) => f.write_str(reason),
            BatchOutcome::TimedOut(budget) => write!(f, "TIMEOUT>{}s", budget.as_secs()),
        }
    }
}

/// Per-document report handed to the progress callback.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub filename: String,
    pub outcome: BatchOutcome,
    pub elapsed: Duration,
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ok: usize,
    pub errors: usize,
    pub timeouts: usize,
    pub missing: usize,
}

impl BatchSummary {
    /// Number of documents processed.
    pub fn total(&self) -> usize {
        self.ok + self.errors + self.timeouts + self.missing
    }

    fn count(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Ok => self.ok += 1,
            BatchOutcome::Missing => self.missing += 1,
            BatchOutcome::Failed(_) => self.errors += 1,
            BatchOutcome::TimedOut(_) => self.timeouts += 1,
        }
    }
}

/// Runs the fallback extractor over a queue of PDFs.
#[derive(Debug)]
pub struct BatchRunner {
    options: BatchOptions,
    extractor: Arc<FrontMatterExtractor>,
    log: StageLog,
}

impl BatchRunner {
    /// Prepare the output directory and open the stage log.
    pub fn new(options: BatchOptions) -> Result<Self> {
        fs::create_dir_all(&options.out_dir)?;
        let log = StageLog::open(&options.stage_log)?;
        let extractor = Arc::new(FrontMatterExtractor::with_options(options.extract.clone()));
        Ok(Self {
            options,
            extractor,
            log,
        })
    }

    /// Batch options in use.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process `files`, calling `on_done` as each document finishes.
    pub fn run<F>(&self, files: &[String], on_done: F) -> BatchSummary
    where
        F: Fn(&BatchReport) + Sync,
    {
        let process = |filename: &String| {
            let report = self.process(filename);
            if let Err(e) = self.log.record(&report.filename, report.elapsed, &report.outcome.to_string()) {
                log::warn!("cannot write stage log {}: {}", self.log.path().display(), e);
            }
            on_done(&report);
            report
        };

        let reports: Vec<BatchReport> = match self.options.parallelism {
            0 => files.par_iter().map(process).collect(),
            1 => files.iter().map(process).collect(),
            n => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| files.par_iter().map(process).collect()),
                Err(e) => {
                    log::warn!("cannot build a pool of {} workers, running sequentially: {}", n, e);
                    files.iter().map(process).collect()
                }
            },
        };

        let mut summary = BatchSummary::default();
        for report in &reports {
            summary.count(&report.outcome);
        }
        summary
    }

    /// Process one document.
    pub fn process(&self, filename: &str) -> BatchReport {
        let started = Instant::now();
        let path = self.options.pdf_dir.join(filename);

        let outcome = if !path.is_file() {
            BatchOutcome::Missing
        } else {
            match self.extract_with_timeout(filename, path) {
                Ok(Some(record)) => match self.write_record(filename, &record) {
                    Ok(()) => BatchOutcome::Ok,
                    Err(e) => BatchOutcome::Failed(e.to_string()),
                },
                Ok(None) => BatchOutcome::TimedOut(self.options.timeout),
                Err(e) => BatchOutcome::Failed(e.to_string()),
            }
        };

        if outcome != BatchOutcome::Ok {
            log::warn!("{}: {}", filename, outcome);
        }

        BatchReport {
            filename: filename.to_string(),
            outcome,
            elapsed: started.elapsed(),
        }
    }

    /// `Ok(None)` when the budget ran out. A timed-out worker is left to
    /// finish on its own and its result is dropped.
    fn extract_with_timeout(&self, filename: &str, path: PathBuf) -> Result<Option<FrontMatterRecord>> {
        let (tx, rx) = mpsc::channel();
        let extractor = Arc::clone(&self.extractor);
        let name = filename.to_string();

        thread::Builder::new()
            .name(format!("extract-{}", filename))
            .spawn(move || {
                let result = PdfWordSource::open(&path)
                    .and_then(|source| source.first_page_words())
                    .map(|page| extractor.extract_record(name, &page));
                let _ = tx.send(result);
            })?;

        match rx.recv_timeout(self.options.timeout) {
            Ok(result) => result.map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Other(format!(
                "extraction of {} panicked",
                filename
            ))),
        }
    }

    fn write_record(&self, filename: &str, record: &FrontMatterRecord) -> Result<()> {
        let json = to_json(record, self.options.json_format)?;
        fs::write(record_path(&self.options.out_dir, filename), json)?;
        Ok(())
    }
}

/// `<out_dir>/<stem>.json` for a queued filename.
pub fn record_path(out_dir: &Path, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    out_dir.join(format!("{}.json", stem))
}
