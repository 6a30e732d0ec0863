//! Append-only stage log shared by batch workers.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::Result;

/// Timestamp format of log entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Tab-separated `timestamp filename elapsed outcome` log.
#[derive(Debug)]
pub struct StageLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl StageLog {
    /// Open a log for appending, creating it and its directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    pub fn record(&self, filename: &str, elapsed: Duration, outcome: &str) -> Result<()> {
        let entry = format_entry(Local::now(), filename, elapsed, outcome);
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(entry.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

fn format_entry(at: DateTime<Local>, filename: &str, elapsed: Duration, outcome: &str) -> String {
    format!(
        "{}\t{}\t{:.2}\t{}\n",
        at.format(TIMESTAMP_FORMAT),
        single_field(filename),
        elapsed.as_secs_f64(),
        single_field(outcome)
    )
}

/// Keep a value on one line and in one column.
fn single_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_entry() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let entry = format_entry(at, "a.pdf", Duration::from_millis(1500), "bad\tthing\n");
        assert_eq!(entry, "2024-03-05T14:07:09\ta.pdf\t1.50\tbad thing \n");
    }

    #[test]
    fn test_record_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("stage.log");

        let log = StageLog::open(&path).unwrap();
        log.record("a.pdf", Duration::from_secs(1), "OK").unwrap();
        log.record("b.pdf", Duration::from_secs(2), "FILE_NOT_FOUND").unwrap();
        drop(log);
        StageLog::open(&path)
            .unwrap()
            .record("c.pdf", Duration::ZERO, "OK")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("\ta.pdf\t1.00\tOK"));
        assert!(lines[1].ends_with("\tb.pdf\t2.00\tFILE_NOT_FOUND"));
        assert_eq!(lines[2].split('\t').count(), 4);
    }
}
