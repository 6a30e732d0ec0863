//! Work queue derived from a previous stage's error log.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Outcome marker the previous stage writes for documents it gave up on.
pub const DEFAULT_TIMEOUT_MARKER: &str = "TIMEOUT>90s";

/// Read the filenames that timed out in a previous stage.
///
/// Lines are tab-separated with the filename in the second column. Only
/// lines containing `marker` and naming a `.pdf` are kept, de-duplicated in
/// first-seen order.
pub fn load_timeout_queue<P: AsRef<Path>>(path: P, marker: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::MissingErrorLog(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let queue = parse_timeout_queue(&String::from_utf8_lossy(&bytes), marker);
    log::debug!("{} queued from {}", queue.len(), path.display());
    Ok(queue)
}

/// Parse error-log text into a work queue.
pub fn parse_timeout_queue(content: &str, marker: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut queue = Vec::new();

    for line in content.lines().filter(|l| l.contains(marker)) {
        let Some(name) = line.split('\t').nth(1).map(str::trim) else {
            continue;
        };
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            continue;
        }
        if seen.insert(name) {
            queue.push(name.to_string());
        }
    }

    queue
}
