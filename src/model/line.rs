//! Logical text lines rebuilt from positioned words.

use serde::{Deserialize, Serialize};

/// A line of co-linear words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Representative vertical position (top of the first word seen)
    pub y: f32,
    /// Text with collapsed whitespace
    pub text: String,
    /// Largest font size among the line's words
    pub max_size: f32,
}

impl Line {
    /// Create a new line.
    pub fn new(y: f32, text: impl Into<String>, max_size: f32) -> Self {
        Self {
            y,
            text: text.into(),
            max_size,
        }
    }
}

/// Join the text of several lines with single spaces.
pub(crate) fn join_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| l.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
