//! Positioned words as produced by a text-extraction backend.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A positioned token on a page.
///
/// Coordinates follow the top-down convention used by pdfplumber: `top`
/// grows towards the bottom of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Rendered text
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge, measured from the top of the page
    pub top: f32,
    /// Font size in points
    #[serde(default)]
    pub size: f32,
}

impl Word {
    /// Create a new word.
    pub fn new(text: impl Into<String>, x0: f32, x1: f32, top: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            size,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// All words of one page together with its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageWords {
    /// Page width in points
    #[serde(default = "default_width")]
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Words on the page, in extraction order
    pub words: Vec<Word>,
}

fn default_width() -> f32 {
    612.0
}

impl PageWords {
    /// Create a page with the given height and words.
    pub fn new(height: f32, words: Vec<Word>) -> Self {
        Self {
            width: default_width(),
            height,
            words,
        }
    }

    /// Set the page width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Check if the page has any words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Parse a word dump.
    ///
    /// Accepts either `{"height": .., "words": [..]}` or a bare array of
    /// words, in which case the height is taken as the lowest word bottom
    /// rounded up to a Letter page.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Dump {
            Page(PageWords),
            Bare(Vec<Word>),
        }

        Ok(match serde_json::from_str::<Dump>(json)? {
            Dump::Page(page) => page,
            Dump::Bare(words) => {
                let lowest = words
                    .iter()
                    .map(|w| w.top + w.size)
                    .fold(0.0_f32, f32::max);
                PageWords::new(lowest.max(792.0), words)
            }
        })
    }

    /// Read a word dump from disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
