//! Word-to-line clustering.

use crate::model::{Line, Word};

use super::heuristics::normalize_line_text;
use super::options::ExtractOptions;

/// Groups positioned words into logical text lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineClusterer {
    y_tolerance: f32,
    x_tolerance: f32,
}

struct Bucket<'a> {
    y: f32,
    words: Vec<&'a Word>,
}

impl LineClusterer {
    /// Create a clusterer with explicit tolerances.
    pub fn new(y_tolerance: f32, x_tolerance: f32) -> Self {
        Self {
            y_tolerance,
            x_tolerance,
        }
    }

    /// Create a clusterer from extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self::new(options.y_tolerance, options.x_tolerance)
    }

    /// Cluster words into lines sorted top to bottom.
    ///
    /// Each word joins the first bucket whose representative `y` (the top of
    /// the bucket's first word) is within the vertical tolerance. Buckets
    /// whose text normalizes to nothing are dropped.
    pub fn cluster(&self, words: &[Word]) -> Vec<Line> {
        let mut buckets: Vec<Bucket<'_>> = Vec::new();

        for word in words {
            match buckets
                .iter_mut()
                .find(|b| (b.y - word.top).abs() <= self.y_tolerance)
            {
                Some(bucket) => bucket.words.push(word),
                None => buckets.push(Bucket {
                    y: word.top,
                    words: vec![word],
                }),
            }
        }

        let mut lines: Vec<Line> = buckets
            .into_iter()
            .filter_map(|bucket| self.build_line(bucket))
            .collect();

        lines.sort_by(|a, b| a.y.total_cmp(&b.y));
        lines
    }

    fn build_line(&self, mut bucket: Bucket<'_>) -> Option<Line> {
        bucket.words.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let mut raw = String::new();
        let mut prev_x1: Option<f32> = None;
        let mut max_size = 0.0f32;

        for word in &bucket.words {
            if let Some(x1) = prev_x1 {
                if word.x0 - x1 > self.x_tolerance {
                    raw.push(' ');
                }
            }
            raw.push_str(&word.text);
            prev_x1 = Some(word.x1);
            max_size = max_size.max(word.size);
        }

        let text = normalize_line_text(&raw);
        if text.is_empty() {
            return None;
        }

        Some(Line::new(bucket.y, text, max_size))
    }
}

impl Default for LineClusterer {
    fn default() -> Self {
        Self::from_options(&ExtractOptions::default())
    }
}
