//! Semantic zones of a first page.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Kind of a zone, without its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Header,
    Title,
    Authors,
    Affiliations,
    Keywords,
    Abstract,
    Body,
}

impl ZoneKind {
    /// Lowercase label used in debug output.
    pub fn label(&self) -> &'static str {
        match self {
            ZoneKind::Header => "header",
            ZoneKind::Title => "title",
            ZoneKind::Authors => "authors",
            ZoneKind::Affiliations => "affiliations",
            ZoneKind::Keywords => "keywords",
            ZoneKind::Abstract => "abstract",
            ZoneKind::Body => "body",
        }
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A labelled span of lines.
///
/// Ranges index into the banner-free line sequence of a
/// [`PageLayout`](crate::parser::PageLayout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Zone {
    /// Non-banner lines above the header cutoff
    Header { lines: Range<usize> },
    /// Title block; only lines at or above `min_size` belong to the title
    Title { lines: Range<usize>, min_size: f32 },
    /// Author lines
    Authors { lines: Range<usize> },
    /// Affiliation lines
    Affiliations { lines: Range<usize> },
    /// Keywords span, header line included
    Keywords { lines: Range<usize> },
    /// Abstract span, header line included
    Abstract { lines: Range<usize> },
    /// Start of the article body
    Body { lines: Range<usize> },
}

impl Zone {
    /// The zone's kind.
    pub fn kind(&self) -> ZoneKind {
        match self {
            Zone::Header { .. } => ZoneKind::Header,
            Zone::Title { .. } => ZoneKind::Title,
            Zone::Authors { .. } => ZoneKind::Authors,
            Zone::Affiliations { .. } => ZoneKind::Affiliations,
            Zone::Keywords { .. } => ZoneKind::Keywords,
            Zone::Abstract { .. } => ZoneKind::Abstract,
            Zone::Body { .. } => ZoneKind::Body,
        }
    }

    /// The zone's line range.
    pub fn lines(&self) -> Range<usize> {
        match self {
            Zone::Header { lines }
            | Zone::Title { lines, .. }
            | Zone::Authors { lines }
            | Zone::Affiliations { lines }
            | Zone::Keywords { lines }
            | Zone::Abstract { lines }
            | Zone::Body { lines } => lines.clone(),
        }
    }

    /// Check if the zone covers no lines.
    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Check if two zones share a line.
    pub fn overlaps(&self, other: &Zone) -> bool {
        let (a, b) = (self.lines(), other.lines());
        !a.is_empty() && !b.is_empty() && a.start < b.end && b.start < a.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_kind_and_range() {
        let zone = Zone::Title {
            lines: 1..3,
            min_size: 16.5,
        };
        assert_eq!(zone.kind(), ZoneKind::Title);
        assert_eq!(zone.lines(), 1..3);
        assert!(!zone.is_empty());
        assert_eq!(zone.kind().to_string(), "title");
    }

    #[test]
    fn test_zone_overlap() {
        let a = Zone::Authors { lines: 2..4 };
        let b = Zone::Affiliations { lines: 4..6 };
        let c = Zone::Keywords { lines: 5..7 };
        assert!(!a.overlaps(&b));
        assert!(b.overlaps(&c));
        assert!(!Zone::Body { lines: 3..3 }.overlaps(&a));
    }
}
