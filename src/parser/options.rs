//! Extraction options and configuration.

/// Tunables for the layout heuristics.
///
/// Distances are in PDF points, fractions are of the page height.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Vertical tolerance for putting two words on the same line
    pub y_tolerance: f32,

    /// Horizontal gap above which a space is inserted between words
    pub x_tolerance: f32,

    /// Fraction of the page searched for header banners
    pub header_band: f32,

    /// Margin added below the lowest banner
    pub header_margin: f32,

    /// Header cutoff used when no banner is found
    pub default_header_fraction: f32,

    /// Metadata bound used when no "article info"/"abstract" line is found
    pub default_metadata_fraction: f32,

    /// Title candidates must sit above this fraction of the page
    pub title_search_fraction: f32,

    /// Lines within this many points of the largest font are title lines
    pub title_size_slack: f32,

    /// Maximum vertical gap between consecutive title lines
    pub title_line_gap: f32,

    /// Gap between the title's last line and the author zone
    pub author_zone_gap: f32,

    /// Lines taken as authors when no split line is found
    pub default_author_lines: usize,

    /// Journal names whose running headers should be treated as banners
    pub journal_names: Vec<String>,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line clustering tolerances.
    pub fn with_tolerances(mut self, y_tolerance: f32, x_tolerance: f32) -> Self {
        self.y_tolerance = y_tolerance;
        self.x_tolerance = x_tolerance;
        self
    }

    /// Set the header banner search band and margin.
    pub fn with_header_band(mut self, band: f32, margin: f32) -> Self {
        self.header_band = band;
        self.header_margin = margin;
        self
    }

    /// Set the fallback fractions for the header cutoff and metadata bound.
    pub fn with_default_fractions(mut self, header: f32, metadata: f32) -> Self {
        self.default_header_fraction = header;
        self.default_metadata_fraction = metadata;
        self
    }

    /// Set the title search limit.
    pub fn with_title_search_fraction(mut self, fraction: f32) -> Self {
        self.title_search_fraction = fraction;
        self
    }

    /// Set how title lines are selected and merged.
    pub fn with_title_rules(mut self, size_slack: f32, line_gap: f32) -> Self {
        self.title_size_slack = size_slack;
        self.title_line_gap = line_gap;
        self
    }

    /// Set how many lines become authors when no split is found.
    pub fn with_default_author_lines(mut self, lines: usize) -> Self {
        self.default_author_lines = lines;
        self
    }

    /// Add a journal name for banner detection.
    pub fn with_journal(mut self, name: impl Into<String>) -> Self {
        self.journal_names.push(name.into());
        self
    }

    /// Replace the journal names used for banner detection.
    pub fn with_journals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.journal_names = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            y_tolerance: 3.0,
            x_tolerance: 3.0,
            header_band: 0.35,
            header_margin: 5.0,
            default_header_fraction: 0.10,
            default_metadata_fraction: 0.62,
            title_search_fraction: 0.45,
            title_size_slack: 1.5,
            title_line_gap: 20.0,
            author_zone_gap: 5.0,
            default_author_lines: 2,
            journal_names: vec!["Journal of Computational Science".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_tolerances(2.0, 1.5)
            .with_title_rules(2.0, 25.0)
            .with_default_author_lines(3)
            .with_journal("Computers & Graphics");

        assert_eq!(options.y_tolerance, 2.0);
        assert_eq!(options.x_tolerance, 1.5);
        assert_eq!(options.title_size_slack, 2.0);
        assert_eq!(options.title_line_gap, 25.0);
        assert_eq!(options.default_author_lines, 3);
        assert_eq!(options.journal_names.len(), 2);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.y_tolerance, 3.0);
        assert_eq!(options.default_header_fraction, 0.10);
        assert_eq!(options.default_metadata_fraction, 0.62);
        assert_eq!(options.default_author_lines, 2);
    }

    #[test]
    fn test_with_journals_replaces() {
        let options = ExtractOptions::new().with_journals(["Physica A"]);
        assert_eq!(options.journal_names, vec!["Physica A".to_string()]);
    }
}
