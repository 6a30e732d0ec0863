//! The fallback front-matter extraction pipeline.

use crate::model::{Degradation, Extraction, FrontMatter, FrontMatterRecord, Line, PageWords, ZoneKind};

use super::cluster::LineClusterer;
use super::heuristics::fix_merged_text;
use super::options::ExtractOptions;
use super::patterns::PatternTable;
use super::sections::{abstract_text, keywords_text};
use super::zones::{PageLayout, ZoneLocator};

/// Extracts front matter from the words of a first page.
///
/// The extractor is stateless between pages and can be shared across
/// threads.
///
/// # Example
///
/// ```
/// use paperfront::{FrontMatterExtractor, PageWords, Word};
///
/// let page = PageWords::new(792.0, vec![
///     Word::new("A", 72.0, 82.0, 100.0, 18.0),
///     Word::new("Title", 90.0, 140.0, 100.0, 18.0),
/// ]);
/// let extraction = FrontMatterExtractor::new().extract(&page);
/// assert_eq!(extraction.front_matter.title, "A Title");
/// ```
#[derive(Debug, Clone)]
pub struct FrontMatterExtractor {
    options: ExtractOptions,
    patterns: &'static PatternTable,
}

impl FrontMatterExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            options,
            patterns: PatternTable::shared(),
        }
    }

    /// Extraction options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Rebuild the lines of a page.
    pub fn lines(&self, page: &PageWords) -> Vec<Line> {
        LineClusterer::from_options(&self.options).cluster(&page.words)
    }

    /// Rebuild lines and locate zones.
    pub fn layout(&self, page: &PageWords) -> PageLayout {
        ZoneLocator::new(&self.options, self.patterns).locate(self.lines(page), page.height)
    }

    /// Extract front matter from a page.
    ///
    /// Never fails: stages that find nothing fall back to empty values and
    /// record a [`Degradation`].
    pub fn extract(&self, page: &PageWords) -> Extraction {
        if page.is_empty() {
            log::debug!("page has no words");
            return Extraction::no_words();
        }

        let layout = self.layout(page);
        if layout.lines.is_empty() {
            log::debug!("page has no non-empty lines");
            return Extraction::no_words();
        }

        self.extract_from_layout(&layout)
    }

    /// Extract front matter and flatten it into a record for `filename`.
    pub fn extract_record(&self, filename: impl Into<String>, page: &PageWords) -> FrontMatterRecord {
        self.extract(page).to_record(filename)
    }

    /// Extract front matter from an already located layout.
    pub fn extract_from_layout(&self, layout: &PageLayout) -> Extraction {
        let mut degradations = layout.degradations.clone();

        let title = fix_merged_text(&layout.title_text(), self.patterns);

        let parser = layout.author_layout.parser(self.patterns);
        let resolved = parser.parse(
            layout.zone_lines(ZoneKind::Authors),
            layout.zone_lines(ZoneKind::Affiliations),
        );
        if resolved.authors.is_empty() {
            degradations.push(Degradation::NoAuthors);
        }
        if resolved.affiliations.is_empty() {
            degradations.push(Degradation::NoAffiliations);
        }

        let keywords = match layout.zone(ZoneKind::Keywords) {
            Some(_) => keywords_text(layout.zone_lines(ZoneKind::Keywords), self.patterns),
            None => {
                degradations.push(Degradation::KeywordsNotFound);
                String::new()
            }
        };
        let abstract_text = match layout.zone(ZoneKind::Abstract) {
            Some(_) => abstract_text(layout.zone_lines(ZoneKind::Abstract), self.patterns),
            None => {
                degradations.push(Degradation::AbstractNotFound);
                String::new()
            }
        };

        log::debug!(
            "extracted {} authors ({}), {} affiliations, degradations: {:?}",
            resolved.authors.len(),
            layout.author_layout,
            resolved.affiliations.len(),
            degradations
        );

        Extraction {
            front_matter: FrontMatter {
                title,
                authors: resolved.authors,
                affiliations: resolved.affiliations,
                keywords,
                abstract_text,
            },
            degradations,
        }
    }
}

impl Default for FrontMatterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Word;

    /// Lay out one line of text as words 6pt per char, 4pt apart.
    fn words(y: f32, text: &str, size: f32) -> Vec<Word> {
        let mut x = 72.0;
        text.split_whitespace()
            .map(|w| {
                let width = w.chars().count() as f32 * 6.0;
                let word = Word::new(w, x, x + width, y, size);
                x += width + 4.0;
                word
            })
            .collect()
    }

    fn page(lines: &[(f32, &str, f32)]) -> PageWords {
        let words = lines
            .iter()
            .flat_map(|(y, text, size)| words(*y, text, *size))
            .collect();
        PageWords::new(792.0, words)
    }

    #[test]
    fn test_extract_unmarked_page() {
        let page = page(&[
            (110.0, "Fallback Extraction of Front Matter", 16.0),
            (150.0, "Jane Doe, John Smith", 10.0),
            (162.0, "Department of Computer Science, MIT, USA", 9.0),
            (220.0, "Abstract", 9.0),
            (232.0, "We extract metadata from layout.", 9.0),
            (300.0, "Keywords: layout, metadata", 9.0),
            (340.0, "1. Introduction", 10.0),
        ]);
        let extraction = FrontMatterExtractor::new().extract(&page);
        let fm = &extraction.front_matter;

        assert_eq!(fm.title, "Fallback Extraction of Front Matter");
        assert_eq!(fm.authors.len(), 2);
        assert_eq!(fm.authors[1].name, "John Smith");
        assert_eq!(fm.affiliations.get("all"), Some("Department of Computer Science, MIT, USA"));
        assert_eq!(fm.abstract_text, "We extract metadata from layout.");
        assert_eq!(fm.keywords, "layout, metadata");
        assert!(!extraction.degraded(Degradation::NoAuthors));
        assert!(extraction.degraded(Degradation::HeaderCutoffDefaulted));
    }

    #[test]
    fn test_merged_title_is_split() {
        let page = page(&[
            (110.0, "DeepLayoutRecovery", 16.0),
            (150.0, "Jane Doe", 10.0),
        ]);
        let extraction = FrontMatterExtractor::new().extract(&page);
        assert_eq!(extraction.front_matter.title, "Deep Layout Recovery");
    }

    #[test]
    fn test_empty_page() {
        let extraction = FrontMatterExtractor::new().extract(&PageWords::new(792.0, Vec::new()));
        assert_eq!(extraction, Extraction::no_words());
    }

    #[test]
    fn test_missing_sections_degrade() {
        let page = page(&[(110.0, "Only a Title", 16.0)]);
        let extraction = FrontMatterExtractor::new().extract(&page);

        assert_eq!(extraction.front_matter.title, "Only a Title");
        assert!(extraction.degraded(Degradation::KeywordsNotFound));
        assert!(extraction.degraded(Degradation::AbstractNotFound));
        assert!(extraction.degraded(Degradation::NoAuthors));
        assert_eq!(extraction.front_matter.keywords, "");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let page = page(&[
            (110.0, "A Title", 16.0),
            (150.0, "Jane Doe", 10.0),
            (200.0, "Abstract", 9.0),
            (212.0, "Text.", 9.0),
        ]);
        let extractor = FrontMatterExtractor::new();
        assert_eq!(extractor.extract(&page), extractor.extract(&page));
    }
}
