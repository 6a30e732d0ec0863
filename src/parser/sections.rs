//! Keyword and abstract extraction by ordered anchor search.

use std::ops::Range;

use crate::model::Line;

use super::heuristics::collapse_whitespace;
use super::patterns::PatternTable;

/// Anchor found at the start of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Keywords,
    Abstract,
    Introduction,
}

/// Line indices of the first keywords, abstract and introduction anchors at
/// or after a start index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionAnchors {
    pub keywords: Option<usize>,
    pub abstract_header: Option<usize>,
    pub introduction: Option<usize>,
    len: usize,
}

impl SectionAnchors {
    /// Search `lines[from..]` for section anchors.
    ///
    /// A line that carries several anchors is attributed to the one that
    /// appears first in its text. An abstract header with nothing after it
    /// before the next section (`ARTICLE INFO ABSTRACT` banners) yields to
    /// a later abstract header.
    pub fn locate(lines: &[Line], from: usize, patterns: &PatternTable) -> Self {
        let mut anchors = Self {
            len: lines.len(),
            ..Self::default()
        };
        let mut abstract_candidates = Vec::new();

        for (i, line) in lines.iter().enumerate().skip(from) {
            let slot = match leading_anchor(&line.text, patterns) {
                Some(Anchor::Keywords) => &mut anchors.keywords,
                Some(Anchor::Abstract) => {
                    abstract_candidates.push(i);
                    continue;
                }
                Some(Anchor::Introduction) => &mut anchors.introduction,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(i);
            }
        }

        anchors.abstract_header = abstract_candidates
            .iter()
            .copied()
            .find(|&i| !anchors.is_hollow_abstract(lines, i, patterns))
            .or_else(|| abstract_candidates.first().copied());

        anchors
    }

    fn is_hollow_abstract(&self, lines: &[Line], start: usize, patterns: &PatternTable) -> bool {
        let text = &lines[start].text;
        let after_header = patterns
            .abstract_header_end(text)
            .map_or(text.as_str(), |end| strip_separator(&text[end..]));
        let next = start + 1;
        after_header.is_empty()
            && (next >= self.len
                || patterns.is_introduction(&lines[next].text)
                || patterns.is_keywords_header(&lines[next].text)
                || patterns.is_abstract_header(&lines[next].text))
    }

    /// Lines of the keywords section, header line included.
    ///
    /// Runs until the next line with an abstract or introduction anchor.
    pub fn keywords_span(&self, lines: &[Line], patterns: &PatternTable) -> Option<Range<usize>> {
        let start = self.keywords?;
        let end = self.next_matching(lines, start, |t| {
            patterns.is_abstract_header(t) || patterns.is_introduction(t)
        });
        Some(start..end)
    }

    /// Lines of the abstract section, header line included.
    ///
    /// Runs until the next line with an introduction or keywords header.
    /// Prose mentions of "keywords" do not count as a header.
    pub fn abstract_span(&self, lines: &[Line], patterns: &PatternTable) -> Option<Range<usize>> {
        let start = self.abstract_header?;
        let end = self.next_matching(lines, start, |t| {
            patterns.is_introduction(t) || patterns.is_keywords_header(t)
        });
        Some(start..end)
    }

    fn next_matching(&self, lines: &[Line], start: usize, stop: impl Fn(&str) -> bool) -> usize {
        lines
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, line)| stop(&line.text))
            .map(|(i, _)| i)
            .unwrap_or(self.len)
    }
}

/// The anchor whose match starts earliest in `text`.
pub fn leading_anchor(text: &str, patterns: &PatternTable) -> Option<Anchor> {
    let keywords = patterns.keywords_header.find(text).map(|m| m.start());
    let abstract_header = [&patterns.abstract_lead, &patterns.abstract_inline]
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min();
    let introduction = patterns.introduction.find(text).map(|m| m.start());

    [
        (keywords, Anchor::Keywords),
        (abstract_header, Anchor::Abstract),
        (introduction, Anchor::Introduction),
    ]
    .into_iter()
    .filter_map(|(pos, anchor)| pos.map(|p| (p, anchor)))
    .min_by_key(|(pos, _)| *pos)
    .map(|(_, anchor)| anchor)
}

/// Text of a keywords section whose first line holds the header.
pub fn keywords_text(span: &[Line], patterns: &PatternTable) -> String {
    section_text(span, |t| patterns.keywords_header_end(t))
}

/// Text of an abstract section whose first line holds the header.
pub fn abstract_text(span: &[Line], patterns: &PatternTable) -> String {
    section_text(span, |t| patterns.abstract_header_end(t))
}

fn section_text(span: &[Line], header_end: impl Fn(&str) -> Option<usize>) -> String {
    let Some((header, rest)) = span.split_first() else {
        return String::new();
    };

    let head = match header_end(&header.text) {
        Some(end) => strip_separator(&header.text[end..]),
        None => header.text.as_str(),
    };

    let mut parts = vec![head];
    parts.extend(rest.iter().map(|l| l.text.as_str()));
    collapse_whitespace(&parts.join(" "))
}

fn strip_separator(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '.' | '-' | '–' | '—'))
}

/// Keywords and abstract of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub keywords: String,
    pub abstract_text: String,
}

/// Standalone keyword/abstract extraction over a whole line sequence.
#[derive(Debug, Clone, Copy)]
pub struct SectionExtractor<'a> {
    patterns: &'a PatternTable,
}

impl<'a> SectionExtractor<'a> {
    /// Create an extractor using the given patterns.
    pub fn new(patterns: &'a PatternTable) -> Self {
        Self { patterns }
    }

    /// Extract keywords and abstract, searching from the first line.
    ///
    /// Missing anchors yield empty strings.
    pub fn extract(&self, lines: &[Line]) -> Sections {
        self.extract_from(lines, 0)
    }

    /// Extract keywords and abstract, searching from `from`.
    pub fn extract_from(&self, lines: &[Line], from: usize) -> Sections {
        let anchors = SectionAnchors::locate(lines, from, self.patterns);

        let keywords = anchors
            .keywords_span(lines, self.patterns)
            .map(|r| keywords_text(&lines[r], self.patterns))
            .unwrap_or_default();
        let abstract_text = anchors
            .abstract_span(lines, self.patterns)
            .map(|r| abstract_text(&lines[r], self.patterns))
            .unwrap_or_default();

        Sections {
            keywords,
            abstract_text,
        }
    }
}
