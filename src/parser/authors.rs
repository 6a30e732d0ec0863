//! Author and affiliation resolution.
//!
//! The author/affiliation zone is read by one of two parsers: a marker-based
//! one for layouts where authors carry superscript keys into an affiliation
//! list, and a heuristic one for layouts without markers.

use std::collections::BTreeMap;

use crate::model::{join_text, AffiliationMap, Author, Line};

use super::heuristics::{collapse_whitespace, fix_merged_text, is_likely_affiliation, normalize_marker};
use super::patterns::PatternTable;

/// How the author zone cross-references affiliations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorLayout {
    /// Authors carry markers that key an affiliation list
    Marked,
    /// No markers; affiliations follow the names
    #[default]
    Unmarked,
}

impl AuthorLayout {
    /// Find where affiliations start and which layout the zone uses.
    ///
    /// Returns the index of the first affiliation line, if any. Stop anchors
    /// are honoured on every line; marker and cue lines only from the second
    /// line on, so the zone always keeps at least one author line.
    pub fn classify(lines: &[Line], patterns: &PatternTable) -> (AuthorLayout, Option<usize>) {
        for (i, line) in lines.iter().enumerate() {
            let text = line.text.as_str();
            if patterns.is_stop_line(text) {
                return (AuthorLayout::Unmarked, Some(i));
            }
            if i == 0 {
                continue;
            }
            if patterns.marker_line.is_match(text) {
                return (AuthorLayout::Marked, Some(i));
            }
            if patterns.affiliation_cues.is_match(text) {
                return (AuthorLayout::Unmarked, Some(i));
            }
        }
        (AuthorLayout::Unmarked, None)
    }

    /// The parser for this layout.
    pub fn parser<'a>(&self, patterns: &'a PatternTable) -> Box<dyn AuthorZoneParser + 'a> {
        match self {
            AuthorLayout::Marked => Box::new(MarkerParser::new(patterns)),
            AuthorLayout::Unmarked => Box::new(UnmarkedParser::new(patterns)),
        }
    }
}

impl std::fmt::Display for AuthorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorLayout::Marked => f.write_str("marked"),
            AuthorLayout::Unmarked => f.write_str("unmarked"),
        }
    }
}

/// Authors and affiliations read from one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAuthors {
    pub authors: Vec<Author>,
    pub affiliations: AffiliationMap,
}

/// Converts the author/affiliation zone into structured records.
pub trait AuthorZoneParser {
    /// Parse author lines and the affiliation lines that follow them.
    fn parse(&self, authors: &[Line], affiliations: &[Line]) -> ResolvedAuthors;
}

/// Atom of an author line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorToken {
    /// Part of a name
    Word(String),
    /// Affiliation key, superscript digits already normalized
    Marker(String),
    Comma,
    Period,
    /// Corresponding-author asterisk
    Asterisk,
    /// "and" / "&"
    And,
}

/// Classify one raw token.
pub fn classify_token(token: &str) -> AuthorToken {
    match token {
        "," => return AuthorToken::Comma,
        "." => return AuthorToken::Period,
        "*" | "∗" | "⁎" => return AuthorToken::Asterisk,
        "and" | "&" => return AuthorToken::And,
        _ => {}
    }

    let normalized = normalize_marker(token);
    let mut chars = token.chars();
    let single_lower = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_lowercase());

    if single_lower || (!normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit())) {
        AuthorToken::Marker(normalized)
    } else {
        AuthorToken::Word(token.to_string())
    }
}

/// Split author text into tokens.
pub fn tokenize(text: &str, patterns: &PatternTable) -> Vec<AuthorToken> {
    patterns
        .author_token
        .find_iter(text)
        .map(|m| classify_token(m.as_str()))
        .collect()
}

#[derive(Default)]
struct Pending {
    parts: Vec<String>,
    markers: Vec<String>,
    corresponding: bool,
}

/// Fold tokens into authors.
///
/// Separators close the current author. Markers and asterisks that arrive
/// before the next author's first name part belong to the author just
/// closed.
pub fn resolve_tokens<I>(tokens: I, patterns: &PatternTable) -> Vec<Author>
where
    I: IntoIterator<Item = AuthorToken>,
{
    let mut authors: Vec<Author> = Vec::new();
    let mut pending = Pending::default();

    for token in tokens {
        match token {
            AuthorToken::Word(word) => pending.parts.push(word),
            AuthorToken::Period => {
                if let Some(last) = pending.parts.last_mut() {
                    last.push('.');
                }
            }
            AuthorToken::Marker(marker) => match authors.last_mut() {
                Some(prev) if pending.parts.is_empty() => add_marker(prev, marker),
                _ => pending.markers.push(marker),
            },
            AuthorToken::Asterisk => match authors.last_mut() {
                Some(prev) if pending.parts.is_empty() => prev.corresponding = true,
                _ => pending.corresponding = true,
            },
            AuthorToken::Comma | AuthorToken::And => {
                finalize(std::mem::take(&mut pending), &mut authors, patterns)
            }
        }
    }
    finalize(pending, &mut authors, patterns);

    authors
}

fn finalize(pending: Pending, authors: &mut Vec<Author>, patterns: &PatternTable) {
    if pending.parts.is_empty() {
        return;
    }
    let name = fix_merged_text(&pending.parts.join(" "), patterns);
    if name.is_empty() || is_likely_affiliation(&name, patterns) {
        return;
    }

    let mut author = Author::new(name).with_markers(pending.markers);
    author.corresponding = pending.corresponding;
    authors.push(author);
}

fn add_marker(author: &mut Author, marker: String) {
    if !author.markers.contains(&marker) {
        author.markers.push(marker);
        author.markers.sort();
    }
}

/// Read `key text` affiliation entries until the first stop anchor.
///
/// Lines without a key continue the latest entry; lines before the first
/// key are dropped.
pub fn parse_keyed_affiliations(lines: &[Line], patterns: &PatternTable) -> BTreeMap<String, String> {
    let mut entries: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in lines {
        let text = line.text.trim();
        if patterns.is_stop_line(text) {
            break;
        }

        let captures = patterns
            .affiliation_entry_tight
            .captures(text)
            .or_else(|| patterns.affiliation_entry_spaced.captures(text));

        let (key, body) = match captures {
            Some(caps) => (normalize_marker(&caps[1]), caps[2].to_string()),
            None => match &current {
                Some(key) => (key.clone(), text.to_string()),
                None => continue,
            },
        };

        let entry = entries.entry(key.clone()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(&body);
        current = Some(key);
    }

    entries
        .into_iter()
        .map(|(k, v)| (k, fix_merged_text(&collapse_whitespace(&v), patterns)))
        .collect()
}

/// Split unmarked author text into authors and affiliation text.
///
/// The text is cut at the first affiliation cue. Glued words in the author
/// part are repaired before it is split into names. Fragments that still look
/// like affiliations, before or after their own repair, move to the
/// affiliation side.
pub fn split_unmarked(text: &str, patterns: &PatternTable) -> (Vec<Author>, String) {
    let cut = patterns
        .affiliation_cues
        .find(text)
        .or_else(|| patterns.affiliation_cues_merged.find(text))
        .map(|m| m.start())
        .unwrap_or(text.len());
    let (author_part, affiliation_part) = text.split_at(cut);
    let author_part = fix_merged_text(author_part.trim(), patterns);

    let mut authors = Vec::new();
    let mut moved: Vec<String> = Vec::new();

    for fragment in patterns.author_separator.split(&author_part) {
        let fragment = fragment.trim();
        if fragment.is_empty() || fragment.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if is_likely_affiliation(fragment, patterns) {
            moved.push(fragment.to_string());
            continue;
        }

        let corresponding = patterns.corresponding_mark.is_match(fragment);
        let name = patterns.corresponding_mark.replace_all(fragment, "");
        let name = fix_merged_text(&collapse_whitespace(&name), patterns);
        if name.is_empty() {
            continue;
        }
        if is_likely_affiliation(&name, patterns) {
            moved.push(name);
            continue;
        }

        let mut author = Author::new(name);
        author.corresponding = corresponding;
        authors.push(author);
    }

    let mut affiliation = moved.join(", ");
    if !affiliation_part.trim().is_empty() {
        if !affiliation.is_empty() {
            affiliation.push_str(", ");
        }
        affiliation.push_str(affiliation_part.trim());
    }

    (authors, affiliation)
}

/// Parser for layouts with affiliation markers.
#[derive(Debug, Clone, Copy)]
pub struct MarkerParser<'a> {
    patterns: &'a PatternTable,
}

impl<'a> MarkerParser<'a> {
    pub fn new(patterns: &'a PatternTable) -> Self {
        Self { patterns }
    }
}

impl AuthorZoneParser for MarkerParser<'_> {
    fn parse(&self, authors: &[Line], affiliations: &[Line]) -> ResolvedAuthors {
        let tokens = tokenize(&join_text(authors), self.patterns);
        ResolvedAuthors {
            authors: resolve_tokens(tokens, self.patterns),
            affiliations: AffiliationMap::Keyed(parse_keyed_affiliations(affiliations, self.patterns)),
        }
    }
}

/// Parser for layouts without markers.
#[derive(Debug, Clone, Copy)]
pub struct UnmarkedParser<'a> {
    patterns: &'a PatternTable,
}

impl<'a> UnmarkedParser<'a> {
    pub fn new(patterns: &'a PatternTable) -> Self {
        Self { patterns }
    }
}

impl AuthorZoneParser for UnmarkedParser<'_> {
    fn parse(&self, authors: &[Line], affiliations: &[Line]) -> ResolvedAuthors {
        let (authors, extracted) = split_unmarked(&join_text(authors), self.patterns);

        let text = collapse_whitespace(&format!("{} {}", extracted, join_text(affiliations)));
        let text = fix_merged_text(&text, self.patterns);
        let affiliations = if self.patterns.is_article_info(&text) || self.patterns.is_abstract_header(&text) {
            AffiliationMap::default()
        } else {
            AffiliationMap::unkeyed(text)
        };

        ResolvedAuthors {
            authors,
            affiliations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> &'static PatternTable {
        PatternTable::shared()
    }

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Line::new(200.0 + i as f32 * 11.0, *t, 10.0))
            .collect()
    }

    #[test]
    fn test_resolve_marker_tokens() {
        let tokens = ["Jane", "Doe", ",", "1", "John", "Smith", ",", "2", "∗"]
            .iter()
            .map(|t| classify_token(t));
        let authors = resolve_tokens(tokens, p());

        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Jane Doe");
        assert_eq!(authors[0].markers, vec!["1"]);
        assert!(!authors[0].corresponding);
        assert_eq!(authors[1].name, "John Smith");
        assert_eq!(authors[1].markers, vec!["2"]);
        assert!(authors[1].corresponding);
    }

    #[test]
    fn test_tokenize_inline_markers() {
        let authors = resolve_tokens(tokenize("Jane Doe a,∗, J. R. Smith b and Li Wei a,b", p()), p());

        assert_eq!(authors.len(), 3);
        assert_eq!(authors[0], Author::new("Jane Doe").with_markers(["a"]).corresponding());
        assert_eq!(authors[1], Author::new("J. R. Smith").with_markers(["b"]));
        assert_eq!(authors[2], Author::new("Li Wei").with_markers(["a", "b"]));
    }

    #[test]
    fn test_superscript_markers() {
        let authors = resolve_tokens(tokenize("Jane Doe¹², John O’Neil-Smith³*", p()), p());

        assert_eq!(authors[0].markers, vec!["1", "2"]);
        assert_eq!(authors[1].name, "John O’Neil-Smith");
        assert_eq!(authors[1].markers, vec!["3"]);
        assert!(authors[1].corresponding);
    }

    #[test]
    fn test_affiliation_like_names_dropped() {
        let authors = resolve_tokens(tokenize("Jane Doe 1, University of Oslo", p()), p());
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Jane Doe");
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token("a"), AuthorToken::Marker("a".into()));
        assert_eq!(classify_token("12"), AuthorToken::Marker("12".into()));
        assert_eq!(classify_token("²"), AuthorToken::Marker("2".into()));
        assert_eq!(classify_token("A"), AuthorToken::Word("A".into()));
        assert_eq!(classify_token("and"), AuthorToken::And);
        assert_eq!(classify_token("⁎"), AuthorToken::Asterisk);
    }

    #[test]
    fn test_keyed_affiliations() {
        let zone = lines(&[
            "a Department of Physics, University of Oslo,",
            "Oslo, Norway",
            "bSchool of Computing, National University of Singapore",
            "¹ MIT, USA",
            "Article history:",
            "c Should not appear",
        ]);
        let map = parse_keyed_affiliations(&zone, p());

        assert_eq!(map.len(), 3);
        assert_eq!(map["a"], "Department of Physics, University of Oslo, Oslo, Norway");
        assert_eq!(map["b"], "School of Computing, National University of Singapore");
        assert_eq!(map["1"], "MIT, USA");
    }

    #[test]
    fn test_split_unmarked() {
        let (authors, affiliation) = split_unmarked(
            "Jane Doe, John Smith, Department of Computer Science, MIT, USA",
            p(),
        );

        assert_eq!(authors, vec![Author::new("Jane Doe"), Author::new("John Smith")]);
        assert_eq!(affiliation, "Department of Computer Science, MIT, USA");
    }

    #[test]
    fn test_split_unmarked_moves_fragments() {
        let (authors, affiliation) = split_unmarked("Jane Doe*, John Smith and Ana Lima, 600036, Chennai 600036", p());

        assert_eq!(authors.len(), 3);
        assert!(authors[0].corresponding);
        assert_eq!(authors[0].name, "Jane Doe");
        assert_eq!(authors[2].name, "Ana Lima");
        assert_eq!(affiliation, "Chennai 600036");
    }

    #[test]
    fn test_split_unmarked_repairs_glued_names() {
        let (authors, affiliation) = split_unmarked("JaneDoe, JohnSmith", p());

        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "John Smith"]);
        assert_eq!(affiliation, "");
    }

    #[test]
    fn test_split_unmarked_rechecks_repaired_fragment() {
        let (authors, affiliation) = split_unmarked("Jane Doe, ParisFrance", p());

        assert_eq!(authors, vec![Author::new("Jane Doe")]);
        assert_eq!(affiliation, "Paris France");
    }

    #[test]
    fn test_classify_marked() {
        let zone = lines(&["Jane Doe a, John Smith b", "a Department of Physics", "b MIT"]);
        assert_eq!(AuthorLayout::classify(&zone, p()), (AuthorLayout::Marked, Some(1)));
    }

    #[test]
    fn test_classify_unmarked() {
        let zone = lines(&["Jane Doe, John Smith", "Department of Physics, MIT"]);
        assert_eq!(AuthorLayout::classify(&zone, p()), (AuthorLayout::Unmarked, Some(1)));

        let zone = lines(&["Jane Doe", "Keywords: a, b"]);
        assert_eq!(AuthorLayout::classify(&zone, p()), (AuthorLayout::Unmarked, Some(1)));

        let zone = lines(&["Jane Doe", "John Smith"]);
        assert_eq!(AuthorLayout::classify(&zone, p()), (AuthorLayout::Unmarked, None));
    }

    #[test]
    fn test_marker_parser() {
        let resolved = MarkerParser::new(p()).parse(
            &lines(&["Jane Doe a,∗, John Smith b"]),
            &lines(&["a Dept. of Physics", "b MIT, USA"]),
        );

        assert_eq!(resolved.authors.len(), 2);
        assert_eq!(resolved.affiliations.get("a"), Some("Dept. of Physics"));
        assert_eq!(resolved.affiliations.get("b"), Some("MIT, USA"));
    }

    #[test]
    fn test_unmarked_parser() {
        let resolved = UnmarkedParser::new(p()).parse(
            &lines(&["Jane Doe, John Smith"]),
            &lines(&["Department of Physics,", "University of Oslo"]),
        );

        assert_eq!(resolved.authors.len(), 2);
        assert_eq!(
            resolved.affiliations,
            AffiliationMap::Unkeyed("Department of Physics, University of Oslo".into())
        );
    }

    #[test]
    fn test_unmarked_parser_rejects_anchor_text() {
        let resolved = UnmarkedParser::new(p()).parse(&lines(&["Jane Doe"]), &lines(&["ARTICLE INFO"]));
        assert!(resolved.affiliations.is_empty());
    }

    #[test]
    fn test_parser_for_layout() {
        let parser = AuthorLayout::Unmarked.parser(p());
        let resolved = parser.parse(&lines(&["Jane Doe"]), &[]);
        assert_eq!(resolved.authors, vec![Author::new("Jane Doe")]);
        assert!(resolved.affiliations.is_empty());
    }
}
