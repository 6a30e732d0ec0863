//! Compiled regular expressions shared by every extraction stage.
//!
//! The table is built once per process and never mutated; components borrow
//! it instead of reaching for module-level statics of their own.

use once_cell::sync::Lazy;
use regex::Regex;

static SHARED: Lazy<PatternTable> = Lazy::new(PatternTable::compile);

/// Read-only table of the anchors and cues used by the layout heuristics.
#[derive(Debug)]
pub struct PatternTable {
    /// "Article info" header, tolerant of spaced-out letters
    pub article_info: Regex,
    /// "Abstract" at the start of a line, any case
    pub abstract_lead: Regex,
    /// "ABSTRACT" or "a b s t r a c t" anywhere in a line
    pub abstract_inline: Regex,
    /// "Keywords", "Key words" or "Index Terms" header; mid-line only when
    /// uppercase or followed by a separator
    pub keywords_header: Regex,
    /// "Introduction" heading; mid-line only when numbered or uppercase
    pub introduction: Regex,
    /// Other front-matter anchors that end the author/affiliation zone
    pub stop_terms: Regex,
    /// Affiliation cues as whole words
    pub affiliation_cues: Regex,
    /// Affiliation cues inside words glued together by the extractor
    pub affiliation_cues_merged: Regex,
    /// Institution acronyms, case-sensitive
    pub institution_acronyms: Regex,
    /// Postal codes
    pub postal_code: Regex,
    /// Country names
    pub country: Regex,
    /// Line starting with a marker directly or loosely followed by a capital
    pub marker_line: Regex,
    /// `a Department of ...` / `1 School of ...`
    pub affiliation_entry_spaced: Regex,
    /// `aDepartment of ...`
    pub affiliation_entry_tight: Regex,
    /// Atoms of an author line
    pub author_token: Regex,
    /// Lowercase letter directly followed by an uppercase one
    pub camel_case: Regex,
    /// Short function word glued to a capitalized word
    pub glued_article: Regex,
    /// "ofthe", "ofa", "ofan"
    pub glued_of: Regex,
    /// Running volume line, e.g. `45 (2020) 101–110`
    pub volume_line: Regex,
    /// Copyright notice
    pub copyright: Regex,
    /// DOI reference
    pub doi: Regex,
    /// Corresponding-author asterisks
    pub corresponding_mark: Regex,
    /// Separator between unmarked author names: comma, "and" or "&"
    pub author_separator: Regex,
}

/// Boilerplate found in publisher banners, compared against lowercase text
/// with all whitespace removed.
pub const BANNER_SIGNATURES: &[&str] = &[
    "sciencedirect",
    "contentslistsavailable",
    "journalhomepage",
    "www.elsevier.com",
    "elsevier.com/locate",
    "checkforupdates",
    "crossmark",
    "springerlink",
    "wileyonlinelibrary",
];

/// Affiliation keywords matched inside whitespace-free lowercase text.
pub const AFFILIATION_KEYWORDS: &[&str] = &[
    "department",
    "school",
    "institute",
    "faculty",
    "center",
    "centre",
    "laboratory",
    "university",
    "college",
    "hospital",
    "academy",
];

impl PatternTable {
    /// The process-wide table.
    pub fn shared() -> &'static PatternTable {
        &SHARED
    }

    fn compile() -> Self {
        let re = |pattern: &str| Regex::new(pattern).unwrap();
        let marker = r"(?:[a-z]|\d{1,2}|[⁰¹²³⁴⁵⁶⁷⁸⁹]{1,2})";

        Self {
            article_info: re(r"(?i)\ba\s*r\s*t\s*i\s*c\s*l\s*e\s*i\s*n\s*f\s*o\b"),
            abstract_lead: re(r"^\s*(?i:a\s*b\s*s\s*t\s*r\s*a\s*c\s*t)\b"),
            abstract_inline: re(
                r"(?:^|\s)(?:A\s*B\s*S\s*T\s*R\s*A\s*C\s*T|a\s+b\s+s\s+t\s+r\s+a\s+c\s+t)\b",
            ),
            keywords_header: re(
                r"(?:^\s*(?i:key\s*-?\s*words?|index\s+terms)\b|(?:^|\s)(?:KEY\s*WORDS?|K\s+E\s+Y\s+W\s+O\s+R\s+D\s+S|INDEX\s+TERMS)\b|(?:^|\s)(?:Key\s*words?|Index\s+Terms)\s*[:—–])",
            ),
            introduction: re(
                r"^\s*(?:(?:1|I)\s*\.?\s*)?Introduction\b|(?:^|\s)(?:1|I)\s*\.\s*Introduction\b|(?:^|\s)(?:(?:1|I)\s*\.?\s*)?I\s*N\s*T\s*R\s*O\s*D\s*U\s*C\s*T\s*I\s*O\s*N\b",
            ),
            stop_terms: re(r"(?i)\b(?:article\s+history|received|accepted|available\s+online)\b"),
            affiliation_cues: re(
                r"\b(?i:department|dept|school|institute|inst|faculty|center|centre|laboratory|lab|univ\w*|college|hospital|academy|polytechnic|research\s+group)\b|\b(?:IIT|MIT|ETH|CNRS|INRIA|Inria|EPFL)\b",
            ),
            affiliation_cues_merged: re(
                r"(?i)(?:department|school|institute|faculty|center|centre|laboratory|university|college|hospital|academy)",
            ),
            institution_acronyms: re(r"\b(?:IIT|MIT|ETH|CNRS|INRIA|Inria|EPFL)\b"),
            postal_code: re(r"\d{5,6}"),
            country: re(
                r"(?i)\b(?:USA|U\.S\.A|UK|United\s+States|United\s+Kingdom|India|China|Germany|France|Japan|Canada|Australia|Italy|Spain|Netherlands|Korea|Brazil|Switzerland|Singapore|Sweden|Portugal)\b",
            ),
            marker_line: re(&format!(r"^\s*{marker}\s*\p{{Lu}}")),
            affiliation_entry_spaced: re(&format!(r"^\s*({marker})\s+(.+)$")),
            affiliation_entry_tight: re(&format!(r"^\s*({marker})(\p{{Lu}}.*)$")),
            author_token: re(r"\p{L}[\p{L}\p{M}'’\-]*|[0-9]+|[⁰¹²³⁴⁵⁶⁷⁸⁹]|[,.*∗⁎&]"),
            camel_case: re(r"(\p{Ll})(\p{Lu})"),
            glued_article: re(
                r"\b((?i:of|and|the|for|in|at|to|with|from|by|de|la|le|des|du))(\p{Lu})",
            ),
            glued_of: re(r"(?i)\b(of)(the|an?)\b"),
            volume_line: re(r"^\d+\s*\(\d{4}\)\s*\d+[\s–\-]*\d*$"),
            copyright: re(r"©|(?i:\bcopyright\b)"),
            doi: re(r"(?i)\bdoi\s*:|(?i)https?://(?:dx\.)?doi\.org/|\b10\.\d{4,9}/\S+"),
            corresponding_mark: re(r"[*∗⁎]"),
            author_separator: re(r"\s*,\s*(?:(?:and|&)\s+)?|\s+(?:and|&)\s+"),
        }
    }

    /// Check for an "article info" header.
    pub fn is_article_info(&self, text: &str) -> bool {
        self.article_info.is_match(text)
    }

    /// Byte offset just past an abstract header, if the line has one.
    pub fn abstract_header_end(&self, text: &str) -> Option<usize> {
        let lead = self.abstract_lead.find(text);
        let inline = self.abstract_inline.find(text);
        match (lead, inline) {
            (Some(a), Some(b)) => Some(if a.start() <= b.start() { a.end() } else { b.end() }),
            (Some(m), None) | (None, Some(m)) => Some(m.end()),
            (None, None) => None,
        }
    }

    /// Check for an abstract header.
    pub fn is_abstract_header(&self, text: &str) -> bool {
        self.abstract_header_end(text).is_some()
    }

    /// Byte offset just past a keywords header, if the line has one.
    pub fn keywords_header_end(&self, text: &str) -> Option<usize> {
        self.keywords_header.find(text).map(|m| m.end())
    }

    /// Check for a keywords header.
    pub fn is_keywords_header(&self, text: &str) -> bool {
        self.keywords_header.is_match(text)
    }

    /// Check for an introduction heading.
    pub fn is_introduction(&self, text: &str) -> bool {
        self.introduction.is_match(text)
    }

    /// Check for any anchor that closes the author/affiliation zone.
    pub fn is_stop_line(&self, text: &str) -> bool {
        self.is_article_info(text)
            || self.is_abstract_header(text)
            || self.is_keywords_header(text)
            || self.stop_terms.is_match(text)
    }
}
