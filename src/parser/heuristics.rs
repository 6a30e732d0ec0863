//! Text-level heuristics: normalization, merged-word repair, affiliation
//! cues and banner detection.

use unicode_normalization::UnicodeNormalization;

use super::patterns::{PatternTable, AFFILIATION_KEYWORDS, BANNER_SIGNATURES};

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),  // ﬀ
    ('\u{FB01}', "fi"),  // ﬁ
    ('\u{FB02}', "fl"),  // ﬂ
    ('\u{FB03}', "ffi"), // ﬃ
    ('\u{FB04}', "ffl"), // ﬄ
    ('\u{FB05}', "st"),  // ﬅ (long s + t)
    ('\u{FB06}', "st"),  // ﬆ
];

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize the text of a reconstructed line.
///
/// Applies NFC, expands typographic ligatures, drops private-use and
/// replacement characters left behind by broken font encodings, then
/// collapses whitespace.
pub fn normalize_line_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        if let Some((_, expansion)) = LIGATURES.iter().find(|(lig, _)| *lig == c) {
            out.push_str(expansion);
        } else if !is_garbage_char(c) {
            out.push(c);
        }
    }
    collapse_whitespace(&out)
}

fn is_garbage_char(c: char) -> bool {
    let code = c as u32;
    c == '\u{FFFD}'
        || (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}

/// Map a superscript digit to its ASCII digit.
pub fn superscript_to_digit(c: char) -> Option<char> {
    SUPERSCRIPT_DIGITS
        .iter()
        .position(|&s| s == c)
        .and_then(|i| char::from_digit(i as u32, 10))
}

/// Replace superscript digits with ASCII digits, leaving other characters.
pub fn normalize_marker(marker: &str) -> String {
    marker
        .chars()
        .map(|c| superscript_to_digit(c).unwrap_or(c))
        .collect()
}

/// Render ASCII digits as superscript digits.
pub fn to_superscript(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => SUPERSCRIPT_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Repair words glued together by the text extractor.
///
/// Only short strings are touched: fewer than 3 words and long enough that a
/// real name would not fit. Two-word strings over 15 chars get the full
/// treatment; a single word over 10 chars only gets the camel-case split.
pub fn fix_merged_text(text: &str, patterns: &PatternTable) -> String {
    let words = text.split_whitespace().count();
    let len = text.chars().count();

    if words >= 3 || words == 0 {
        return text.to_string();
    }

    let repaired = if len > 15 {
        let s = patterns.camel_case.replace_all(text, "$1 $2");
        let s = patterns.glued_article.replace_all(&s, "$1 $2");
        patterns.glued_of.replace_all(&s, "$1 $2").into_owned()
    } else if words == 1 && len > 10 {
        patterns.camel_case.replace_all(text, "$1 $2").into_owned()
    } else {
        return text.to_string();
    };

    collapse_whitespace(&repaired)
}

/// Check whether a text fragment reads like an affiliation.
pub fn is_likely_affiliation(text: &str, patterns: &PatternTable) -> bool {
    let collapsed: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    AFFILIATION_KEYWORDS.iter().any(|k| collapsed.contains(k))
        || patterns.institution_acronyms.is_match(text)
        || patterns.postal_code.is_match(text)
        || patterns.country.is_match(text)
}

/// Detects journal banners and publisher boilerplate.
#[derive(Debug)]
pub struct BannerDetector<'a> {
    patterns: &'a PatternTable,
    journals: Vec<String>,
}

impl<'a> BannerDetector<'a> {
    /// Create a detector for the given journal names.
    pub fn new(patterns: &'a PatternTable, journals: &[String]) -> Self {
        let journals = journals
            .iter()
            .map(|j| squash(j))
            .filter(|j| !j.is_empty())
            .collect();
        Self { patterns, journals }
    }

    /// Check whether a line is banner boilerplate.
    pub fn is_banner(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < 3 {
            return false;
        }

        let squashed = squash(text);
        if squashed == "elsevier"
            || self.journals.iter().any(|j| squashed.contains(j.as_str()))
            || BANNER_SIGNATURES.iter().any(|s| squashed.contains(s))
        {
            return true;
        }

        self.patterns.volume_line.is_match(text)
            || self.patterns.copyright.is_match(text)
            || self.patterns.doi.is_match(text)
    }
}

/// Lowercase with all whitespace removed.
fn squash(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> &'static PatternTable {
        PatternTable::shared()
    }

    #[test]
    fn test_normalize_line_text() {
        assert_eq!(normalize_line_text("  ﬁnding   ﬂowers "), "finding flowers");
        assert_eq!(normalize_line_text("cafe\u{301}"), "café");
        assert_eq!(normalize_line_text("a\u{E000}b\u{FFFD}"), "ab");
    }

    #[test]
    fn test_superscripts() {
        assert_eq!(superscript_to_digit('²'), Some('2'));
        assert_eq!(superscript_to_digit('a'), None);
        assert_eq!(normalize_marker("¹²"), "12");
        assert_eq!(to_superscript("10"), "¹⁰");
    }

    #[test]
    fn test_fix_merged_text_long_pair() {
        assert_eq!(
            fix_merged_text("DepartmentofComputerScience", p()),
            "Departmentof Computer Science"
        );
        assert_eq!(fix_merged_text("JaneDoe JohnSmith", p()), "Jane Doe John Smith");
    }

    #[test]
    fn test_fix_merged_text_glued_of() {
        assert_eq!(fix_merged_text("Hospital ofthePeople", p()), "Hospital of the People");
    }

    #[test]
    fn test_fix_merged_text_single_word() {
        assert_eq!(fix_merged_text("MariaGonzalez", p()), "Maria Gonzalez");
        // Below the single-word threshold.
        assert_eq!(fix_merged_text("McDonald", p()), "McDonald");
    }

    #[test]
    fn test_fix_merged_text_leaves_sentences() {
        let text = "Department of Computer Science";
        assert_eq!(fix_merged_text(text, p()), text);
        assert_eq!(fix_merged_text("Jane Doe", p()), "Jane Doe");
        assert_eq!(fix_merged_text("", p()), "");
    }

    #[test]
    fn test_is_likely_affiliation() {
        assert!(is_likely_affiliation("Department of Computer Science", p()));
        assert!(is_likely_affiliation("MIT", p()));
        assert!(is_likely_affiliation("USA", p()));
        assert!(is_likely_affiliation("Chennai 600036", p()));
        assert!(is_likely_affiliation("Universityof Oslo", p()));
        assert!(!is_likely_affiliation("John Smith", p()));
        assert!(!is_likely_affiliation("Jane Doe", p()));
    }

    #[test]
    fn test_banner_detection() {
        let journals = vec!["Journal of Computational Science".to_string()];
        let banner = BannerDetector::new(p(), &journals);

        assert!(banner.is_banner("Journal of Computational Science 45 (2020) 101234"));
        assert!(banner.is_banner("Contents lists available at ScienceDirect"));
        assert!(banner.is_banner("journal homepage: www.elsevier.com/locate/jocs"));
        assert!(banner.is_banner("45 (2020) 101–110"));
        assert!(banner.is_banner("© 2020 Elsevier B.V. All rights reserved."));
        assert!(banner.is_banner("https://doi.org/10.1016/j.jocs.2020.101234"));
        assert!(banner.is_banner("ELSEVIER"));
        assert!(!banner.is_banner("A study of layout analysis"));
        assert!(!banner.is_banner("ab"));
    }
}
