//! Layout-based front-matter extraction.
//!
//! Words are clustered into lines, lines are partitioned into zones, and
//! each zone is handed to the component that reads it.

mod authors;
mod cluster;
mod extractor;
mod heuristics;
mod options;
mod patterns;
mod sections;
mod zones;

pub use authors::{
    classify_token, parse_keyed_affiliations, resolve_tokens, split_unmarked, tokenize, AuthorLayout,
    AuthorToken, AuthorZoneParser, MarkerParser, ResolvedAuthors, UnmarkedParser,
};
pub use cluster::LineClusterer;
pub use extractor::FrontMatterExtractor;
pub use heuristics::{
    collapse_whitespace, fix_merged_text, is_likely_affiliation, normalize_line_text, normalize_marker,
    superscript_to_digit, to_superscript, BannerDetector,
};
pub use options::ExtractOptions;
pub use patterns::PatternTable;
pub use sections::{leading_anchor, Anchor, SectionAnchors, SectionExtractor, Sections};
pub use zones::{PageLayout, ZoneLocator};
