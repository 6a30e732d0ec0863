//! Data model for front-matter extraction.
//!
//! Words come from an upstream text extractor, lines and zones are derived
//! per page, and the author/record types are what callers consume.

mod author;
mod line;
mod record;
mod word;
mod zone;

pub use author::{AffiliationMap, Author};
pub use line::Line;
pub(crate) use line::join_text;
pub use record::{Degradation, Extraction, Field, FrontMatter, FrontMatterRecord};
pub use word::{PageWords, Word};
pub use zone::{Zone, ZoneKind};
