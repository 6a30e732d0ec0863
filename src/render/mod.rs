//! Rendering of extraction results.

mod flatten;
mod json;
mod text;

pub use flatten::{flatten_affiliations, flatten_authors};
pub use json::{to_json, JsonFormat};
pub use text::{layout_to_text, to_text};
