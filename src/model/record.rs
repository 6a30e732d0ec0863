//! Extraction results: the structured front matter, the flat record written
//! to disk, and the degradations collected on the way.

use serde::{Deserialize, Serialize};

use super::{AffiliationMap, Author};
use crate::render::{flatten_affiliations, flatten_authors};

/// Structured front matter of one paper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    pub authors: Vec<Author>,
    pub affiliations: AffiliationMap,
    pub keywords: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl FrontMatter {
    /// Flatten into the on-disk record for `filename`.
    pub fn to_record(&self, filename: impl Into<String>) -> FrontMatterRecord {
        FrontMatterRecord {
            filename: filename.into(),
            title: self.title.clone(),
            authors: flatten_authors(&self.authors),
            affiliations: flatten_affiliations(&self.affiliations),
            keywords: self.keywords.clone(),
            abstract_text: self.abstract_text.clone(),
        }
    }
}

/// Flat record, one JSON object per input PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatterRecord {
    pub filename: String,
    pub title: String,
    pub authors: String,
    pub affiliations: String,
    pub keywords: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl FrontMatterRecord {
    /// An all-empty record for `filename`.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }
}

/// Output field a degradation affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    All,
    Title,
    Authors,
    Affiliations,
    Keywords,
    Abstract,
}

/// A stage that fell back to a default instead of finding what it looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// The page produced no words or no non-empty lines.
    NoWords,
    /// No banner near the top; header cutoff is a fraction of the page.
    HeaderCutoffDefaulted,
    /// No "article info"/"abstract" line; metadata bound is a fraction of the page.
    MetadataBoundDefaulted,
    /// No title candidates between the header cutoff and the metadata bound.
    TitleNotFound,
    /// No author/affiliation split line; the first lines were taken as authors.
    AuthorSplitDefaulted,
    /// The resolver produced no authors.
    NoAuthors,
    /// The resolver produced no affiliations.
    NoAffiliations,
    /// No keywords header.
    KeywordsNotFound,
    /// No abstract header.
    AbstractNotFound,
}

impl Degradation {
    /// The output field this degradation affects.
    pub fn field(&self) -> Field {
        match self {
            Degradation::NoWords => Field::All,
            Degradation::HeaderCutoffDefaulted
            | Degradation::MetadataBoundDefaulted
            | Degradation::TitleNotFound => Field::Title,
            Degradation::AuthorSplitDefaulted | Degradation::NoAuthors => Field::Authors,
            Degradation::NoAffiliations => Field::Affiliations,
            Degradation::KeywordsNotFound => Field::Keywords,
            Degradation::AbstractNotFound => Field::Abstract,
        }
    }
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Degradation::NoWords => "no extractable words",
            Degradation::HeaderCutoffDefaulted => "no header banner, default cutoff used",
            Degradation::MetadataBoundDefaulted => "no article-info/abstract anchor, default bound used",
            Degradation::TitleNotFound => "title not found",
            Degradation::AuthorSplitDefaulted => "no author/affiliation split, first lines taken as authors",
            Degradation::NoAuthors => "no authors",
            Degradation::NoAffiliations => "no affiliations",
            Degradation::KeywordsNotFound => "keywords anchor not found",
            Degradation::AbstractNotFound => "abstract anchor not found",
        };
        f.write_str(msg)
    }
}

/// Best-effort result of extracting one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub front_matter: FrontMatter,
    pub degradations: Vec<Degradation>,
}

impl Extraction {
    /// Result for a page without extractable text.
    pub fn no_words() -> Self {
        Self {
            front_matter: FrontMatter::default(),
            degradations: vec![Degradation::NoWords],
        }
    }

    /// Check if a given stage degraded.
    pub fn degraded(&self, degradation: Degradation) -> bool {
        self.degradations.contains(&degradation)
    }

    /// Degradations affecting `field` (including whole-record ones).
    pub fn degradations_for(&self, field: Field) -> Vec<Degradation> {
        self.degradations
            .iter()
            .copied()
            .filter(|d| d.field() == field || d.field() == Field::All)
            .collect()
    }

    /// Check if nothing degraded.
    pub fn is_complete(&self) -> bool {
        self.degradations.is_empty()
    }

    /// Flatten into the on-disk record for `filename`.
    pub fn to_record(&self, filename: impl Into<String>) -> FrontMatterRecord {
        self.front_matter.to_record(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_keys() {
        let record = FrontMatterRecord {
            filename: "paper.pdf".to_string(),
            abstract_text: "We study.".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys.len(),
            6,
            "record must carry exactly six fields, got {:?}",
            keys
        );
        assert_eq!(json["abstract"], "We study.");
    }

    #[test]
    fn test_no_words_extraction() {
        let extraction = Extraction::no_words();
        assert!(extraction.degraded(Degradation::NoWords));
        assert_eq!(
            extraction.degradations_for(Field::Keywords),
            vec![Degradation::NoWords]
        );
        assert_eq!(extraction.to_record("x.pdf"), FrontMatterRecord::empty("x.pdf"));
    }

    #[test]
    fn test_front_matter_to_record() {
        let fm = FrontMatter {
            title: "A Title".to_string(),
            authors: vec![
                Author::new("Jane Doe").with_markers(["1"]),
                Author::new("John Smith").with_markers(["2"]).corresponding(),
            ],
            affiliations: AffiliationMap::unkeyed("MIT, USA"),
            ..Default::default()
        };
        let record = fm.to_record("a.pdf");
        assert_eq!(record.authors, "Jane Doe¹, John Smith² ∗");
        assert_eq!(record.affiliations, "MIT, USA");
        assert_eq!(record.title, "A Title");
    }

    #[test]
    fn test_degradation_fields() {
        assert_eq!(Degradation::TitleNotFound.field(), Field::Title);
        assert_eq!(Degradation::NoAffiliations.field(), Field::Affiliations);
        assert_eq!(Degradation::AbstractNotFound.to_string(), "abstract anchor not found");
    }
}
