//! Author records and the affiliation map they point into.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One author as read from the author zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Affiliation markers ("1", "a", ...), sorted
    pub markers: Vec<String>,
    /// Corresponding-author flag
    pub corresponding: bool,
}

impl Author {
    /// Create an author with no markers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the markers; they are de-duplicated and sorted.
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = markers.into_iter().map(Into::into).collect();
        self.markers = set.into_iter().collect();
        self
    }

    /// Mark as corresponding author.
    pub fn corresponding(mut self) -> Self {
        self.corresponding = true;
        self
    }

    /// Markers made only of ASCII digits, in order.
    pub fn numeric_markers(&self) -> impl Iterator<Item = &str> {
        self.markers
            .iter()
            .map(String::as_str)
            .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Affiliations of a document.
///
/// Either keyed by the markers used in the author zone, or a single unkeyed
/// text when the layout carries no markers. Both serialize as a JSON object;
/// the unkeyed text sits under the `"all"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, String>", from = "BTreeMap<String, String>")]
pub enum AffiliationMap {
    /// Marker key to affiliation text
    Keyed(BTreeMap<String, String>),
    /// All affiliations as one text
    Unkeyed(String),
}

impl Default for AffiliationMap {
    fn default() -> Self {
        AffiliationMap::Keyed(BTreeMap::new())
    }
}

impl From<AffiliationMap> for BTreeMap<String, String> {
    fn from(map: AffiliationMap) -> Self {
        match map {
            AffiliationMap::Keyed(map) => map,
            AffiliationMap::Unkeyed(text) => BTreeMap::from([(AffiliationMap::ALL_KEY.to_string(), text)]),
        }
    }
}

impl From<BTreeMap<String, String>> for AffiliationMap {
    /// A map holding only `"all"` is the unkeyed text.
    fn from(mut map: BTreeMap<String, String>) -> Self {
        if map.len() == 1 {
            if let Some(text) = map.remove(AffiliationMap::ALL_KEY) {
                return AffiliationMap::unkeyed(text);
            }
        }
        AffiliationMap::Keyed(map)
    }
}

impl AffiliationMap {
    /// Key of the unkeyed variant in flat outputs.
    pub const ALL_KEY: &'static str = "all";

    /// Build the unkeyed variant; empty text yields an empty map.
    pub fn unkeyed(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::default()
        } else {
            AffiliationMap::Unkeyed(text)
        }
    }

    /// Look up an affiliation by marker; the unkeyed text answers to `"all"`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            AffiliationMap::Keyed(map) => map.get(key).map(String::as_str),
            AffiliationMap::Unkeyed(text) if key == Self::ALL_KEY => Some(text.as_str()),
            AffiliationMap::Unkeyed(_) => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            AffiliationMap::Keyed(map) => map.len(),
            AffiliationMap::Unkeyed(_) => 1,
        }
    }

    /// Check if there are no affiliations.
    pub fn is_empty(&self) -> bool {
        match self {
            AffiliationMap::Keyed(map) => map.values().all(|v| v.trim().is_empty()),
            AffiliationMap::Unkeyed(text) => text.trim().is_empty(),
        }
    }

    /// Check if the map carries marker keys.
    pub fn is_keyed(&self) -> bool {
        matches!(self, AffiliationMap::Keyed(_))
    }
}
