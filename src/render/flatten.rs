//! Flattening of structured authors and affiliations into display strings.

use crate::model::{AffiliationMap, Author};
use crate::parser::to_superscript;

/// Join author names with `", "`.
///
/// Numeric markers are appended as superscript digits and corresponding
/// authors get a trailing `" ∗"`. Letter markers are not shown.
pub fn flatten_authors(authors: &[Author]) -> String {
    authors
        .iter()
        .filter(|a| !a.name.trim().is_empty())
        .map(flatten_author)
        .collect::<Vec<_>>()
        .join(", ")
}

fn flatten_author(author: &Author) -> String {
    let mut out = author.name.trim().to_string();
    let markers: Vec<String> = author.numeric_markers().map(to_superscript).collect();
    out.push_str(&markers.join(","));
    if author.corresponding {
        out.push_str(" ∗");
    }
    out
}

/// Flatten affiliations.
///
/// The unkeyed text is returned as is; keyed entries become `"key text"`
/// pairs in key order, separated by spaces.
pub fn flatten_affiliations(affiliations: &AffiliationMap) -> String {
    match affiliations {
        AffiliationMap::Unkeyed(text) => text.trim().to_string(),
        AffiliationMap::Keyed(map) => map
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(key, text)| format!("{} {}", key, text.trim()))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_flatten_authors() {
        let authors = vec![
            Author::new("Jane Doe").with_markers(["1", "2"]),
            Author::new("  "),
            Author::new("John Smith").with_markers(["a"]).corresponding(),
        ];
        assert_eq!(flatten_authors(&authors), "Jane Doe¹,², John Smith ∗");
        assert_eq!(flatten_authors(&[]), "");
    }

    #[test]
    fn test_flatten_keyed_affiliations() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), "MIT, USA".to_string());
        map.insert("a".to_string(), "Dept. of Physics".to_string());
        map.insert("c".to_string(), " ".to_string());

        assert_eq!(
            flatten_affiliations(&AffiliationMap::Keyed(map)),
            "a Dept. of Physics b MIT, USA"
        );
    }

    #[test]
    fn test_flatten_unkeyed_affiliations() {
        assert_eq!(flatten_affiliations(&AffiliationMap::unkeyed(" MIT ")), "MIT");
        assert_eq!(flatten_affiliations(&AffiliationMap::default()), "");
    }
}
