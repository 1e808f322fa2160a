//! Search result document as returned by the PLOS Solr API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One article record. Only `id` is guaranteed; every other field depends on the
/// requested field list and the article type, so all of them default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The DOI, e.g. `10.1371/journal.pone.0012345`.
    pub id: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub article_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Vec<String>,
    #[serde(default)]
    pub editor: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Vec<String>,
    #[serde(default)]
    pub body: String,
    /// Any other returned fields (score, eissn, …).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// The first abstract entry, or "" when the article has none.
    pub fn first_abstract(&self) -> &str {
        self.abstract_text.first().map(String::as_str).unwrap_or("")
    }

    /// Project the named fields into a JSON object (missing fields become `null`).
    pub fn project(&self, fields: &[String]) -> serde_json::Map<String, Value> {
        let full = serde_json::to_value(self).unwrap_or(Value::Null);
        fields
            .iter()
            .map(|f| (f.clone(), full.get(f).cloned().unwrap_or(Value::Null)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_partial_solr_doc() {
        let raw = r#"{
            "id": "10.1371/journal.pone.0000001",
            "title": "DNA repair",
            "abstract": ["First.", "Second."],
            "score": 1.5
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.id, "10.1371/journal.pone.0000001");
        assert_eq!(doc.first_abstract(), "First.");
        assert!(doc.subject.is_empty());
        assert_eq!(doc.journal, "");
        assert_eq!(doc.extra.get("score"), Some(&serde_json::json!(1.5)));
    }

    #[test]
    fn test_first_abstract_defaults_to_empty() {
        assert_eq!(Document::new("x").first_abstract(), "");
    }

    #[test]
    fn test_project_requested_fields() {
        let mut doc = Document::new("10.1371/journal.pbio.0000002");
        doc.author = vec!["A. Author".into()];
        let fields = vec!["id".to_string(), "author".to_string(), "nope".to_string()];
        let projected = doc.project(&fields);
        assert_eq!(projected["id"], serde_json::json!("10.1371/journal.pbio.0000002"));
        assert_eq!(projected["author"], serde_json::json!(["A. Author"]));
        assert_eq!(projected["nope"], Value::Null);
    }
}
