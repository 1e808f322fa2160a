//! The persisted corpus index: cross references between documents, categories
//! and article metadata.

use chrono::{DateTime, Utc};
use oanlp_common::{Document, OaNlpError, Result};
use oanlp_search::{journals, SearchRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::naming::{doi_to_filename, DocPart};

/// Per-document metadata kept in the index. Missing source fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleInfo {
    pub id: String,
    pub title: String,
    pub author: Vec<String>,
    pub editor: Vec<String>,
    pub publication_date: String,
    pub article_type: String,
    pub journal: String,
    pub page_url: String,
    pub xml_url: String,
    pub body_fid: String,
    pub abstract_fid: String,
}

impl ArticleInfo {
    pub fn from_document(doc: &Document) -> Self {
        let doi = doc.id.as_str();
        let urls = journals::article_urls(doi, true);
        Self {
            id: doi.to_string(),
            title: doc.title.clone(),
            author: doc.author.clone(),
            editor: doc.editor.clone(),
            publication_date: doc.publication_date.clone(),
            article_type: doc.article_type.clone(),
            journal: doc.journal.clone(),
            page_url: urls.as_ref().map(|u| u.page.clone()).unwrap_or_default(),
            xml_url: urls.map(|u| u.xml).unwrap_or_default(),
            body_fid: doi_to_filename(doi, DocPart::Body),
            abstract_fid: doi_to_filename(doi, DocPart::Abstract),
        }
    }

    pub fn fid(&self, part: DocPart) -> &str {
        match part {
            DocPart::Body     => &self.body_fid,
            DocPart::Abstract => &self.abstract_fid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusIndex {
    pub description: String,
    pub document_count: usize,
    pub creation_date: DateTime<Utc>,
    pub query: SearchRequest,
    #[serde(default)]
    pub categories_to_dois: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub dois_to_categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub doi_article_info: BTreeMap<String, ArticleInfo>,
}

impl CorpusIndex {
    pub fn new(query: SearchRequest, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            document_count: 0,
            creation_date: Utc::now(),
            query,
            categories_to_dois: BTreeMap::new(),
            dois_to_categories: BTreeMap::new(),
            doi_article_info: BTreeMap::new(),
        }
    }

    pub fn contains(&self, doi: &str) -> bool {
        self.dois_to_categories.contains_key(doi)
    }

    /// Record a document's categories and metadata. Recording the same DOI twice
    /// appends it twice under each category; callers must prevent that.
    pub fn record(&mut self, doc: &Document) {
        let doi = &doc.id;
        self.dois_to_categories.insert(doi.clone(), doc.subject.clone());
        for subject in &doc.subject {
            self.categories_to_dois
                .entry(subject.clone())
                .or_default()
                .push(doi.clone());
        }
        self.doi_article_info.insert(doi.clone(), ArticleInfo::from_document(doc));
        self.document_count += 1;
    }

    /// Verify the cross references: every categorised DOI has metadata, and every
    /// DOI listed under a category carries that category.
    pub fn check_consistency(&self) -> Result<()> {
        if let Some(doi) = self
            .dois_to_categories
            .keys()
            .find(|doi| !self.doi_article_info.contains_key(*doi))
        {
            return Err(OaNlpError::InvalidInput(format!("index has no metadata for {}", doi)));
        }

        for (category, dois) in &self.categories_to_dois {
            for doi in dois {
                let listed = self
                    .dois_to_categories
                    .get(doi)
                    .map(|cats| cats.contains(category))
                    .unwrap_or(false);
                if !listed {
                    return Err(OaNlpError::InvalidInput(format!(
                        "category {:?} lists {} which does not carry it",
                        category, doi
                    )));
                }
            }
        }
        Ok(())
    }
}
