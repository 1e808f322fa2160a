//! Read-only access to a built corpus.

use chrono::{DateTime, Utc};
use oanlp_common::{OaNlpError, Result};
use oanlp_search::SearchRequest;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::index::{ArticleInfo, CorpusIndex};
use crate::naming::{CorpusKind, DocPart};

/// Which documents a projection covers.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    All,
    Only(&'a BTreeSet<String>),
}

impl<'a> Selection<'a> {
    pub fn only(ids: &'a BTreeSet<String>) -> Self {
        Selection::Only(ids)
    }
}

pub struct CorpusReader {
    root: PathBuf,
    kind: CorpusKind,
    part: DocPart,
    index: CorpusIndex,
}

impl CorpusReader {
    /// Load `{kind}_corpus_info.json` from `root`. The index must be internally consistent.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>, kind: CorpusKind, part: DocPart) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let path = root.join(kind.index_file_name());
        if !path.is_file() {
            return Err(OaNlpError::NotFound(format!("corpus index {}", path.display())));
        }

        let raw = fs::read_to_string(&path)?;
        let index: CorpusIndex = serde_json::from_str(&raw)?;
        index.check_consistency()?;
        debug!(documents = index.document_count, categories = index.categories_to_dois.len(), "corpus index loaded");

        Ok(Self { root, kind, part, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> CorpusKind {
        self.kind
    }

    pub fn part(&self) -> DocPart {
        self.part
    }

    pub fn description(&self) -> &str {
        &self.index.description
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.index.creation_date
    }

    /// The search that produced the corpus.
    pub fn query(&self) -> &SearchRequest {
        &self.index.query
    }

    pub fn document_ids(&self) -> BTreeSet<&str> {
        self.index.dois_to_categories.keys().map(String::as_str).collect()
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.index.categories_to_dois.keys().map(String::as_str).collect()
    }

    pub fn documents_in_category(&self, category: &str) -> Result<BTreeSet<&str>> {
        self.index
            .categories_to_dois
            .get(category)
            .map(|dois| dois.iter().map(String::as_str).collect())
            .ok_or_else(|| OaNlpError::NotFound(format!("category {:?}", category)))
    }

    pub fn categories_of(&self, doi: &str) -> Result<&[String]> {
        self.index
            .dois_to_categories
            .get(doi)
            .map(Vec::as_slice)
            .ok_or_else(|| OaNlpError::NotFound(format!("document {}", doi)))
    }

    pub fn metadata(&self, doi: &str) -> Result<&ArticleInfo> {
        self.index
            .doi_article_info
            .get(doi)
            .ok_or_else(|| OaNlpError::NotFound(format!("document {}", doi)))
    }

    /// Location of the configured part's artifact for `doi`.
    pub fn artifact_path(&self, doi: &str) -> Result<PathBuf> {
        let info = self.metadata(doi)?;
        Ok(self.root.join(info.fid(self.part)))
    }

    pub fn read_text(&self, doi: &str) -> Result<String> {
        let path = self.artifact_path(doi)?;
        Ok(fs::read_to_string(path)?)
    }

    fn select(&self, selection: Selection<'_>) -> Result<Vec<(&str, &ArticleInfo)>> {
        match selection {
            Selection::All => Ok(self
                .index
                .doi_article_info
                .iter()
                .map(|(doi, info)| (doi.as_str(), info))
                .collect()),
            Selection::Only(ids) => ids
                .iter()
                .map(|doi| {
                    self.index
                        .doi_article_info
                        .get_key_value(doi)
                        .map(|(key, info)| (key.as_str(), info))
                        .ok_or_else(|| OaNlpError::NotFound(format!("document {}", doi)))
                })
                .collect(),
        }
    }

    fn project<'s, T, F>(&'s self, selection: Selection<'_>, f: F) -> Result<BTreeMap<&'s str, T>>
    where
        F: Fn(&'s ArticleInfo) -> T,
    {
        let mut out = BTreeMap::new();
        for (doi, info) in self.select(selection)? {
            out.insert(doi, f(info));
        }
        Ok(out)
    }

    pub fn article_info(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &ArticleInfo>> {
        self.project(selection, |info| info)
    }

    pub fn page_urls(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.page_url.as_str())
    }

    pub fn xml_urls(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.xml_url.as_str())
    }

    pub fn body_fids(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.body_fid.as_str())
    }

    pub fn abstract_fids(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.abstract_fid.as_str())
    }

    pub fn authors(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &[String]>> {
        self.project(selection, |info| info.author.as_slice())
    }

    pub fn publication_dates(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.publication_date.as_str())
    }

    pub fn article_types(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.article_type.as_str())
    }

    pub fn titles(&self, selection: Selection<'_>) -> Result<BTreeMap<&str, &str>> {
        self.project(selection, |info| info.title.as_str())
    }
}
