//! Corpus builder.
//!
//! Consumes search results and materialises them on disk:
//!   1. two text artifacts per document (`…-body.txt`, `…-abstract.txt`)
//!   2. a `full` index with every document
//!   3. a `partial` index, and a `training` index holding every Nth document
//!      when a training modulus N ≥ 2 is configured
//!
//! Indexes live in memory until `finalize`, which writes each one exactly once.

use oanlp_common::{Document, OaNlpError, Result};
use oanlp_search::SearchRequest;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::index::CorpusIndex;
use crate::naming::{doi_to_filename, CorpusKind, DocPart};

/// Fields a search must return for the builder to produce a complete corpus.
pub const CORPUS_FIELDS: &[&str] = &[
    "id", "journal", "publication_date", "article_type", "author",
    "subject", "title", "abstract", "body", "editor",
];

/// Where `add` routed a document besides the full index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Partial,
    Training,
}

/// What `finalize` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusSummary {
    pub root: PathBuf,
    pub total: usize,
    pub full: usize,
    pub partial: usize,
    pub training: Option<usize>,
    pub index_files: Vec<PathBuf>,
}

pub struct CorpusBuilder {
    root: PathBuf,
    train: usize,
    total: usize,
    full: CorpusIndex,
    partial: CorpusIndex,
    training: Option<CorpusIndex>,
    seen: HashSet<String>,
}

impl CorpusBuilder {
    /// Creates the output root, which must not exist yet.
    /// `train` ≥ 2 routes every `train`-th document to the training index; 0 or 1 disables it.
    pub fn new(
        request: SearchRequest,
        root: impl AsRef<Path>,
        description: impl Into<String>,
        train: usize,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() {
            return Err(OaNlpError::InvalidInput(format!(
                "corpus directory already exists: {}",
                root.display()
            )));
        }
        fs::create_dir_all(&root)?;

        let description = description.into();
        let training = (train >= 2).then(|| CorpusIndex::new(request.clone(), description.clone()));
        info!(root = %root.display(), train, "corpus builder created");

        Ok(Self {
            root,
            train,
            total: 0,
            full: CorpusIndex::new(request.clone(), description.clone()),
            partial: CorpusIndex::new(request, description),
            training,
            seen: HashSet::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of documents added so far.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn index(&self, kind: CorpusKind) -> Option<&CorpusIndex> {
        match kind {
            CorpusKind::Full     => Some(&self.full),
            CorpusKind::Partial  => Some(&self.partial),
            CorpusKind::Training => self.training.as_ref(),
        }
    }

    /// Add one document: write its artifacts, then record it in the full index and
    /// in either the training or the partial index.
    ///
    /// A DOI already added to this builder is rejected with `DuplicateAdd` and
    /// leaves the builder unchanged.
    #[instrument(skip(self, doc), fields(doi = %doc.id))]
    pub fn add(&mut self, doc: &Document) -> Result<Route> {
        if doc.id.trim().is_empty() {
            return Err(OaNlpError::InvalidInput("document has no id".into()));
        }
        if self.seen.contains(&doc.id) {
            return Err(OaNlpError::DuplicateAdd(doc.id.clone()));
        }

        self.write_artifacts(doc)?;

        self.seen.insert(doc.id.clone());
        self.total += 1;
        self.full.record(doc);

        let route = match self.training.as_mut() {
            Some(training) if self.total % self.train == 0 => {
                training.record(doc);
                Route::Training
            }
            _ => {
                self.partial.record(doc);
                Route::Partial
            }
        };

        debug!(count = self.total, ?route, "document added");
        Ok(route)
    }

    /// Add every document of a search, stopping at the first error.
    pub fn build<I>(&mut self, docs: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let mut added = 0;
        for doc in docs {
            self.add(&doc?)?;
            added += 1;
        }
        Ok(added)
    }

    fn write_artifacts(&self, doc: &Document) -> Result<()> {
        let body = self.root.join(doi_to_filename(&doc.id, DocPart::Body));
        fs::write(&body, doc.body.as_bytes())?;

        let abstract_path = self.root.join(doi_to_filename(&doc.id, DocPart::Abstract));
        fs::write(&abstract_path, doc.first_abstract().as_bytes())?;
        Ok(())
    }

    fn write_index(&self, kind: CorpusKind, index: &CorpusIndex) -> Result<PathBuf> {
        let path = self.root.join(kind.index_file_name());
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), index)?;
        debug!(path = %path.display(), documents = index.document_count, "index written");
        Ok(path)
    }

    /// Persist the indexes. Consumes the builder, so nothing can be added afterwards.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn finalize(self) -> Result<CorpusSummary> {
        let mut index_files = vec![
            self.write_index(CorpusKind::Full, &self.full)?,
            self.write_index(CorpusKind::Partial, &self.partial)?,
        ];
        if let Some(training) = &self.training {
            index_files.push(self.write_index(CorpusKind::Training, training)?);
        }

        let summary = CorpusSummary {
            root: self.root.clone(),
            total: self.total,
            full: self.full.document_count,
            partial: self.partial.document_count,
            training: self.training.as_ref().map(|t| t.document_count),
            index_files,
        };
        info!(total = summary.total, partial = summary.partial, training = ?summary.training, "corpus finalized");
        Ok(summary)
    }
}
