//! Corpus variants, document parts, and artifact file names.

use oanlp_common::OaNlpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which text of an article an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocPart {
    Body,
    Abstract,
}

impl DocPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocPart::Body     => "body",
            DocPart::Abstract => "abstract",
        }
    }
}

impl fmt::Display for DocPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocPart {
    type Err = OaNlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "body"     => Ok(DocPart::Body),
            "abstract" => Ok(DocPart::Abstract),
            other => Err(OaNlpError::InvalidInput(format!("unknown document part: {}", other))),
        }
    }
}

/// The three index variants a builder produces.
/// `Full` holds every document; `Training` every Nth; `Partial` the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    Full,
    Partial,
    Training,
}

impl CorpusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusKind::Full     => "full",
            CorpusKind::Partial  => "partial",
            CorpusKind::Training => "training",
        }
    }

    /// Name of the persisted index file under the corpus root.
    pub fn index_file_name(&self) -> String {
        format!("{}_corpus_info.json", self.as_str())
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorpusKind {
    type Err = OaNlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full"     => Ok(CorpusKind::Full),
            "partial"  => Ok(CorpusKind::Partial),
            "training" => Ok(CorpusKind::Training),
            other => Err(OaNlpError::InvalidInput(format!("unknown corpus type: {}", other))),
        }
    }
}

/// `10.1371/journal.pone.0001` + body → `10.1371-journal.pone.0001-body.txt`
pub fn doi_to_filename(doi: &str, part: DocPart) -> String {
    format!("{}-{}.txt", doi.replace('/', "-"), part.as_str())
}
