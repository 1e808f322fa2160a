//! oanlp-corpus — On-disk corpora built from search results.
//! - Deterministic artifact naming per DOI and document part
//! - `CorpusIndex`: category, document and metadata cross references
//! - `CorpusBuilder`: full / partial / training split and persistence
//! - `CorpusReader`: read-only lookups over a persisted index

pub mod naming;
pub mod index;
pub mod builder;
pub mod reader;

pub use builder::{CorpusBuilder, CorpusSummary, Route, CORPUS_FIELDS};
pub use index::{ArticleInfo, CorpusIndex};
pub use naming::{doi_to_filename, CorpusKind, DocPart};
pub use reader::{CorpusReader, Selection};
