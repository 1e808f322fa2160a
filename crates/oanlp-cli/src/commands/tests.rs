use super::*;
use oanlp_common::OaNlpError;
use oanlp_corpus::{CorpusKind, DocPart, CORPUS_FIELDS};
use oanlp_search::{PageQuery, SearchPage};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;
use tempfile::tempdir;

/// Replays a fixed list of page results, then fails.
struct ScriptedBackend {
    script: RefCell<VecDeque<OaResult<SearchPage>>>,
}

impl ScriptedBackend {
    fn new(script: Vec<OaResult<SearchPage>>) -> Self {
        Self { script: RefCell::new(script.into()) }
    }
}

impl SearchBackend for ScriptedBackend {
    fn fetch_page(&self, page: &PageQuery) -> OaResult<SearchPage> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(OaNlpError::backend(format!("start={}", page.start), "script exhausted")))
    }
}

fn article(n: usize) -> Document {
    let mut doc = Document::new(format!("10.1371/journal.pone.{:07}", n));
    doc.title = format!("Article {n}: a study.");
    doc.journal = "PLoS ONE".into();
    doc.article_type = "Research Article".into();
    doc.subject = vec!["Biology".into()];
    doc.abstract_text = vec![format!("Abstract {n}.\nThey grow (fast); really?")];
    doc.body = format!("Body of {n}.");
    doc
}

fn page(num_found: usize, ids: &[usize]) -> OaResult<SearchPage> {
    Ok(SearchPage { num_found, docs: ids.iter().map(|&n| article(n)).collect(), ..Default::default() })
}

fn request() -> SearchRequest {
    SearchRequest::new(["subject:Biology"], CORPUS_FIELDS.iter().copied())
        .research_only()
        .with_chunk_size(2)
}

fn built_corpus(root: &Path, count: usize) {
    let mut builder = CorpusBuilder::new(request(), root, "fixture", 0).unwrap();
    for n in 1..=count {
        builder.add(&article(n)).unwrap();
    }
    builder.finalize().unwrap();
}

#[test]
fn test_build_corpus_adds_every_article() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    let backend = ScriptedBackend::new(vec![page(3, &[1, 2]), page(3, &[3])]);

    let summary = build_corpus(&backend, request(), &root, "complete", 0).unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.full, 3);

    let reader = CorpusReader::open(&root, CorpusKind::Full, DocPart::Body).unwrap();
    assert_eq!(reader.document_count(), 3);
    assert_eq!(reader.description(), "complete");
}

#[test]
fn test_failure_mid_build_still_indexes_added_articles() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    let backend = ScriptedBackend::new(vec![
        page(4, &[1, 2]),
        Err(OaNlpError::backend("http://api.plos.org/search?start=2", "HTTP 500")),
    ]);

    let err = build_corpus(&backend, request(), &root, "interrupted", 0).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("search failed after 2 articles"), "{message}");
    assert!(message.contains("HTTP 500"), "{message}");

    assert!(root.join("full_corpus_info.json").exists());
    assert!(root.join("partial_corpus_info.json").exists());
    let reader = CorpusReader::open(&root, CorpusKind::Full, DocPart::Abstract).unwrap();
    assert_eq!(
        reader.document_ids(),
        BTreeSet::from(["10.1371/journal.pone.0000001", "10.1371/journal.pone.0000002"])
    );
}

#[test]
fn test_failure_on_first_fetch_creates_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    let backend = ScriptedBackend::new(vec![Err(OaNlpError::backend("http://api.plos.org/search", "timed out"))]);

    let err = build_corpus(&backend, request(), &root, "never", 0).unwrap_err();
    assert!(format!("{err:#}").contains("before any article was fetched"));
    assert!(!root.exists());
}

#[test]
fn test_empty_search_builds_empty_corpus() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    let backend = ScriptedBackend::new(vec![page(0, &[])]);

    let summary = build_corpus(&backend, request(), &root, "empty", 0).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(CorpusReader::open(&root, CorpusKind::Full, DocPart::Body).unwrap().document_count(), 0);
}

#[test]
fn test_export_csv_writes_cleaned_rows() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    built_corpus(&root, 3);
    let out = dir.path().join("export.csv");

    let reader = CorpusReader::open(&root, CorpusKind::Full, DocPart::Abstract).unwrap();
    assert_eq!(export_csv(&reader, &out).unwrap(), 3);

    let mut csv_reader = csv::Reader::from_path(&out).unwrap();
    let header: Vec<String> = csv_reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, vec!["doi", "title", "abstract"]);
    let rows: Vec<csv::StringRecord> = csv_reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "10.1371/journal.pone.0000001");
    assert_eq!(&rows[0][1], "Article 1  a study");
    assert_eq!(&rows[0][2], "Abstract 1  They grow  fast   really");
    assert!(rows.iter().all(|r| !r[2].contains('\n')));
}

#[test]
fn test_read_page_url_for_selected_id() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("corpus");
    built_corpus(&root, 2);
    let reader = CorpusReader::open(&root, CorpusKind::Full, DocPart::Body).unwrap();

    let doi = "10.1371/journal.pone.0000002";
    let value = read_projection(&reader, ReadCommand::ArtPageUrl, &[doi.to_string()]).unwrap();
    assert_eq!(value, json!({ doi: format!("http://www.plosone.org/article/info:doi/{doi}") }));

    let all = read_projection(&reader, ReadCommand::BodyFn, &[]).unwrap();
    assert_eq!(all.as_object().unwrap().len(), 2);
    assert_eq!(all["10.1371/journal.pone.0000001"], "10.1371-journal.pone.0000001-body.txt");

    assert!(read_projection(&reader, ReadCommand::ArtInfo, &["10.1371/journal.pone.9999999".to_string()]).is_err());
}

#[test]
fn test_search_record_is_keyed_by_position() {
    let doc = article(7);
    let fields = vec!["id".to_string(), "title".to_string()];
    assert_eq!(
        search_record(1, &doc, &fields),
        json!({ "1": { "id": "10.1371/journal.pone.0000007", "title": "Article 7: a study." } })
    );
}
