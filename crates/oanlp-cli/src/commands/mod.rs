//! Subcommand bodies, written against `SearchBackend` and `CorpusReader` so they
//! run the same way over the Solr client and over local fixtures.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use oanlp_classify::clean_field;
use oanlp_common::{Document, Result as OaResult};
use oanlp_corpus::{CorpusBuilder, CorpusReader, CorpusSummary, Selection};
use oanlp_search::{SearchBackend, SearchPager, SearchRequest};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCommand {
    ArtInfo,
    ArtPageUrl,
    ArtXmlUrl,
    BodyFn,
    AbstFn,
}

/// One search hit as printed by `oanlp search`: `{"<n>": {<fields>}}`.
pub fn search_record(n: usize, doc: &Document, fields: &[String]) -> Value {
    let mut record = Map::new();
    record.insert(n.to_string(), Value::Object(doc.project(fields)));
    Value::Object(record)
}

/// Run `request` against `backend` and write a corpus under `out_dir`.
///
/// Nothing is created until the first page has been fetched. If the search or an
/// add fails afterwards, the articles added so far are still indexed before the
/// error is returned.
pub fn build_corpus<B: SearchBackend>(
    backend: B,
    request: SearchRequest,
    out_dir: &Path,
    desc: &str,
    train: usize,
) -> anyhow::Result<CorpusSummary> {
    let mut pager = SearchPager::new(&request, backend)?;
    let first = pager
        .next()
        .transpose()
        .context("search failed before any article was fetched")?;

    let mut builder = CorpusBuilder::new(request, out_dir, desc, train)?;
    match add_all(&mut builder, first.into_iter().map(Ok).chain(pager)) {
        Ok(()) => Ok(builder.finalize()?),
        Err(err) => {
            match builder.finalize() {
                Ok(summary) => warn!(
                    added = summary.total,
                    root = %summary.root.display(),
                    error = %err,
                    "build interrupted, indexed the articles added so far"
                ),
                Err(finalize_err) => warn!(error = %finalize_err, "could not index interrupted build"),
            }
            Err(err)
        }
    }
}

fn add_all<I>(builder: &mut CorpusBuilder, docs: I) -> anyhow::Result<()>
where
    I: Iterator<Item = OaResult<Document>>,
{
    for doc in docs {
        let doc = doc.with_context(|| format!("search failed after {} articles", builder.total()))?;
        info!(doi = %doc.id, "processing");
        builder.add(&doc).with_context(|| format!("adding {}", doc.id))?;
    }
    Ok(())
}

/// The JSON printed by `oanlp read`. An empty `ids` list selects every article.
pub fn read_projection(reader: &CorpusReader, what: ReadCommand, ids: &[String]) -> anyhow::Result<Value> {
    let ids: BTreeSet<String> = ids.iter().cloned().collect();
    let selection = if ids.is_empty() { Selection::All } else { Selection::only(&ids) };

    let value = match what {
        ReadCommand::ArtInfo    => serde_json::to_value(reader.article_info(selection)?)?,
        ReadCommand::ArtPageUrl => serde_json::to_value(reader.page_urls(selection)?)?,
        ReadCommand::ArtXmlUrl  => serde_json::to_value(reader.xml_urls(selection)?)?,
        ReadCommand::BodyFn     => serde_json::to_value(reader.body_fids(selection)?)?,
        ReadCommand::AbstFn     => serde_json::to_value(reader.abstract_fids(selection)?)?,
    };
    Ok(value)
}

/// Write `doi,title,abstract` rows for every article; returns the row count.
pub fn export_csv(reader: &CorpusReader, out: &Path) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("creating {}", out.display()))?;
    writer.write_record(["doi", "title", "abstract"])?;

    let mut rows = 0;
    for (doi, info) in reader.article_info(Selection::All)? {
        let abstract_text = reader.read_text(doi)?;
        let title = clean_field(&info.title);
        let abstract_text = clean_field(&abstract_text);
        writer.write_record([doi, title.as_str(), abstract_text.as_str()])?;
        rows += 1;
    }
    writer.flush()?;
    info!(rows, path = %out.display(), "csv written");
    Ok(rows)
}

#[cfg(test)]
mod tests;
