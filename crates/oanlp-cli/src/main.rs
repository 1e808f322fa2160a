//! `oanlp`: search PLOS, build on-disk corpora and read them back.

mod commands;
mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use oanlp_corpus::{CorpusKind, CorpusReader, DocPart, CORPUS_FIELDS};
use oanlp_search::request::parse_limit;
use oanlp_search::{JournalFilter, SearchPager, SearchRequest, SolrBackend};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::ReadCommand;
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "oanlp", version, about = "Build NLP corpora from the PLOS search API")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and print the matching documents.
    Search {
        /// Journal ids (pone,pbio,...) or `*` for all
        #[arg(long, default_value = "*")]
        journals: JournalFilter,
        /// Number of results, `*` for the whole result set
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Comma separated field list
        #[arg(long, value_delimiter = ',', default_value = "id,title")]
        fields: Vec<String>,
        /// Only return research articles
        #[arg(long)]
        research_only: bool,
        /// Query clauses, combined with AND
        queries: Vec<String>,
    },

    /// Build a corpus of research articles under a new directory.
    Build {
        #[arg(long, default_value = "*")]
        journals: JournalFilter,
        #[arg(long, value_parser = parse_limit)]
        limit: Option<usize>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        desc: Option<String>,
        /// Route every Nth article to the training corpus (0 disables)
        #[arg(long)]
        train: Option<usize>,
        queries: Vec<String>,
    },

    /// Print information from a built corpus as JSON.
    Read {
        #[arg(long, value_enum, default_value_t = KindArg::Full)]
        corpus_type: KindArg,
        #[arg(long, value_enum, default_value_t = PartArg::Body)]
        doc_part: PartArg,
        /// Restrict output to these DOIs
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(value_enum)]
        what: ReadCommand,
        corpus_dir: PathBuf,
    },

    /// Export doi, title and abstract of every article to CSV.
    ExportCsv {
        #[arg(long, value_enum, default_value_t = KindArg::Full)]
        corpus_type: KindArg,
        corpus_dir: PathBuf,
        out: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum KindArg {
    Full,
    Partial,
    Training,
}

impl From<KindArg> for CorpusKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Full     => CorpusKind::Full,
            KindArg::Partial  => CorpusKind::Partial,
            KindArg::Training => CorpusKind::Training,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PartArg {
    Body,
    Abstract,
}

impl From<PartArg> for DocPart {
    fn from(part: PartArg) -> Self {
        match part {
            PartArg::Body     => DocPart::Body,
            PartArg::Abstract => DocPart::Abstract,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "oanlp=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    debug!(endpoint = %config.search.endpoint, "configuration loaded");

    match cli.command {
        Command::Search { journals, limit, start, fields, research_only, queries } => {
            let mut request = SearchRequest::new(queries, fields)
                .with_journals(journals)
                .with_limit(limit.unwrap_or(config.search.limit))
                .with_chunk_size(config.search.chunk_size)
                .with_start(start);
            if research_only {
                request = request.research_only();
            }
            cmd_search(&config, &request)
        }
        Command::Build { journals, limit, out_dir, desc, train, queries } => {
            let train = train.unwrap_or(config.corpus.train);
            if train == 1 {
                bail!("--train 1 would put every article in the training corpus; use 0 to disable or N >= 2");
            }
            let request = SearchRequest::new(queries, CORPUS_FIELDS.iter().copied())
                .with_journals(journals)
                .with_limit(limit.unwrap_or(config.search.limit))
                .with_chunk_size(config.search.chunk_size)
                .research_only();
            let out_dir = out_dir.unwrap_or_else(|| config.corpus.out_dir.clone());
            let desc = desc.unwrap_or_else(|| config.corpus.description.clone());
            cmd_build(&config, request, &out_dir, &desc, train)
        }
        Command::Read { corpus_type, doc_part, ids, what, corpus_dir } => {
            let reader = CorpusReader::open(&corpus_dir, corpus_type.into(), doc_part.into())
                .with_context(|| format!("opening corpus at {}", corpus_dir.display()))?;
            let value = commands::read_projection(&reader, what, &ids)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Command::ExportCsv { corpus_type, corpus_dir, out } => {
            let reader = CorpusReader::open(&corpus_dir, corpus_type.into(), DocPart::Abstract)
                .with_context(|| format!("opening corpus at {}", corpus_dir.display()))?;
            commands::export_csv(&reader, &out)?;
            Ok(())
        }
    }
}

fn backend(config: &Config) -> anyhow::Result<SolrBackend> {
    Ok(SolrBackend::new(&config.search.endpoint, &config.search.api_key, config.search.timeout())?)
}

fn cmd_search(config: &Config, request: &SearchRequest) -> anyhow::Result<()> {
    let pager = SearchPager::new(request, backend(config)?)?;
    for (n, doc) in pager.enumerate() {
        let record = commands::search_record(n + 1, &doc?, &request.fields);
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(())
}

fn cmd_build(config: &Config, request: SearchRequest, out_dir: &Path, desc: &str, train: usize) -> anyhow::Result<()> {
    let summary = commands::build_corpus(backend(config)?, request, out_dir, desc, train)?;
    println!("Added {} articles to {}", summary.total, summary.root.display());
    Ok(())
}
