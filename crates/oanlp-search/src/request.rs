//! Search request descriptor and Solr query construction.

use oanlp_common::{OaNlpError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::journals;

/// Excludes non-article documents and issue images from every search.
pub const ARTICLE_FILTER: &str = r#"doc_type:full AND !article_type_facet:"Issue Image""#;

pub const RESEARCH_ARTICLE_CLAUSE: &str = r#"article_type:"Research Article""#;

pub const DEFAULT_LIMIT: usize = 99;
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Which journals a search is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalFilter {
    All,
    Only(Vec<String>),
}

impl JournalFilter {
    /// Restrict to the given journal ids, rejecting ids not in the journal table.
    pub fn only<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(OaNlpError::InvalidInput("journal filter needs at least one journal id".into()));
        }
        let filter = JournalFilter::Only(ids);
        filter.validate()?;
        Ok(filter)
    }

    fn validate(&self) -> Result<()> {
        if let JournalFilter::Only(ids) = self {
            if let Some(bad) = ids.iter().find(|id| journals::lookup(id).is_none()) {
                return Err(OaNlpError::InvalidInput(format!("unknown journal id: {}", bad)));
            }
        }
        Ok(())
    }

    /// `journal:( "PLoS ONE" OR "PLoS Biology" )`, or `None` for all journals.
    pub fn clause(&self) -> Result<Option<String>> {
        match self {
            JournalFilter::All => Ok(None),
            JournalFilter::Only(ids) => {
                let names = ids
                    .iter()
                    .map(|id| {
                        journals::lookup(id)
                            .map(|j| format!("\"{}\"", j.name))
                            .ok_or_else(|| OaNlpError::InvalidInput(format!("unknown journal id: {}", id)))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(format!("journal:( {} )", names.join(" OR "))))
            }
        }
    }
}

impl Default for JournalFilter {
    fn default() -> Self { JournalFilter::All }
}

impl FromStr for JournalFilter {
    type Err = OaNlpError;

    /// `*` or `all` for every journal, otherwise a comma separated id list.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "*" || s.eq_ignore_ascii_case("all") {
            return Ok(JournalFilter::All);
        }
        JournalFilter::only(s.split(',').map(str::trim).filter(|id| !id.is_empty()))
    }
}

/// Parse a result limit; `*` means the whole result set.
pub fn parse_limit(s: &str) -> Result<usize> {
    let s = s.trim();
    if s == "*" {
        return Ok(usize::MAX);
    }
    s.parse::<usize>()
        .map_err(|e| OaNlpError::InvalidInput(format!("invalid limit {:?}: {}", s, e)))
}

/// Immutable description of a search. Holds no credentials, so it can be stored
/// in a corpus index and replayed with a fresh pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text clauses, combined with AND.
    pub queries: Vec<String>,
    #[serde(default)]
    pub journals: JournalFilter,
    pub fields: Vec<String>,
    #[serde(default)]
    pub start: usize,
    /// Absolute end offset of the iteration.
    pub limit: usize,
    /// Maximum rows per page fetch.
    pub chunk_size: usize,
}

impl SearchRequest {
    pub fn new<Q, F>(queries: Q, fields: F) -> Self
    where
        Q: IntoIterator,
        Q::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            queries: queries.into_iter().map(Into::into).collect(),
            journals: JournalFilter::All,
            fields: fields.into_iter().map(Into::into).collect(),
            start: 0,
            limit: DEFAULT_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_journals(mut self, journals: JournalFilter) -> Self {
        self.journals = journals;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Restrict results to research articles.
    pub fn research_only(mut self) -> Self {
        if !self.queries.iter().any(|q| q == RESEARCH_ARTICLE_CLAUSE) {
            self.queries.push(RESEARCH_ARTICLE_CLAUSE.to_string());
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(OaNlpError::InvalidInput("limit must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(OaNlpError::InvalidInput("chunk size must be at least 1".into()));
        }
        self.journals.validate()
    }

    /// Rows requested per page: `min(limit, chunk_size)`.
    pub fn page_size(&self) -> usize {
        self.limit.min(self.chunk_size)
    }

    /// The conjunctive `q` parameter: every clause, journal clause included, joined with AND.
    pub fn query_string(&self) -> Result<String> {
        let mut clauses: Vec<String> = self.queries.clone();
        if let Some(journal_clause) = self.journals.clause()? {
            clauses.push(journal_clause);
        }
        if clauses.is_empty() {
            return Ok("*:*".to_string());
        }
        Ok(clauses.join(" AND "))
    }

    /// The fixed part of every page request.
    pub fn base_page(&self) -> Result<PageQuery> {
        self.validate()?;
        Ok(PageQuery {
            q: self.query_string()?,
            fl: self.fields.join(","),
            start: self.start,
            rows: self.page_size(),
        })
    }
}

/// One page fetch against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub q: String,
    pub fl: String,
    pub start: usize,
    pub rows: usize,
}

impl PageQuery {
    pub fn at(&self, start: usize) -> Self {
        Self { start, ..self.clone() }
    }

    /// Query parameters, minus the API key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.q.clone()),
            ("fl", self.fl.clone()),
            ("start", self.start.to_string()),
            ("rows", self.rows.to_string()),
            ("fq", ARTICLE_FILTER.to_string()),
            ("wt", "json".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_size_is_min_of_limit_and_chunk() {
        let req = SearchRequest::new(["title:DNA"], ["id"]).with_limit(99).with_chunk_size(400);
        assert_eq!(req.page_size(), 99);
        let req = req.with_limit(1000);
        assert_eq!(req.page_size(), 400);
    }

    #[test]
    fn test_query_string_without_journals() {
        let req = SearchRequest::new(["title:DNA", "subject:Genetics"], ["id"]);
        assert_eq!(req.query_string().unwrap(), "title:DNA AND subject:Genetics");
    }

    #[test]
    fn test_query_string_with_journals() {
        let req = SearchRequest::new(["title:DNA"], ["id"])
            .with_journals(JournalFilter::only(["pone", "pbio"]).unwrap());
        assert_eq!(
            req.query_string().unwrap(),
            r#"title:DNA AND journal:( "PLoS ONE" OR "PLoS Biology" )"#
        );
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let req = SearchRequest::new(Vec::<String>::new(), ["id"]);
        assert_eq!(req.query_string().unwrap(), "*:*");
    }

    #[test]
    fn test_research_only_is_appended_once() {
        let req = SearchRequest::new(["title:DNA"], ["id"]).research_only().research_only();
        assert_eq!(req.queries, vec!["title:DNA".to_string(), RESEARCH_ARTICLE_CLAUSE.to_string()]);
    }

    #[test]
    fn test_journal_filter_parsing() {
        assert_eq!("*".parse::<JournalFilter>().unwrap(), JournalFilter::All);
        assert_eq!(
            "pone, pgen".parse::<JournalFilter>().unwrap(),
            JournalFilter::Only(vec!["pone".into(), "pgen".into()])
        );
        assert!("pone,nope".parse::<JournalFilter>().unwrap_err().is_invalid_input());
        assert!(",".parse::<JournalFilter>().is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("20").unwrap(), 20);
        assert_eq!(parse_limit("*").unwrap(), usize::MAX);
        assert!(parse_limit("lots").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        assert!(SearchRequest::new(["x"], ["id"]).with_limit(0).validate().is_err());
        assert!(SearchRequest::new(["x"], ["id"]).with_chunk_size(0).validate().is_err());
        let bad = SearchRequest::new(["x"], ["id"]).with_journals(JournalFilter::Only(vec!["zzzz".into()]));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_page_params() {
        let req = SearchRequest::new(["title:DNA"], ["id", "title"]).with_limit(10);
        let page = req.base_page().unwrap().at(20);
        let params = page.params();
        assert!(params.contains(&("fl", "id,title".to_string())));
        assert!(params.contains(&("start", "20".to_string())));
        assert!(params.contains(&("rows", "10".to_string())));
        assert!(params.contains(&("fq", ARTICLE_FILTER.to_string())));
        assert!(params.contains(&("wt", "json".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "api_key"));
    }

    #[test]
    fn test_request_roundtrips_through_json() {
        let req = SearchRequest::new(["title:DNA"], ["id"])
            .with_journals(JournalFilter::only(["pone"]).unwrap());
        let json = serde_json::to_string(&req).unwrap();
        let back: SearchRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
