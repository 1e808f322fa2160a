//! Search backends: the trait the pager pulls pages from, and the PLOS Solr client.
//!
//! Endpoint: http://api.plos.org/search

use oanlp_common::sandbox::SandboxClient;
use oanlp_common::{Document, OaNlpError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::request::PageQuery;

pub const PLOS_SEARCH_URL: &str = "http://api.plos.org/search";

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total number of matches reported by the backend.
    pub num_found: usize,
    pub docs: Vec<Document>,
    pub status: Option<i64>,
    pub q_time: Option<i64>,
}

/// A source of result pages. Fetches are blocking; there is no retry.
pub trait SearchBackend {
    fn fetch_page(&self, page: &PageQuery) -> Result<SearchPage>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for &B {
    fn fetch_page(&self, page: &PageQuery) -> Result<SearchPage> {
        (**self).fetch_page(page)
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn fetch_page(&self, page: &PageQuery) -> Result<SearchPage> {
        (**self).fetch_page(page)
    }
}

#[derive(Debug, Deserialize)]
struct SolrEnvelope {
    #[serde(rename = "responseHeader")]
    header: Option<SolrHeader>,
    response: SolrBody,
}

#[derive(Debug, Deserialize)]
struct SolrHeader {
    status: Option<i64>,
    #[serde(rename = "QTime")]
    q_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SolrBody {
    #[serde(rename = "numFound")]
    num_found: usize,
    #[serde(default)]
    docs: Vec<Document>,
}

/// Parse a Solr JSON response body. `url` is only used for error reporting.
pub fn parse_response(body: &str, url: &str) -> Result<SearchPage> {
    let envelope: SolrEnvelope = serde_json::from_str(body)
        .map_err(|e| OaNlpError::backend(url, format!("malformed response: {}", e)))?;

    let (status, q_time) = envelope
        .header
        .map(|h| (h.status, h.q_time))
        .unwrap_or((None, None));

    if let Some(code) = status.filter(|s| *s != 0) {
        return Err(OaNlpError::backend(url, format!("Solr status {}", code)));
    }

    Ok(SearchPage {
        num_found: envelope.response.num_found,
        docs: envelope.response.docs,
        status,
        q_time,
    })
}

/// PLOS Solr search API client.
pub struct SolrBackend {
    client: SandboxClient,
    endpoint: String,
    api_key: String,
}

impl SolrBackend {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let mut client = SandboxClient::new(timeout)?;
        client.allow_url_host(&endpoint)?;
        Ok(Self { client, endpoint, api_key: api_key.into() })
    }

    pub fn plos(api_key: impl Into<String>) -> Result<Self> {
        Self::new(PLOS_SEARCH_URL, api_key, Duration::from_secs(30))
    }

    /// The request URL without the API key, for logs and errors.
    pub fn display_url(&self, page: &PageQuery) -> String {
        Url::parse_with_params(&self.endpoint, page.params())
            .map(String::from)
            .unwrap_or_else(|_| self.endpoint.clone())
    }
}

impl SearchBackend for SolrBackend {
    #[instrument(skip(self, page), fields(start = page.start, rows = page.rows))]
    fn fetch_page(&self, page: &PageQuery) -> Result<SearchPage> {
        let url = self.display_url(page);

        let resp = self.client
            .get(&self.endpoint)?
            .query(&page.params())
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|e| OaNlpError::backend(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OaNlpError::backend(&url, format!("HTTP {}", status)));
        }

        let body = resp.text().map_err(|e| OaNlpError::backend(&url, e))?;
        let page = parse_response(&body, &url)?;

        debug!(num_found = page.num_found, count = page.docs.len(), q_time = ?page.q_time, "Solr page returned");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SearchRequest;

    #[test]
    fn test_parse_minimal_solr_response() {
        let body = r#"{
            "responseHeader": {"status": 0, "QTime": 3},
            "response": {
                "numFound": 250, "start": 0,
                "docs": [
                    {"id": "10.1371/journal.pone.0000001", "title": "One", "subject": ["Biology"]},
                    {"id": "10.1371/journal.pone.0000002"}
                ]
            }
        }"#;
        let page = parse_response(body, "http://api.plos.org/search").unwrap();
        assert_eq!(page.num_found, 250);
        assert_eq!(page.docs.len(), 2);
        assert_eq!(page.docs[0].subject, vec!["Biology".to_string()]);
        assert_eq!(page.q_time, Some(3));
    }

    #[test]
    fn test_malformed_json_is_backend_error() {
        let err = parse_response("<html>oops</html>", "http://api.plos.org/search?q=x").unwrap_err();
        match err {
            OaNlpError::SearchBackend { url, .. } => assert_eq!(url, "http://api.plos.org/search?q=x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nonzero_solr_status_is_backend_error() {
        let body = r#"{"responseHeader": {"status": 400}, "response": {"numFound": 0, "docs": []}}"#;
        assert!(matches!(parse_response(body, "u"), Err(OaNlpError::SearchBackend { .. })));
    }

    #[test]
    fn test_display_url_omits_api_key() {
        let backend = SolrBackend::plos("secret-key").unwrap();
        let page = SearchRequest::new(["title:DNA"], ["id"]).base_page().unwrap();
        let url = backend.display_url(&page);
        assert!(url.starts_with("http://api.plos.org/search?q=title%3ADNA"));
        assert!(!url.contains("secret-key"));
    }
}
