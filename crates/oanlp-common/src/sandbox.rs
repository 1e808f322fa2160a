use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::OaNlpError;

/// Hosts the search and article-link tooling is allowed to reach.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "api.plos.org",                // PLOS Solr search
    "journals.plos.org",           // article pages / XML
    "www.plosbiology.org",
    "www.plosgenetics.org",
    "www.ploscompbiol.org",
    "www.plosmedicine.org",
    "www.plosone.org",
    "www.plosntds.org",
    "clinicaltrials.ploshubs.org",
    "www.plospathogens.org",
    "localhost",
    "127.0.0.1",
];

/// A blocking HTTP client that only allows requests to approved domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default PLOS allowlist and the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, OaNlpError> {
        let allowlist = DEFAULT_ALLOWLIST.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("oanlp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OaNlpError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        debug!(domain, "allowlisting domain");
        self.allowlist.insert(domain.to_string());
    }

    /// Allowlists the host of `url`, e.g. a configured search endpoint.
    pub fn allow_url_host(&mut self, url: &str) -> Result<(), OaNlpError> {
        let parsed = Url::parse(url)
            .map_err(|e| OaNlpError::Config(format!("Invalid URL {}: {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| OaNlpError::Config(format!("URL has no host: {}", url)))?;
        self.allow_domain(host);
        Ok(())
    }

    /// True when the URL's host, or a parent domain of it, is allowlisted.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed domain
                return self
                    .allowlist
                    .iter()
                    .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)));
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<RequestBuilder, OaNlpError> {
        if !self.is_allowed(url) {
            return Err(OaNlpError::Security(format!("host not in allowlist: {}", url)));
        }

        Ok(self.client.get(url))
    }
}
