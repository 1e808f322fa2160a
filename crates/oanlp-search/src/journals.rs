//! PLOS journal table and canonical article links.
//!
//! PLOS DOIs look like `10.1371/journal.pone.0012345`; the third `.`-separated
//! component is the four-character journal id.

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Journal {
    pub id: &'static str,
    pub name: &'static str,
    pub site: &'static str,
}

pub const JOURNALS: &[Journal] = &[
    Journal { id: "pbio", name: "PLoS Biology",                     site: "http://www.plosbiology.org" },
    Journal { id: "pgen", name: "PLoS Genetics",                    site: "http://www.plosgenetics.org" },
    Journal { id: "pcbi", name: "PLoS Computational Biology",       site: "http://www.ploscompbiol.org" },
    Journal { id: "pmed", name: "PLoS Medicine",                    site: "http://www.plosmedicine.org" },
    Journal { id: "pone", name: "PLoS ONE",                         site: "http://www.plosone.org" },
    Journal { id: "pntd", name: "PLoS Neglected Tropical Diseases", site: "http://www.plosntds.org" },
    Journal { id: "pctr", name: "PLoS Clinical Trials",             site: "http://clinicaltrials.ploshubs.org" },
    Journal { id: "ppat", name: "PLoS Pathogens",                   site: "http://www.plospathogens.org" },
];

pub fn lookup(id: &str) -> Option<&'static Journal> {
    JOURNALS.iter().find(|j| j.id == id)
}

/// Extract the journal id from a PLOS DOI.
pub fn journal_id(doi: &str) -> Option<&str> {
    let parts: Vec<&str> = doi.split('.').collect();
    match parts.as_slice() {
        [_, _, jid, _] => Some(*jid),
        _ => None,
    }
}

fn journal_for_doi(doi: &str) -> Option<&'static Journal> {
    let journal = journal_id(doi).and_then(lookup);
    if journal.is_none() {
        warn!(doi, "DOI does not resolve to a known PLOS journal");
    }
    journal
}

fn info_doi(doi: &str, pretty: bool) -> String {
    let raw = format!("info:doi/{}", doi);
    if pretty { raw } else { urlencoding::encode(&raw).into_owned() }
}

impl Journal {
    /// Link to the article page. `pretty` leaves the `info:doi/` part unencoded.
    pub fn page_url(&self, doi: &str, pretty: bool) -> String {
        format!("{}/article/{}", self.site, info_doi(doi, pretty))
    }

    /// Link to the article XML.
    pub fn xml_url(&self, doi: &str, pretty: bool) -> String {
        format!(
            "{}/article/fetchObjectAttachment.action?representation=XML&uri={}",
            self.site,
            info_doi(doi, pretty)
        )
    }
}

/// Page and XML links of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleUrls {
    pub page: String,
    pub xml: String,
}

/// Both links from a single journal lookup.
pub fn article_urls(doi: &str, pretty: bool) -> Option<ArticleUrls> {
    let journal = journal_for_doi(doi)?;
    Some(ArticleUrls {
        page: journal.page_url(doi, pretty),
        xml: journal.xml_url(doi, pretty),
    })
}

pub fn article_page_url(doi: &str, pretty: bool) -> Option<String> {
    journal_for_doi(doi).map(|j| j.page_url(doi, pretty))
}

pub fn article_xml_url(doi: &str, pretty: bool) -> Option<String> {
    journal_for_doi(doi).map(|j| j.xml_url(doi, pretty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_journal_id_from_doi() {
        assert_eq!(journal_id("10.1371/journal.pone.0012345"), Some("pone"));
        assert_eq!(journal_id("10.1371/journal.pone"), None);
        assert_eq!(journal_id("not-a-doi"), None);
    }

    #[test]
    fn test_pretty_urls() {
        let doi = "10.1371/journal.pbio.0000001";
        assert_eq!(
            article_page_url(doi, true).unwrap(),
            "http://www.plosbiology.org/article/info:doi/10.1371/journal.pbio.0000001"
        );
        assert_eq!(
            article_xml_url(doi, true).unwrap(),
            "http://www.plosbiology.org/article/fetchObjectAttachment.action\
             ?representation=XML&uri=info:doi/10.1371/journal.pbio.0000001"
        );
    }

    #[test]
    fn test_encoded_url_escapes_info_doi() {
        let url = article_page_url("10.1371/journal.pone.0000002", false).unwrap();
        assert!(url.starts_with("http://www.plosone.org/article/info%3Adoi%2F10.1371"));
    }

    #[test]
    fn test_unknown_journal_has_no_url() {
        assert!(article_page_url("10.1371/journal.xxxx.0000001", true).is_none());
        assert!(article_xml_url("garbage", true).is_none());
    }

    #[test]
    fn test_article_urls_match_single_links() {
        let doi = "10.1371/journal.ppat.0000042";
        let urls = article_urls(doi, true).unwrap();
        assert_eq!(Some(urls.page), article_page_url(doi, true));
        assert_eq!(Some(urls.xml), article_xml_url(doi, true));
    }

    #[test]
    #[traced_test]
    fn test_unknown_doi_warns_once_for_both_links() {
        assert!(article_urls("local-doc-1", true).is_none());
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|l| l.contains("does not resolve")).count() {
                1 => Ok(()),
                n => Err(format!("expected one warning, got {n}")),
            }
        });
    }
}
