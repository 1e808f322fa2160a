//! oanlp-search — Query construction and pagination over the PLOS search API.
//! - Journal table and canonical article links
//! - Conjunctive query construction
//! - Solr page fetching behind the `SearchBackend` trait
//! - `SearchPager`, a lazy document sequence under a row limit

pub mod journals;
pub mod request;
pub mod backend;
pub mod pager;

pub use backend::{SearchBackend, SearchPage, SolrBackend};
pub use pager::SearchPager;
pub use request::{JournalFilter, PageQuery, SearchRequest};
