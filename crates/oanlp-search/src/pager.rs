//! Resumable pagination over a search backend.
//!
//! A `SearchPager` turns one `SearchRequest` into a lazy, single-pass sequence of
//! documents. Pages are fetched on demand: the first on the first call to
//! `next()`, the following ones whenever the current page runs out before the
//! effective limit is reached. The effective limit starts as the request limit
//! and shrinks to `numFound` once the backend reports fewer matches.

use oanlp_common::{Document, Result};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, info, warn};

use crate::backend::SearchBackend;
use crate::request::{PageQuery, SearchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagerState {
    NotStarted,
    Running,
    Done,
}

pub struct SearchPager<B> {
    backend: B,
    page: PageQuery,
    limit: usize,
    cursor: usize,
    buffer: VecDeque<Document>,
    num_found: Option<usize>,
    pages_fetched: usize,
    returned: usize,
    state: PagerState,
}

impl<B: SearchBackend> SearchPager<B> {
    /// Validates the request and prepares the cursor. Nothing is fetched yet.
    pub fn new(request: &SearchRequest, backend: B) -> Result<Self> {
        let page = request.base_page()?;
        Ok(Self {
            backend,
            limit: request.limit,
            cursor: request.start,
            page,
            buffer: VecDeque::new(),
            num_found: None,
            pages_fetched: 0,
            returned: 0,
            state: PagerState::NotStarted,
        })
    }

    /// Total matches reported by the backend, known after the first fetch.
    pub fn num_found(&self) -> Option<usize> {
        self.num_found
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Documents yielded so far.
    pub fn returned(&self) -> usize {
        self.returned
    }

    /// Current absolute offset.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Fetches the page at the current offset into the buffer and returns its size.
    fn fetch(&mut self) -> Result<usize> {
        let query = self.page.at(self.cursor);
        let page = self.backend.fetch_page(&query)?;
        self.pages_fetched += 1;

        if page.num_found < self.limit {
            self.limit = page.num_found;
        }
        self.num_found = Some(page.num_found);

        let count = page.docs.len();
        debug!(
            start = query.start,
            rows = query.rows,
            num_found = page.num_found,
            count,
            limit = self.limit,
            "fetched result page"
        );
        self.buffer = page.docs.into();
        Ok(count)
    }

    fn finish(&mut self) {
        if self.state != PagerState::Done {
            info!(returned = self.returned, pages = self.pages_fetched, "search exhausted");
        }
        self.state = PagerState::Done;
        self.buffer.clear();
    }

    /// Ends the sequence after a failed fetch.
    fn fail(&mut self, offset: usize) {
        warn!(offset, returned = self.returned, pages = self.pages_fetched, "search failed");
        self.state = PagerState::Done;
        self.buffer.clear();
    }
}

impl<B: SearchBackend> Iterator for SearchPager<B> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            PagerState::Done => return None,
            PagerState::NotStarted => {
                self.state = PagerState::Running;
                match self.fetch() {
                    Ok(0) => {
                        self.finish();
                        return None;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        self.fail(self.cursor);
                        return Some(Err(e));
                    }
                }
            }
            PagerState::Running => {}
        }

        if self.cursor >= self.limit {
            self.finish();
            return None;
        }

        // Page exhausted (full or short): continue at the current offset.
        if self.buffer.is_empty() {
            match self.fetch() {
                Ok(0) => {
                    self.finish();
                    return None;
                }
                Ok(_) => {
                    if self.cursor >= self.limit {
                        self.finish();
                        return None;
                    }
                }
                Err(e) => {
                    self.fail(self.cursor);
                    return Some(Err(e));
                }
            }
        }

        let doc = self.buffer.pop_front()?;
        self.cursor += 1;
        self.returned += 1;
        Some(Ok(doc))
    }
}

impl<B: SearchBackend> FusedIterator for SearchPager<B> {}
