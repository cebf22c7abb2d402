//! Offset pagination driver
//!
//! [`PageDriver`] walks a paged endpoint one page at a time, re-running the
//! whole sign-and-send chain for every page (and every retry), so each
//! request carries its own timestamp.
//!
//! ```text
//! Fetching ──ok, page < total──▶ HasMore ──delay──▶ Fetching
//!     │                              │
//!     ├──ok, page >= total──▶ Exhausted
//!     │                              └──max_pages reached: stop, stay HasMore
//!     └──error (after retries)──▶ Failed
//! ```

use futures::future::BoxFuture;
use futures::stream::{self, Stream};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::retry::RetryPolicy;
use crate::types::PagedData;

/// Default page size requested from the server
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Default delay between two page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(200);

/// Position of the driver in the paged result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page to fetch next
    pub current_page: u32,
    pub page_size: u32,
    /// Known once the first page has been received
    pub total_pages: Option<u32>,
}

impl PageCursor {
    fn starting_at(current_page: u32, page_size: u32) -> Self {
        Self {
            current_page,
            page_size,
            total_pages: None,
        }
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// A page request is pending (also the initial state)
    Fetching,
    /// More pages exist on the server
    HasMore,
    /// The last page has been received
    Exhausted,
    /// A page failed after all retries; terminal
    Failed,
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// Pagination behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub page_size: u32,
    /// 1-based page the walk starts from
    pub start_page: u32,
    /// Stop after this many pages (None = until exhausted)
    pub max_pages: Option<u32>,
    /// Pause before each page after the first
    pub delay: Duration,
    /// Retries for a failing page; only transient errors are retried
    pub retry: RetryPolicy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            start_page: 1,
            max_pages: None,
            delay: DEFAULT_PAGE_DELAY,
            retry: RetryPolicy::none(),
        }
    }
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resume a walk from a later page
    pub fn with_start_page(mut self, start_page: u32) -> Self {
        self.start_page = start_page.max(1);
        self
    }

    /// Cap the number of pages fetched (at least one)
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages.max(1));
        self
    }

    /// Set delay between pages
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set retry policy for individual pages
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

type FetchPage<'a, T> =
    Box<dyn FnMut(PageCursor) -> BoxFuture<'a, RestResult<PagedData<T>>> + Send + 'a>;

/// Lazily fetches pages through a caller-supplied page function
pub struct PageDriver<'a, T> {
    fetch_page: FetchPage<'a, T>,
    config: PaginationConfig,
    cursor: PageCursor,
    state: PageState,
    pages_fetched: u32,
}

impl<T> std::fmt::Debug for PageDriver<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDriver")
            .field("config", &self.config)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

impl<'a, T: Send + 'a> PageDriver<'a, T> {
    /// Create a driver starting at `config.start_page`
    pub fn new<F, Fut>(config: PaginationConfig, mut fetch_page: F) -> Self
    where
        F: FnMut(PageCursor) -> Fut + Send + 'a,
        Fut: Future<Output = RestResult<PagedData<T>>> + Send + 'a,
    {
        Self {
            fetch_page: Box::new(move |cursor| -> BoxFuture<'a, RestResult<PagedData<T>>> {
                Box::pin(fetch_page(cursor))
            }),
            cursor: PageCursor::starting_at(config.start_page.max(1), config.page_size),
            config,
            state: PageState::Fetching,
            pages_fetched: 0,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_pages
            .is_some_and(|max| self.pages_fetched >= max)
    }

    /// Fetch the next page
    ///
    /// Returns `None` once the driver is exhausted, has failed, or has
    /// reached `max_pages`. An error is returned at most once; the driver is
    /// `Failed` afterwards.
    pub async fn next_page(&mut self) -> Option<RestResult<PagedData<T>>> {
        match self.state {
            PageState::Exhausted | PageState::Failed => return None,
            _ if self.limit_reached() => {
                debug!(pages = self.pages_fetched, "Page limit reached");
                // Also covers a zero limit hit before the first fetch
                self.state = PageState::HasMore;
                return None;
            }
            PageState::HasMore if !self.config.delay.is_zero() => {
                tokio::time::sleep(self.config.delay).await;
            }
            _ => {}
        }

        self.state = PageState::Fetching;
        let mut retries = 0;
        loop {
            debug!(
                page = self.cursor.current_page,
                page_size = self.cursor.page_size,
                "Fetching page"
            );
            match (self.fetch_page)(self.cursor).await {
                Ok(page) => {
                    self.record(&page);
                    return Some(Ok(page));
                }
                Err(e) if e.is_transient() && self.config.retry.should_retry(retries) => {
                    retries += 1;
                    warn!(
                        page = self.cursor.current_page,
                        attempt = retries,
                        "Page fetch failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.config.retry.delay).await;
                }
                Err(e) => {
                    warn!(page = self.cursor.current_page, "Pagination failed: {}", e);
                    self.state = PageState::Failed;
                    return Some(Err(e));
                }
            }
        }
    }

    fn record(&mut self, page: &PagedData<T>) {
        self.pages_fetched += 1;
        self.cursor.total_pages = Some(page.total_page);

        if self.cursor.current_page >= page.total_page {
            self.state = PageState::Exhausted;
        } else {
            self.state = PageState::HasMore;
            self.cursor.current_page += 1;
        }
    }

    /// Fetch every remaining page
    ///
    /// A failure does not discard the pages already received.
    pub async fn collect(mut self) -> Collected<T> {
        let mut pages = Vec::new();
        let mut error = None;
        while let Some(result) = self.next_page().await {
            match result {
                Ok(page) => pages.push(page),
                Err(e) => error = Some(e),
            }
        }
        Collected {
            pages,
            state: self.state,
            error,
        }
    }

    /// Pages as a stream; dropping the stream stops pagination
    pub fn into_stream(self) -> impl Stream<Item = RestResult<PagedData<T>>> + Send + 'a {
        stream::unfold(self, |mut driver| async move {
            let item = driver.next_page().await?;
            Some((item, driver))
        })
    }
}

/// Result of [`PageDriver::collect`]
#[derive(Debug)]
pub struct Collected<T> {
    pub pages: Vec<PagedData<T>>,
    /// `Exhausted`, `Failed`, or `HasMore` when stopped by `max_pages`
    pub state: PageState,
    /// The error that ended pagination, if any
    pub error: Option<RestError>,
}

impl<T> Collected<T> {
    pub fn is_complete(&self) -> bool {
        self.state == PageState::Exhausted
    }

    /// All items in page order
    pub fn items(self) -> Vec<T> {
        self.pages.into_iter().flat_map(|p| p.items).collect()
    }

    /// All items, or the error if pagination failed
    pub fn into_result(self) -> RestResult<Vec<T>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.pages.into_iter().flat_map(|p| p.items).collect()),
        }
    }
}
