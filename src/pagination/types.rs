//! Pagination types and traits
//!
//! Defines the page-fetch capability and the state machine driven by
//! [`aggregate_all`](super::aggregate_all).

use crate::error::Result;
use crate::models::{AggregatedResult, Page};
use async_trait::async_trait;

/// First page number requested by an aggregation
pub const FIRST_PAGE: u32 = 1;

/// Fetches a single page of results for a query.
///
/// The query dialect is a property of the implementation: one fetcher
/// sends structured filters, another sends query-language strings.
#[async_trait]
pub trait PageFetcher<Q: ?Sized + Sync, T: Send + 'static>: Send + Sync {
    /// Fetch page `page` (1-based). An empty result list means "no more data".
    async fn fetch_page(&self, query: &Q, page: u32) -> Result<Page<T>>;
}

/// Where an aggregation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationState {
    /// Waiting for this page number
    Fetching(u32),
    /// An empty page arrived
    Done,
    /// A page fetch failed
    Failed,
}

impl AggregationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Page to request next, if still fetching
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetching(page) => Some(*page),
            _ => None,
        }
    }
}

impl Default for AggregationState {
    fn default() -> Self {
        Self::Fetching(FIRST_PAGE)
    }
}

/// Result of feeding one page to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request this page number next
    Continue(u32),
    /// No more pages
    Done,
}

impl NextPage {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Accumulates results for one aggregation call.
///
/// Owned by a single call; never shared between aggregations.
#[derive(Debug)]
pub struct PageAccumulator<T> {
    state: AggregationState,
    results: Vec<T>,
    pages_fetched: u32,
}

impl<T> PageAccumulator<T> {
    pub fn new() -> Self {
        Self {
            state: AggregationState::default(),
            results: Vec::new(),
            pages_fetched: 0,
        }
    }

    pub fn state(&self) -> AggregationState {
        self.state
    }

    /// Pages received so far, including a terminating empty page
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Items accumulated so far
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Feed the page that was fetched for the current state.
    ///
    /// A non-empty page advances to the next page number; an empty page ends
    /// the aggregation without contributing anything.
    pub fn process_page(&mut self, page: Page<T>) -> NextPage {
        let Some(current) = self.state.page() else {
            return NextPage::Done;
        };
        self.pages_fetched += 1;

        if page.results.is_empty() {
            self.state = AggregationState::Done;
            return NextPage::Done;
        }

        self.results.extend(page.results);
        let next = current + 1;
        self.state = AggregationState::Fetching(next);
        NextPage::Continue(next)
    }

    /// Record a failed fetch, dropping everything accumulated
    pub fn fail(&mut self) {
        self.state = AggregationState::Failed;
        self.results.clear();
    }

    /// Final result; `None` unless the aggregation reached `Done`
    pub fn finish(self) -> Option<AggregatedResult<T>> {
        (self.state == AggregationState::Done).then(|| AggregatedResult::from_results(self.results))
    }
}

impl<T> Default for PageAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}
