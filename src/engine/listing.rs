//! Async driver around [`ListingState`]. It issues the fetches the state
//! machine asks for, keeps abandoned-epoch fetches running to completion
//! (sources are not cancelled, their results are discarded on arrival), and
//! feeds outcomes back in as events.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::source::types::{Meal, MealPage};
use crate::source::{MealSource, SourceError};

use super::filter::MealFilter;
use super::state::{FetchCommand, ListingEvent, ListingState};

struct FetchOutcome {
    epoch: u64,
    page: u32,
    result: Result<MealPage, SourceError>,
}

/// One consumer-facing meal listing: accumulated items plus the fetch loop
/// driving them. Mutators are synchronous and cheap; [`Listing::drive`] does
/// the awaiting.
pub struct Listing {
    source: Arc<dyn MealSource>,
    state: ListingState,
    pending: FuturesUnordered<BoxFuture<'static, FetchOutcome>>,
}

/// Point-in-time copy of a listing, cheap enough to publish on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub items: Vec<Meal>,
    pub total: u64,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<SourceError>,
    pub filter: MealFilter,
}

impl Listing {
    /// Create a listing and immediately request page 1 of `filter`. The
    /// fetch is queued, not awaited; call [`Listing::drive`] to land it.
    pub fn new(source: Arc<dyn MealSource>, filter: MealFilter, page_size: u32) -> Self {
        let mut listing = Self {
            source,
            state: ListingState::new(page_size),
            pending: FuturesUnordered::new(),
        };
        listing.dispatch(ListingEvent::FilterChanged(filter));
        listing
    }

    /// Replace the search criteria. Accumulated items are dropped right away;
    /// anything still in flight for the old criteria is ignored when it lands.
    pub fn set_filter(&mut self, filter: MealFilter) {
        self.dispatch(ListingEvent::FilterChanged(filter));
    }

    /// Ask for the page after the last applied one. Ignored while a fetch is
    /// outstanding, once the listing is complete, or before page 1 landed.
    pub fn request_next_page(&mut self) {
        self.dispatch(ListingEvent::PageRequested);
    }

    /// Re-issue the fetch behind the current error, if any.
    pub fn retry(&mut self) {
        self.dispatch(ListingEvent::RetryRequested);
    }

    /// Reload the current filter from page 1.
    pub fn refresh(&mut self) {
        self.dispatch(ListingEvent::Refreshed);
    }

    /// Wait for one queued fetch to complete and apply its outcome.
    ///
    /// Cancel-safe, so it can sit in a `select!` arm. Callers gate on
    /// [`Listing::has_pending_io`]; driving an idle listing parks forever.
    pub async fn drive(&mut self) {
        let Some(outcome) = self.pending.next().await else {
            std::future::pending::<()>().await;
            return;
        };

        let FetchOutcome {
            epoch,
            page,
            result,
        } = outcome;
        if epoch != self.state.epoch() {
            tracing::debug!(epoch, page, "discarding response from abandoned filter");
            return;
        }
        let event = match result {
            Ok(result) => ListingEvent::FetchSucceeded {
                epoch,
                page,
                result,
            },
            Err(error) => {
                tracing::warn!(epoch, page, error = %error, "meal fetch failed");
                ListingEvent::FetchFailed { epoch, page, error }
            }
        };
        self.dispatch(event);
    }

    fn dispatch(&mut self, event: ListingEvent) {
        if let Some(command) = self.state.apply(event) {
            tracing::debug!(
                epoch = command.epoch,
                page = command.page,
                "issuing meal fetch"
            );
            self.spawn_fetch(command);
        }
    }

    fn spawn_fetch(&mut self, command: FetchCommand) {
        let FetchCommand {
            epoch,
            page,
            filter,
        } = command;
        let source = Arc::clone(&self.source);
        let page_size = self.state.page_size();
        self.pending.push(Box::pin(async move {
            let result = source.fetch_page(&filter, page, page_size).await;
            FetchOutcome {
                epoch,
                page,
                result,
            }
        }));
    }

    /// True while any fetch is unresolved, including abandoned-epoch ones
    /// that only remain to be drained and discarded.
    pub fn has_pending_io(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn items(&self) -> &[Meal] {
        self.state.items()
    }

    pub fn total(&self) -> u64 {
        self.state.total()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// True only while the current epoch has a fetch outstanding; a draining
    /// abandoned fetch does not count as loading.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&SourceError> {
        self.state.error()
    }

    pub fn filter(&self) -> &MealFilter {
        self.state.filter()
    }

    pub fn applied_pages(&self) -> u32 {
        self.state.applied_pages()
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            items: self.state.items().to_vec(),
            total: self.state.total(),
            has_more: self.state.has_more(),
            loading: self.state.is_loading(),
            error: self.state.error().cloned(),
            filter: self.state.filter().clone(),
        }
    }
}
