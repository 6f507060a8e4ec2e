//! Pure listing state machine. Every mutation enters through
//! [`ListingState::apply`], which returns the fetch the caller must issue (if
//! any); the driver in `listing.rs` owns the actual I/O. Keeping this core
//! synchronous makes the accumulation and discard rules testable without a
//! runtime.

use crate::source::types::{Meal, MealPage};
use crate::source::SourceError;

use super::filter::MealFilter;

/// A fetch the driver must issue against the meal source. The epoch and page
/// come back attached to the outcome so the state machine can tell current
/// results from leftovers of an abandoned filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCommand {
    pub epoch: u64,
    pub page: u32,
    pub filter: MealFilter,
}

/// Everything that can happen to a listing.
#[derive(Debug, Clone)]
pub enum ListingEvent {
    /// The consumer changed any search criterion. Always starts the listing
    /// over, even if the new filter compares equal to the old one.
    FilterChanged(MealFilter),
    /// The consumer asked to reload the current filter from the start.
    Refreshed,
    /// The consumer scrolled near the end and wants the next page.
    PageRequested,
    /// The consumer asked to re-issue the fetch that last failed.
    RetryRequested,
    FetchSucceeded {
        epoch: u64,
        page: u32,
        result: MealPage,
    },
    FetchFailed {
        epoch: u64,
        page: u32,
        error: SourceError,
    },
}

/// Accumulated listing for one filter epoch.
///
/// Invariants the transitions maintain:
/// - at most one fetch is outstanding at a time (`in_flight`);
/// - pages apply in order because the next page is only requested after the
///   previous one landed (`applied_pages`), and a failure never advances it;
/// - `has_more` is recomputed only from successful responses, so a failure
///   never ends the listing.
pub struct ListingState {
    filter: MealFilter,
    page_size: u32,
    epoch: u64,
    items: Vec<Meal>,
    total: u64,
    has_more: bool,
    applied_pages: u32,
    in_flight: Option<u32>,
    error: Option<SourceError>,
}

impl ListingState {
    /// A state that has not fetched anything yet. The first
    /// `FilterChanged` event opens epoch 1 and requests page 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: MealFilter::default(),
            page_size,
            epoch: 0,
            items: Vec::new(),
            total: 0,
            has_more: true,
            applied_pages: 0,
            in_flight: None,
            error: None,
        }
    }

    pub fn apply(&mut self, event: ListingEvent) -> Option<FetchCommand> {
        match event {
            ListingEvent::FilterChanged(filter) => {
                self.filter = filter;
                Some(self.reset_and_fetch())
            }
            ListingEvent::Refreshed => Some(self.reset_and_fetch()),
            ListingEvent::PageRequested => {
                // Coalesce while a fetch is outstanding, stop at the end of
                // the listing, and do nothing until page 1 has landed (the
                // explicit retry path owns that case).
                if self.in_flight.is_some() || !self.has_more || self.applied_pages == 0 {
                    return None;
                }
                Some(self.issue(self.applied_pages + 1))
            }
            ListingEvent::RetryRequested => {
                if self.in_flight.is_some() || self.error.is_none() {
                    return None;
                }
                Some(self.issue(self.applied_pages + 1))
            }
            ListingEvent::FetchSucceeded {
                epoch,
                page,
                result,
            } => {
                if !self.is_current(epoch, page) {
                    return None;
                }
                self.merge(page, result);
                None
            }
            ListingEvent::FetchFailed { epoch, page, error } => {
                if !self.is_current(epoch, page) {
                    return None;
                }
                self.in_flight = None;
                self.error = Some(error);
                None
            }
        }
    }

    /// Drop everything accumulated for the old criteria and start the new
    /// epoch at page 1. Results still in flight for the old epoch will fail
    /// the `is_current` check when they land.
    fn reset_and_fetch(&mut self) -> FetchCommand {
        self.epoch += 1;
        self.items.clear();
        self.total = 0;
        self.has_more = true;
        self.applied_pages = 0;
        self.error = None;
        self.issue(1)
    }

    fn issue(&mut self, page: u32) -> FetchCommand {
        self.in_flight = Some(page);
        self.error = None;
        FetchCommand {
            epoch: self.epoch,
            page,
            filter: self.filter.clone(),
        }
    }

    fn is_current(&self, epoch: u64, page: u32) -> bool {
        epoch == self.epoch && self.in_flight == Some(page)
    }

    fn merge(&mut self, page: u32, result: MealPage) {
        self.in_flight = None;
        self.error = None;
        if page == 1 {
            self.items = result.meals;
        } else {
            self.items.extend(result.meals);
        }
        self.total = result.total;
        self.applied_pages = page;
        self.has_more = (self.items.len() as u64) < self.total;
    }

    pub fn filter(&self) -> &MealFilter {
        &self.filter
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn items(&self) -> &[Meal] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn applied_pages(&self) -> u32 {
        self.applied_pages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&SourceError> {
        self.error.as_ref()
    }
}
