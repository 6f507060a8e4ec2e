pub mod filter;
pub mod listing;
pub mod state;

pub use filter::{CategoryFilter, MealFilter, SortKey, SortOrder, SortSpec};
pub use listing::{Listing, ListingSnapshot};
pub use state::{FetchCommand, ListingEvent, ListingState};
