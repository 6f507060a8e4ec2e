use hostelbite::engine::{
    CategoryFilter, ListingSnapshot, MealFilter, SortKey, SortOrder, SortSpec,
};
use hostelbite::source::types::{Meal, MealCategory};

/// Step for the price band keys.
pub const PRICE_STEP: f64 = 50.0;

/// Everything the browse screen needs to draw: the latest listing snapshot
/// plus view-local state (filter widgets being edited, selection, detail
/// focus). The listing task owns the data; this owns the cursor.
pub struct BrowseUi {
    pub snapshot: ListingSnapshot,
    pub search: String,
    pub search_mode: bool,
    pub category: CategoryFilter,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: Option<SortSpec>,
    pub selected: usize,
    pub show_detail: bool,
    pub offline: bool,
}

impl BrowseUi {
    pub fn new(snapshot: ListingSnapshot, offline: bool) -> Self {
        let filter = snapshot.filter.clone();
        Self {
            snapshot,
            search: filter.search,
            search_mode: false,
            category: filter.category,
            min_price: filter.min_price,
            max_price: filter.max_price,
            sort: filter.sort,
            selected: 0,
            show_detail: false,
            offline,
        }
    }

    /// The filter the widgets currently describe, ready to send out.
    pub fn filter(&self) -> MealFilter {
        MealFilter {
            search: self.search.clone(),
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: ListingSnapshot) {
        self.snapshot = snapshot;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot.items.len();
        if len == 0 {
            self.selected = 0;
            self.show_detail = false;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn selected_meal(&self) -> Option<&Meal> {
        self.snapshot.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.snapshot.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_top(&mut self) {
        self.selected = 0;
    }

    pub fn select_bottom(&mut self) {
        self.selected = self.snapshot.items.len().saturating_sub(1);
    }

    /// True when the selection sits close enough to the bottom that the next
    /// page should be on its way.
    pub fn near_end(&self, prefetch: usize) -> bool {
        let len = self.snapshot.items.len();
        len > 0 && self.selected + prefetch + 1 >= len
    }

    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            CategoryFilter::All => CategoryFilter::Only(MealCategory::Breakfast),
            CategoryFilter::Only(MealCategory::Breakfast) => {
                CategoryFilter::Only(MealCategory::Lunch)
            }
            CategoryFilter::Only(MealCategory::Lunch) => {
                CategoryFilter::Only(MealCategory::Dinner)
            }
            CategoryFilter::Only(MealCategory::Dinner) => CategoryFilter::All,
        };
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            None => Some(SortSpec {
                key: SortKey::Likes,
                order: SortOrder::Desc,
            }),
            Some(SortSpec {
                key: SortKey::Likes,
                order: SortOrder::Desc,
            }) => Some(SortSpec {
                key: SortKey::Likes,
                order: SortOrder::Asc,
            }),
            Some(SortSpec {
                key: SortKey::Likes,
                order: SortOrder::Asc,
            }) => Some(SortSpec {
                key: SortKey::ReviewsCount,
                order: SortOrder::Desc,
            }),
            Some(SortSpec {
                key: SortKey::ReviewsCount,
                order: SortOrder::Desc,
            }) => Some(SortSpec {
                key: SortKey::ReviewsCount,
                order: SortOrder::Asc,
            }),
            Some(SortSpec {
                key: SortKey::ReviewsCount,
                order: SortOrder::Asc,
            }) => None,
        };
    }

    pub fn adjust_min(&mut self, delta: f64) {
        self.min_price = (self.min_price + delta).clamp(0.0, self.max_price);
    }

    pub fn adjust_max(&mut self, delta: f64) {
        self.max_price = (self.max_price + delta).clamp(self.min_price, 9999.0);
    }

    pub fn push_search(&mut self, ch: char) {
        self.search.push(ch);
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
    }
}
