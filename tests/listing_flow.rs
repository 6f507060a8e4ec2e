//! Integration tests for listing accumulation: page growth, filter resets,
//! and recovery after failed fetches, all against the deterministic fixture
//! catalog.

use std::sync::Arc;

use hostelbite::engine::{CategoryFilter, Listing, MealFilter, SortKey, SortOrder, SortSpec};
use hostelbite::source::fixture::FixtureSource;
use hostelbite::source::types::{Meal, MealCategory};
use hostelbite::source::{MealSource, SourceError};

fn item_ids(items: &[Meal]) -> Vec<String> {
    items.iter().map(|m| m.id.clone()).collect()
}

fn catalog_meal(id: u32, title: &str, category: &str, price: f64, likes: u32) -> Meal {
    Meal {
        id: format!("meal-{id}"),
        title: title.to_string(),
        category: category.to_string(),
        image: String::new(),
        ingredients: String::new(),
        description: String::new(),
        price,
        distributor_name: String::new(),
        distributor_email: String::new(),
        rating: 4.0,
        likes,
        reviews_count: likes / 5,
        post_time: None,
    }
}

/// Fifteen meals: ids 1..=15, lunches on even ids, likes descending with id.
fn catalog() -> Vec<Meal> {
    (1..=15)
        .map(|i| {
            let category = if i % 2 == 0 { "Lunch" } else { "Dinner" };
            catalog_meal(i, &format!("Meal {i}"), category, 50.0 + i as f64 * 10.0, 160 - i * 10)
        })
        .collect()
}

#[tokio::test]
async fn test_single_page_catalog_completes_immediately() {
    // 1. Six meals, page size six: everything fits in the first response.
    let meals: Vec<Meal> = catalog().into_iter().take(6).collect();
    let source = Arc::new(FixtureSource::new(meals));
    let mut listing = Listing::new(source, MealFilter::default(), 6);
    listing.drive().await;

    assert_eq!(listing.items().len(), 6);
    assert_eq!(listing.total(), 6);
    assert!(!listing.has_more());
    assert!(!listing.is_loading());

    // 2. Asking for more is a no-op; no request even goes out.
    listing.request_next_page();
    assert!(!listing.has_pending_io());
}

#[tokio::test]
async fn test_pages_accumulate_in_order() {
    let source = Arc::new(FixtureSource::new(catalog()));
    let mut listing = Listing::new(source, MealFilter::default(), 6);

    // Page 1: six of fifteen.
    listing.drive().await;
    assert_eq!(listing.items().len(), 6);
    assert!(listing.has_more());

    // Page 2: twelve of fifteen.
    listing.request_next_page();
    listing.drive().await;
    assert_eq!(listing.items().len(), 12);
    assert!(listing.has_more());

    // Page 3: the short final page closes the listing.
    listing.request_next_page();
    listing.drive().await;
    assert_eq!(listing.items().len(), 15);
    assert!(!listing.has_more());

    let expected: Vec<String> = (1..=15).map(|i| format!("meal-{i}")).collect();
    assert_eq!(item_ids(listing.items()), expected);
}

#[tokio::test]
async fn test_category_change_restarts_listing() {
    let source = Arc::new(FixtureSource::new(catalog()));
    let mut listing = Listing::new(source, MealFilter::default(), 6);
    listing.drive().await;
    listing.request_next_page();
    listing.drive().await;
    assert_eq!(listing.items().len(), 12);

    let lunch = MealFilter {
        category: CategoryFilter::Only(MealCategory::Lunch),
        ..MealFilter::default()
    };
    listing.set_filter(lunch);
    assert!(listing.items().is_empty());

    listing.drive().await;
    assert_eq!(listing.items().len(), 6);
    assert_eq!(listing.total(), 7);
    assert!(listing.has_more());
    assert!(listing.items().iter().all(|m| m.category == "Lunch"));
}

#[tokio::test]
async fn test_search_narrows_results() {
    let mut meals = catalog();
    meals.push(catalog_meal(99, "Beef Tehari", "Lunch", 180.0, 300));
    let source = Arc::new(FixtureSource::new(meals));

    let filter = MealFilter {
        search: "tehari".to_string(),
        ..MealFilter::default()
    };
    let mut listing = Listing::new(source, filter, 6);
    listing.drive().await;

    assert_eq!(listing.items().len(), 1);
    assert_eq!(listing.items()[0].id, "meal-99");
    assert!(!listing.has_more());
}

#[tokio::test]
async fn test_price_band_excludes_meals() {
    // Catalog prices run 60..=200 in steps of 10.
    let source = Arc::new(FixtureSource::new(catalog()));
    let filter = MealFilter {
        min_price: 100.0,
        max_price: 130.0,
        ..MealFilter::default()
    };
    let mut listing = Listing::new(source, filter, 6);
    listing.drive().await;

    assert_eq!(listing.items().len(), 4);
    assert!(listing
        .items()
        .iter()
        .all(|m| m.price >= 100.0 && m.price <= 130.0));
}

#[tokio::test]
async fn test_sort_order_spans_page_boundaries() {
    let source = Arc::new(FixtureSource::new(catalog()));
    let filter = MealFilter {
        sort: Some(SortSpec {
            key: SortKey::Likes,
            order: SortOrder::Asc,
        }),
        ..MealFilter::default()
    };
    let mut listing = Listing::new(source, filter, 6);
    listing.drive().await;
    listing.request_next_page();
    listing.drive().await;
    listing.request_next_page();
    listing.drive().await;

    // Appending pages must preserve the source ordering end to end.
    let likes: Vec<u32> = listing.items().iter().map(|m| m.likes).collect();
    let mut sorted = likes.clone();
    sorted.sort_unstable();
    assert_eq!(likes, sorted);
    assert_eq!(likes.len(), 15);
}

#[tokio::test]
async fn test_failed_page_keeps_accumulated_and_recovers() {
    let source = Arc::new(FixtureSource::new(catalog()));
    let mut listing = Listing::new(
        Arc::clone(&source) as Arc<dyn MealSource>,
        MealFilter::default(),
        6,
    );
    listing.drive().await;
    assert_eq!(listing.items().len(), 6);

    // 1. Page 2 fails: accumulated items stay, error is surfaced.
    source.inject_failure(SourceError::Transport("connection reset".to_string()));
    listing.request_next_page();
    listing.drive().await;
    assert_eq!(listing.items().len(), 6);
    assert!(listing.has_more());
    assert_eq!(
        listing.error(),
        Some(&SourceError::Transport("connection reset".to_string()))
    );

    // 2. Retry goes back to the same page and extends the listing.
    listing.retry();
    listing.drive().await;
    assert_eq!(listing.items().len(), 12);
    assert!(listing.error().is_none());
    assert_eq!(source.fetch_calls(), 3);
}

#[tokio::test]
async fn test_initial_failure_blocks_paging_until_retry() {
    let source = Arc::new(FixtureSource::new(catalog()));
    source.inject_failure(SourceError::Status {
        code: 500,
        body: "internal error".to_string(),
    });
    let mut listing = Listing::new(
        Arc::clone(&source) as Arc<dyn MealSource>,
        MealFilter::default(),
        6,
    );

    // 1. Page 1 fails: empty listing with a visible error.
    listing.drive().await;
    assert!(listing.items().is_empty());
    assert!(matches!(
        listing.error(),
        Some(SourceError::Status { code: 500, .. })
    ));

    // 2. Scrolling cannot skip past the missing first page.
    listing.request_next_page();
    assert!(!listing.has_pending_io());
    assert_eq!(source.fetch_calls(), 1);

    // 3. Retry re-issues page 1.
    listing.retry();
    listing.drive().await;
    assert_eq!(listing.items().len(), 6);
    assert_eq!(listing.applied_pages(), 1);
    assert!(listing.error().is_none());
}

#[tokio::test]
async fn test_refresh_reloads_current_filter() {
    let source = Arc::new(FixtureSource::new(catalog()));
    let lunch = MealFilter {
        category: CategoryFilter::Only(MealCategory::Lunch),
        ..MealFilter::default()
    };
    let mut listing = Listing::new(source, lunch.clone(), 6);
    listing.drive().await;
    listing.request_next_page();
    listing.drive().await;
    assert_eq!(listing.items().len(), 7);

    listing.refresh();
    assert!(listing.items().is_empty());
    assert_eq!(listing.filter(), &lunch);

    listing.drive().await;
    assert_eq!(listing.items().len(), 6);
    assert_eq!(listing.applied_pages(), 1);
    assert!(listing.has_more());
}
