//! Deterministic in-memory catalog used for offline runs and tests. It
//! mirrors the hosted service's listing semantics (title search, category
//! match, inclusive price band, optional sort, then pagination) so the engine
//! behaves identically against either source.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::types::{Meal, MealPage};
use super::{MealSource, SourceError};
use crate::engine::filter::{CategoryFilter, MealFilter, SortKey, SortOrder};

const EMBEDDED_CATALOG: &str = include_str!("../../data/meals.json");

pub struct FixtureSource {
    meals: Vec<Meal>,
    latency: Option<Duration>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    injected_failures: VecDeque<SourceError>,
    fetch_calls: u32,
}

impl FixtureSource {
    pub fn new(meals: Vec<Meal>) -> Self {
        Self {
            meals,
            latency: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Catalog shipped inside the binary, for `--offline` runs.
    pub fn from_embedded() -> Result<Self> {
        let meals: Vec<Meal> =
            serde_json::from_str(EMBEDDED_CATALOG).context("Failed to parse embedded catalog")?;
        Ok(Self::new(meals))
    }

    /// Delay every fetch, so the offline browser still exercises loading
    /// states the way the hosted service does.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue an error for upcoming fetches; each injected failure is
    /// consumed by exactly one call.
    pub fn inject_failure(&self, error: SourceError) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.injected_failures.push_back(error);
        }
    }

    pub fn fetch_calls(&self) -> u32 {
        if let Ok(inner) = self.inner.lock() {
            inner.fetch_calls
        } else {
            0
        }
    }

    fn filtered(&self, filter: &MealFilter) -> Vec<Meal> {
        let needle = filter.search.to_lowercase();
        let mut meals: Vec<Meal> = self
            .meals
            .iter()
            .filter(|meal| needle.is_empty() || meal.title.to_lowercase().contains(&needle))
            .filter(|meal| match filter.category {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => meal.category == category.as_str(),
            })
            .filter(|meal| meal.price >= filter.min_price && meal.price <= filter.max_price)
            .cloned()
            .collect();
        if let Some(sort) = filter.sort {
            // Stable sort keeps catalog order for ties.
            match (sort.key, sort.order) {
                (SortKey::Likes, SortOrder::Asc) => meals.sort_by_key(|m| m.likes),
                (SortKey::Likes, SortOrder::Desc) => meals.sort_by(|a, b| b.likes.cmp(&a.likes)),
                (SortKey::ReviewsCount, SortOrder::Asc) => {
                    meals.sort_by_key(|m| m.reviews_count)
                }
                (SortKey::ReviewsCount, SortOrder::Desc) => {
                    meals.sort_by(|a, b| b.reviews_count.cmp(&a.reviews_count))
                }
            }
        }
        meals
    }
}

#[async_trait]
impl MealSource for FixtureSource {
    async fn fetch_page(
        &self,
        filter: &MealFilter,
        page: u32,
        page_size: u32,
    ) -> Result<MealPage, SourceError> {
        let injected = if let Ok(mut inner) = self.inner.lock() {
            inner.fetch_calls += 1;
            inner.injected_failures.pop_front()
        } else {
            None
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = injected {
            return Err(error);
        }

        let matches = self.filtered(filter);
        let total = matches.len() as u64;
        let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let meals = matches
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(MealPage { meals, total })
    }
}
