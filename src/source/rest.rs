use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::types::{MealPage, MealsPayload};
use super::{MealSource, SourceError};
use crate::config::ApiConfig;
use crate::engine::filter::MealFilter;

/// How much of an error body is worth keeping on a status failure.
const BODY_SNIPPET_LEN: usize = 200;

/// Listing client for the hosted HostelBite service.
pub struct RestMealSource {
    client: Client,
    base_url: String,
}

impl RestMealSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MealSource for RestMealSource {
    async fn fetch_page(
        &self,
        filter: &MealFilter,
        page: u32,
        page_size: u32,
    ) -> Result<MealPage, SourceError> {
        let url = format!("{}/all-meals", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&listing_params(filter, page, page_size))
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                code: status.as_u16(),
                body: snippet(&body),
            });
        }

        let payload: MealsPayload = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        payload.validate()
    }
}

/// Query pairs for a listing request. The whole filter is sent on every
/// request, matching what the service expects; sort params only when a sort
/// is active.
fn listing_params(filter: &MealFilter, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("search", filter.search.clone()),
        ("category", filter.category.query_value().to_string()),
        ("min", filter.min_price.to_string()),
        ("max", filter.max_price.to_string()),
        ("page", page.to_string()),
        ("limit", page_size.to_string()),
    ];
    if let Some(sort) = filter.sort {
        params.push(("sortBy", sort.key.query_value().to_string()));
        params.push(("order", sort.order.query_value().to_string()));
    }
    params
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter::{CategoryFilter, SortKey, SortOrder, SortSpec};
    use crate::source::types::MealCategory;

    #[test]
    fn test_default_filter_sends_full_param_set() {
        let params = listing_params(&MealFilter::default(), 1, 6);
        assert_eq!(
            params,
            vec![
                ("search", "".to_string()),
                ("category", "All".to_string()),
                ("min", "0".to_string()),
                ("max", "9999".to_string()),
                ("page", "1".to_string()),
                ("limit", "6".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_params_appended_when_active() {
        let filter = MealFilter {
            sort: Some(SortSpec {
                key: SortKey::Likes,
                order: SortOrder::Desc,
            }),
            ..MealFilter::default()
        };
        let params = listing_params(&filter, 3, 6);
        assert_eq!(params[6], ("sortBy", "likes".to_string()));
        assert_eq!(params[7], ("order", "desc".to_string()));
    }

    #[test]
    fn test_narrowed_filter_values_pass_through() {
        let filter = MealFilter {
            search: "beef tehari".to_string(),
            category: CategoryFilter::Only(MealCategory::Lunch),
            min_price: 50.0,
            max_price: 250.5,
            sort: None,
        };
        let params = listing_params(&filter, 2, 6);
        assert_eq!(params[0], ("search", "beef tehari".to_string()));
        assert_eq!(params[1], ("category", "Lunch".to_string()));
        assert_eq!(params[2], ("min", "50".to_string()));
        assert_eq!(params[3], ("max", "250.5".to_string()));
        assert_eq!(params[4], ("page", "2".to_string()));
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let long = "৳".repeat(200);
        let cut = snippet(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < long.len());

        let short = "not found";
        assert_eq!(snippet(short), short);
    }
}
