use std::fmt;

use crate::source::types::MealCategory;

/// Category criterion. `All` is a real value on the wire, not an absent
/// param, so it gets its own arm instead of an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(MealCategory),
}

impl CategoryFilter {
    pub fn query_value(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Likes,
    ReviewsCount,
}

impl SortKey {
    pub fn query_value(&self) -> &'static str {
        match self {
            SortKey::Likes => "likes",
            SortKey::ReviewsCount => "reviews_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn query_value(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key.query_value(), self.order.query_value())
    }
}

/// Complete search criteria for one listing. Two filters comparing equal
/// would produce the same result set, which is what makes the equality
/// derive worth having.
#[derive(Debug, Clone, PartialEq)]
pub struct MealFilter {
    pub search: String,
    pub category: CategoryFilter,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: Option<SortSpec>,
}

impl Default for MealFilter {
    /// The browse view's starting point: everything, cheapest-possible floor
    /// to the service's advertised ceiling, catalog order.
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            min_price: 0.0,
            max_price: 9999.0,
            sort: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_matches_service_defaults() {
        let filter = MealFilter::default();
        assert!(filter.search.is_empty());
        assert_eq!(filter.category, CategoryFilter::All);
        assert_eq!(filter.min_price, 0.0);
        assert_eq!(filter.max_price, 9999.0);
        assert!(filter.sort.is_none());
    }

    #[test]
    fn test_query_values_match_wire_strings() {
        assert_eq!(CategoryFilter::All.query_value(), "All");
        assert_eq!(
            CategoryFilter::Only(MealCategory::Breakfast).query_value(),
            "Breakfast"
        );
        assert_eq!(SortKey::ReviewsCount.query_value(), "reviews_count");
        assert_eq!(SortOrder::Asc.query_value(), "asc");
        let sort = SortSpec {
            key: SortKey::Likes,
            order: SortOrder::Desc,
        };
        assert_eq!(sort.to_string(), "likes desc");
    }
}
