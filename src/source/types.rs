use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::SourceError;

/// A meal document as the service returns it. Listing responses embed these
/// under `meals`; the engine never inspects anything beyond what the browser
/// renders, so unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meal {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub distributor_name: String,
    #[serde(default)]
    pub distributor_email: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub post_time: Option<DateTime<Utc>>,
}

/// One validated page of listing results: the page's meals plus the total
/// match count across all pages for the same filter.
#[derive(Debug, Clone, PartialEq)]
pub struct MealPage {
    pub meals: Vec<Meal>,
    pub total: u64,
}

/// Raw wire shape of `GET /all-meals`. Both fields are optional so that a
/// half-formed body decodes far enough to be rejected with a useful message
/// instead of a generic serde error.
#[derive(Debug, Deserialize)]
pub struct MealsPayload {
    pub meals: Option<Vec<Meal>>,
    pub total: Option<u64>,
}

impl MealsPayload {
    pub fn validate(self) -> Result<MealPage, SourceError> {
        let meals = self
            .meals
            .ok_or_else(|| SourceError::Malformed("response missing `meals` array".to_string()))?;
        let total = self
            .total
            .ok_or_else(|| SourceError::Malformed("response missing `total` count".to_string()))?;
        Ok(MealPage { meals, total })
    }
}

/// The three categories the service publishes meals under. The category
/// filter adds an "All" value on top of these; see `CategoryFilter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealCategory {
    pub const ALL: [MealCategory; 3] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
    ];

    /// Exact string the service uses in meal documents and query params.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
        }
    }
}

impl std::fmt::Display for MealCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_deserializes_full_document() {
        let raw = r#"{
            "_id": "665f1c2ab8d34e0012a77001",
            "title": "Beef Tehari",
            "category": "Lunch",
            "image": "https://i.ibb.co/x3JkQpq/beef-tehari.jpg",
            "ingredients": "Beef, aromatic rice, mustard oil, green chili",
            "description": "Old Dhaka style tehari cooked in mustard oil.",
            "price": 180.0,
            "distributor_name": "Rahim Uddin",
            "distributor_email": "rahim@hostelbite.app",
            "rating": 4.6,
            "likes": 210,
            "reviews_count": 34,
            "post_time": "2024-06-04T09:30:00Z"
        }"#;
        let meal: Meal = serde_json::from_str(raw).unwrap();
        assert_eq!(meal.id, "665f1c2ab8d34e0012a77001");
        assert_eq!(meal.category, "Lunch");
        assert_eq!(meal.likes, 210);
        assert!(meal.post_time.is_some());
    }

    #[test]
    fn test_meal_tolerates_sparse_document() {
        // Older documents predate ratings and timestamps.
        let raw = r#"{"_id": "abc", "title": "Khichuri", "price": 90}"#;
        let meal: Meal = serde_json::from_str(raw).unwrap();
        assert_eq!(meal.rating, 0.0);
        assert_eq!(meal.likes, 0);
        assert!(meal.post_time.is_none());
        assert!(meal.category.is_empty());
    }

    #[test]
    fn test_payload_validates_complete_body() {
        let raw = r#"{"meals": [], "total": 42}"#;
        let payload: MealsPayload = serde_json::from_str(raw).unwrap();
        let page = payload.validate().unwrap();
        assert!(page.meals.is_empty());
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_payload_rejects_missing_fields() {
        let no_meals: MealsPayload = serde_json::from_str(r#"{"total": 3}"#).unwrap();
        assert!(matches!(no_meals.validate(), Err(SourceError::Malformed(_))));

        let no_total: MealsPayload = serde_json::from_str(r#"{"meals": []}"#).unwrap();
        assert!(matches!(no_total.validate(), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_category_round_trips_service_strings() {
        for category in MealCategory::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
        assert_eq!(MealCategory::Breakfast.as_str(), "Breakfast");
    }
}
