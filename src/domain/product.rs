use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A product row as served by the product API.
///
/// `id` is the stable identity used for membership checks inside the listing
/// pipeline, `uri` is the routing slug used for external lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub uri: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    /// Present only when a discount applies
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub rating: f64,
}

impl Product {
    /// Price the customer actually pays: the discounted price when a discount
    /// applies, the regular price otherwise.
    pub fn effective_price(&self) -> f64 {
        self.discounted_price.unwrap_or(self.price)
    }

    pub fn is_discounted(&self) -> bool {
        self.discounted_price.is_some()
    }

    /// Exact category match, as the product API scopes by category.
    pub fn in_category(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Normalizes a category parameter: absent and empty both mean "all products".
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, discounted_price: Option<f64>) -> Product {
        Product {
            id: 1,
            uri: "runner-x".to_string(),
            category: "shoes".to_string(),
            title: "Runner X".to_string(),
            description: "Lightweight running shoe".to_string(),
            image: "/img/runner-x.png".to_string(),
            price,
            discounted_price,
            rating: 4.5,
        }
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        assert!((product(100.0, Some(80.0)).effective_price() - 80.0).abs() < f64::EPSILON);
        assert!((product(100.0, None).effective_price() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_discounted_price_deserializes_as_none() {
        let json = r#"{"id":7,"uri":"cap","category":"hats","title":"Cap","description":"d",
            "image":"i","price":12.5,"rating":3}"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.discounted_price, None);
        assert!(!parsed.is_discounted());
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(None), None);
        assert_eq!(normalize_category(Some("")), None);
        assert_eq!(normalize_category(Some("  ")), None);
        assert_eq!(normalize_category(Some("shoes")), Some("shoes".to_string()));
    }
}
