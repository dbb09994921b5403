use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const MAX_PRICE: i32 = 200_000;

/// A stored product.
///
/// Also the body of a full-replacement update: every field is written, and
/// `id` must equal the id in the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,

    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(range(min = 0, max = 200000, message = "Price must be between 0 and 200000"))]
    pub price: i32,

    #[validate(custom(function = "not_blank", message = "Category is required"))]
    pub category: String,

    #[serde(default)]
    pub shelf: String,

    #[serde(default)]
    pub count: i32,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: String,
}

/// Input for creating a product; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(range(min = 0, max = 200000, message = "Price must be between 0 and 200000"))]
    pub price: i32,

    #[validate(custom(function = "not_blank", message = "Category is required"))]
    pub category: String,

    #[serde(default)]
    pub shelf: String,

    #[serde(default)]
    pub count: i32,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: String,
}

impl CreateProduct {
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
            shelf: self.shelf,
            count: self.count,
            description: self.description,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Externally visible shape of a product returned by list and get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub count: i32,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            count: product.count,
        }
    }
}

/// Aggregates over the whole collection.
///
/// `average_price` is `None` (JSON `null`) when there are no products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total_count: i64,
    pub total_value: i64,
    pub average_price: Option<f64>,
}

impl ProductStats {
    /// Compute stats in memory. Sums are widened to `i64` before multiplying.
    pub fn compute<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut rows = 0i64;
        let mut price_sum = 0i64;
        let mut total_count = 0i64;
        let mut total_value = 0i64;

        for product in products {
            rows += 1;
            price_sum += i64::from(product.price);
            total_count += i64::from(product.count);
            total_value += i64::from(product.count) * i64::from(product.price);
        }

        Self {
            total_count,
            total_value,
            average_price: (rows > 0).then(|| price_sum as f64 / rows as f64),
        }
    }
}

/// Query description handed to the repository.
///
/// Results are always projected to [`ProductSummary`] in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub id: Option<i32>,
}

impl ProductQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// An empty category string means no filter.
    pub fn in_category(category: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            id: None,
        }
    }

    pub fn by_id(id: i32) -> Self {
        Self {
            category: None,
            id: Some(id),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.id.is_none_or(|id| product.id == id)
            && self
                .category
                .as_deref()
                .is_none_or(|category| product.category == category)
    }
}

/// Result of a full-replacement write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The write did not apply: the row changed or vanished underneath it.
    Conflict,
}

/// Query parameters for listing products.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Only return products in this category (exact match)
    pub category_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> CreateProduct {
        CreateProduct {
            name: "Widget".to_string(),
            price: 500,
            category: "Hardware".to_string(),
            shelf: "A1".to_string(),
            count: 10,
            description: String::new(),
        }
    }

    #[test]
    fn test_create_product_valid() {
        assert!(widget().validate().is_ok());
    }

    #[test]
    fn test_name_too_short() {
        let input = CreateProduct {
            name: "A".to_string(),
            ..widget()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_name_length_counts_characters() {
        let input = CreateProduct {
            name: "ü".repeat(100),
            ..widget()
        };
        assert!(input.validate().is_ok());

        let input = CreateProduct {
            name: "x".repeat(101),
            ..widget()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_blank_name_and_category_rejected() {
        let input = CreateProduct {
            name: "   ".to_string(),
            category: String::new(),
            ..widget()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("category"));
    }

    #[test]
    fn test_price_bounds() {
        for price in [0, MAX_PRICE] {
            let input = CreateProduct { price, ..widget() };
            assert!(input.validate().is_ok(), "price {} should be valid", price);
        }
        for price in [-1, MAX_PRICE + 1] {
            let input = CreateProduct { price, ..widget() };
            assert!(input.validate().is_err(), "price {} should be invalid", price);
        }
    }

    #[test]
    fn test_description_limit() {
        let input = CreateProduct {
            description: "d".repeat(501),
            ..widget()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_create_product_defaults_optional_fields() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"name":"Bolt","price":5,"category":"Hardware"}"#).unwrap();
        assert_eq!(input.shelf, "");
        assert_eq!(input.count, 0);
        assert_eq!(input.description, "");
    }

    #[test]
    fn test_stats_compute() {
        let products = [
            widget().into_product(1),
            CreateProduct {
                price: 1500,
                count: 2,
                ..widget()
            }
            .into_product(2),
        ];

        let stats = ProductStats::compute(&products);
        assert_eq!(stats.total_count, 12);
        assert_eq!(stats.total_value, 10 * 500 + 2 * 1500);
        assert_eq!(stats.average_price, Some(1000.0));
    }

    #[test]
    fn test_stats_empty_collection() {
        let stats = ProductStats::compute(&[]);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.total_value, 0);
        assert_eq!(stats.average_price, None);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"totalCount": 0, "totalValue": 0, "averagePrice": null})
        );
    }

    #[test]
    fn test_stats_total_value_does_not_overflow_i32() {
        let products = [CreateProduct {
            price: MAX_PRICE,
            count: 1_000_000,
            ..widget()
        }
        .into_product(1)];

        let stats = ProductStats::compute(&products);
        assert_eq!(stats.total_value, 200_000_000_000);
    }

    #[test]
    fn test_query_matches() {
        let product = widget().into_product(7);

        assert!(ProductQuery::all().matches(&product));
        assert!(ProductQuery::by_id(7).matches(&product));
        assert!(!ProductQuery::by_id(8).matches(&product));
        assert!(ProductQuery::in_category(Some("Hardware".into())).matches(&product));
        assert!(!ProductQuery::in_category(Some("hardware".into())).matches(&product));
        assert_eq!(ProductQuery::in_category(Some(String::new())), ProductQuery::all());
    }

    #[test]
    fn test_summary_serializes_camel_case_without_internal_fields() {
        let summary = ProductSummary::from(&widget().into_product(3));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "name": "Widget", "price": 500, "count": 10})
        );
    }
}
