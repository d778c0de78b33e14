// shopkeep/src/models/product.rs

use super::Money;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Product {
  pub product_id: i64,
  pub name: String,
  #[sqlx(rename = "price_cents")]
  pub price: Money,
  /// Units available to add to carts. Never negative after a committed write.
  pub stock_quantity: i64,
  pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
  pub category_id: i64,
  pub category_name: String,
  /// Free-form band such as "10-50", matched exactly by search.
  pub price_range: String,
}

/// A product joined with its category, as shown by catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ProductListing {
  pub product_id: i64,
  pub name: String,
  #[sqlx(rename = "price_cents")]
  pub price: Money,
  pub stock_quantity: i64,
  pub category_name: Option<String>,
  pub price_range: Option<String>,
}

/// Catalog search filters; `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSearch {
  pub category: Option<String>,
  pub price_range: Option<String>,
  /// Case-insensitive substring of the product name.
  pub name_contains: Option<String>,
}

impl ProductSearch {
  /// Builds a filter from raw prompt answers, treating blank answers as "any".
  pub fn from_inputs(category: &str, price_range: &str, name_contains: &str) -> Self {
    let non_blank = |s: &str| {
      let t = s.trim();
      (!t.is_empty()).then(|| t.to_string())
    };
    Self {
      category: non_blank(category),
      price_range: non_blank(price_range),
      name_contains: non_blank(name_contains),
    }
  }
}
