// shopkeep/src/db/seed.rs

use crate::db::catalog::{self, NewProduct};
use crate::errors::Result;
use crate::models::Money;
use sqlx::sqlite::SqlitePool;
use tracing::info;

const DEMO_CATEGORIES: &[(&str, &str)] = &[("Electronics", "50-500"), ("Books", "5-50"), ("Kitchen", "10-100")];

// (name, price in cents, stock, index into DEMO_CATEGORIES)
const DEMO_PRODUCTS: &[(&str, i64, i64, usize)] = &[
  ("Wireless Mouse", 2499, 40, 0),
  ("Mechanical Keyboard", 8999, 15, 0),
  ("USB-C Charger", 3499, 25, 0),
  ("The Rust Programming Language", 3995, 12, 1),
  ("Database Internals", 4750, 8, 1),
  ("Chef's Knife", 5900, 10, 2),
  ("Cast Iron Skillet", 3200, 20, 2),
];

/// Fills an empty catalog with demo categories and products.
/// Returns the number of products inserted; a non-empty catalog is left alone.
pub async fn seed_demo_catalog(pool: &SqlitePool) -> Result<usize> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(pool)
    .await?;
  if existing > 0 {
    info!(existing, "Catalog already populated; skipping seed.");
    return Ok(0);
  }

  let mut tx = pool.begin().await?;
  let mut category_ids = Vec::with_capacity(DEMO_CATEGORIES.len());
  for (name, range) in DEMO_CATEGORIES {
    let id: i64 = sqlx::query_scalar(
      "INSERT INTO categories (category_name, price_range) VALUES (?1, ?2)
       ON CONFLICT (category_name) DO UPDATE SET price_range = excluded.price_range
       RETURNING category_id",
    )
    .bind(name)
    .bind(range)
    .fetch_one(&mut *tx)
    .await?;
    category_ids.push(id);
  }

  for (name, cents, stock, category) in DEMO_PRODUCTS {
    let new_product = NewProduct {
      name: name.to_string(),
      price: Money::from_cents(*cents),
      stock_quantity: *stock,
      category_id: category_ids.get(*category).copied(),
    };
    catalog::add_product(&mut *tx, &new_product).await?;
  }
  tx.commit().await?;

  info!(products = DEMO_PRODUCTS.len(), "Seeded demo catalog.");
  Ok(DEMO_PRODUCTS.len())
}
