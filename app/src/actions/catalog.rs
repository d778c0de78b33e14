// shopkeep/src/actions/catalog.rs

//! Catalog browsing for customers and inventory management for admins.

use crate::db::catalog::{self, NewProduct, ProductChanges};
use crate::errors::{AppError, Result};
use crate::models::{Category, Money, Product, ProductListing, ProductSearch};
use crate::state::AppState;
use tracing::{info, instrument};

pub async fn list_products(state: &AppState) -> Result<Vec<ProductListing>> {
  catalog::list_products(&state.db_pool).await
}

pub async fn product_details(state: &AppState, product_id: i64) -> Result<Product> {
  catalog::require_product(&state.db_pool, product_id).await
}

pub async fn search_products(state: &AppState, search: &ProductSearch) -> Result<Vec<ProductListing>> {
  catalog::search_products(&state.db_pool, search).await
}

#[instrument(name = "action::add_product", skip(state), err(Display))]
pub async fn add_product(
  state: &AppState,
  name: &str,
  price: Money,
  stock_quantity: i64,
  category_id: Option<i64>,
) -> Result<Product> {
  let name = require_name(name)?;
  require_stock(stock_quantity)?;
  let product = catalog::add_product(
    &state.db_pool,
    &NewProduct {
      name,
      price,
      stock_quantity,
      category_id,
    },
  )
  .await?;
  info!(product_id = product.product_id, "Product added.");
  Ok(product)
}

#[instrument(name = "action::update_product", skip(state), err(Display))]
pub async fn update_product(state: &AppState, product_id: i64, name: Option<&str>, price: Option<Money>) -> Result<Product> {
  let name = name.map(require_name).transpose()?;
  catalog::update_product(&state.db_pool, product_id, &ProductChanges { name, price }).await
}

/// Restocks `product_id` to exactly `quantity` units on the shelf.
#[instrument(name = "action::set_stock", skip(state), err(Display))]
pub async fn set_stock(state: &AppState, product_id: i64, quantity: i64) -> Result<Product> {
  require_stock(quantity)?;
  let product = catalog::set_stock(&state.db_pool, product_id, quantity).await?;
  info!(product_id, stock = product.stock_quantity, "Stock level set.");
  Ok(product)
}

pub async fn assign_category(state: &AppState, product_id: i64, category_id: Option<i64>) -> Result<Product> {
  catalog::assign_category(&state.db_pool, product_id, category_id).await
}

#[instrument(name = "action::delete_product", skip(state), err(Display))]
pub async fn delete_product(state: &AppState, product_id: i64) -> Result<()> {
  let mut tx = state.db_pool.begin().await?;
  catalog::delete_product(&mut tx, product_id).await?;
  tx.commit().await?;
  info!(product_id, "Product deleted.");
  Ok(())
}

pub async fn list_categories(state: &AppState) -> Result<Vec<Category>> {
  catalog::list_categories(&state.db_pool).await
}

pub async fn add_category(state: &AppState, name: &str, price_range: &str) -> Result<Category> {
  let name = require_name(name)?;
  catalog::add_category(&state.db_pool, &name, price_range.trim()).await
}

pub async fn update_category(
  state: &AppState,
  category_id: i64,
  name: Option<&str>,
  price_range: Option<&str>,
) -> Result<Category> {
  let name = name.map(require_name).transpose()?;
  catalog::update_category(&state.db_pool, category_id, name.as_deref(), price_range.map(str::trim)).await
}

pub async fn delete_category(state: &AppState, category_id: i64) -> Result<()> {
  catalog::delete_category(&state.db_pool, category_id).await
}

fn require_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(AppError::Validation("Name cannot be blank.".to_string()));
  }
  Ok(name.to_string())
}

fn require_stock(quantity: i64) -> Result<()> {
  if quantity < 0 {
    return Err(AppError::Validation("Stock quantity cannot be negative.".to_string()));
  }
  Ok(())
}
