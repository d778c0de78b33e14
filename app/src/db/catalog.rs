// shopkeep/src/db/catalog.rs

//! Products, categories and stock.

use crate::errors::{AppError, Result};
use crate::models::{Category, Money, Product, ProductListing, ProductSearch};
use sqlx::sqlite::{Sqlite, SqliteConnection, SqliteExecutor};
use sqlx::QueryBuilder;

const LISTING_SELECT: &str = "SELECT p.product_id, p.name, p.price_cents, p.stock_quantity, \
   c.category_name, c.price_range \
   FROM products p LEFT JOIN categories c ON c.category_id = p.category_id";

const PRODUCT_COLUMNS: &str = "product_id, name, price_cents, stock_quantity, category_id";

#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub price: Money,
  pub stock_quantity: i64,
  pub category_id: Option<i64>,
}

/// Fields to change on an existing product; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub price: Option<Money>,
}

// --- Products ---

pub async fn list_products<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<ProductListing>> {
  let sql = format!("{} ORDER BY p.product_id", LISTING_SELECT);
  Ok(sqlx::query_as::<_, ProductListing>(&sql).fetch_all(executor).await?)
}

/// Matches on exact category name and price range and a case-insensitive name fragment.
pub async fn search_products<'e>(
  executor: impl SqliteExecutor<'e>,
  search: &ProductSearch,
) -> Result<Vec<ProductListing>> {
  let mut qb = QueryBuilder::<Sqlite>::new(LISTING_SELECT);
  qb.push(" WHERE 1 = 1");
  if let Some(category) = &search.category {
    qb.push(" AND c.category_name = ").push_bind(category.clone());
  }
  if let Some(range) = &search.price_range {
    qb.push(" AND c.price_range = ").push_bind(range.clone());
  }
  if let Some(fragment) = &search.name_contains {
    qb.push(" AND p.name LIKE ")
      .push_bind(format!("%{}%", fragment))
      .push(" COLLATE NOCASE");
  }
  qb.push(" ORDER BY p.product_id");
  Ok(qb.build_query_as::<ProductListing>().fetch_all(executor).await?)
}

pub async fn find_product<'e>(executor: impl SqliteExecutor<'e>, product_id: i64) -> Result<Option<Product>> {
  let sql = format!("SELECT {} FROM products WHERE product_id = ?1", PRODUCT_COLUMNS);
  Ok(
    sqlx::query_as::<_, Product>(&sql)
      .bind(product_id)
      .fetch_optional(executor)
      .await?,
  )
}

pub async fn require_product<'e>(executor: impl SqliteExecutor<'e>, product_id: i64) -> Result<Product> {
  find_product(executor, product_id)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

pub async fn add_product<'e>(executor: impl SqliteExecutor<'e>, new_product: &NewProduct) -> Result<Product> {
  let sql = format!(
    "INSERT INTO products (name, price_cents, stock_quantity, category_id) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
    PRODUCT_COLUMNS
  );
  sqlx::query_as::<_, Product>(&sql)
    .bind(&new_product.name)
    .bind(new_product.price)
    .bind(new_product.stock_quantity)
    .bind(new_product.category_id)
    .fetch_one(executor)
    .await
    .map_err(|e| map_category_fk(e, new_product.category_id))
}

pub async fn update_product<'e>(
  executor: impl SqliteExecutor<'e>,
  product_id: i64,
  changes: &ProductChanges,
) -> Result<Product> {
  let sql = format!(
    "UPDATE products SET name = COALESCE(?2, name), price_cents = COALESCE(?3, price_cents) \
     WHERE product_id = ?1 RETURNING {}",
    PRODUCT_COLUMNS
  );
  sqlx::query_as::<_, Product>(&sql)
    .bind(product_id)
    .bind(changes.name.as_deref())
    .bind(changes.price)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

/// Sets on-hand stock to `quantity`. Units already reserved by carts are unaffected.
pub async fn set_stock<'e>(executor: impl SqliteExecutor<'e>, product_id: i64, quantity: i64) -> Result<Product> {
  let sql = format!(
    "UPDATE products SET stock_quantity = ?2 WHERE product_id = ?1 RETURNING {}",
    PRODUCT_COLUMNS
  );
  sqlx::query_as::<_, Product>(&sql)
    .bind(product_id)
    .bind(quantity)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

pub async fn assign_category<'e>(
  executor: impl SqliteExecutor<'e>,
  product_id: i64,
  category_id: Option<i64>,
) -> Result<Product> {
  let sql = format!(
    "UPDATE products SET category_id = ?2 WHERE product_id = ?1 RETURNING {}",
    PRODUCT_COLUMNS
  );
  sqlx::query_as::<_, Product>(&sql)
    .bind(product_id)
    .bind(category_id)
    .fetch_optional(executor)
    .await
    .map_err(|e| map_category_fk(e, category_id))?
    .ok_or_else(|| product_not_found(product_id))
}

/// Deletes a product that no cart line or order references.
pub async fn delete_product(conn: &mut SqliteConnection, product_id: i64) -> Result<()> {
  let referenced: bool = sqlx::query_scalar(
    "SELECT EXISTS(SELECT 1 FROM shopping_carts WHERE product_id = ?1)
         OR EXISTS(SELECT 1 FROM order_items WHERE product_id = ?1)",
  )
  .bind(product_id)
  .fetch_one(&mut *conn)
  .await?;
  if referenced {
    return Err(AppError::Conflict(format!(
      "Product {} is in a cart or an order and cannot be deleted.",
      product_id
    )));
  }

  let deleted = sqlx::query("DELETE FROM products WHERE product_id = ?1")
    .bind(product_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(product_not_found(product_id));
  }
  Ok(())
}

// --- Stock ---

pub async fn get_stock<'e>(executor: impl SqliteExecutor<'e>, product_id: i64) -> Result<i64> {
  sqlx::query_scalar::<_, i64>("SELECT stock_quantity FROM products WHERE product_id = ?1")
    .bind(product_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

/// Takes `quantity` units off the shelf if that many are on hand and returns
/// what remains. The check and the decrement are one statement, so stock never
/// goes negative.
pub async fn decrement_stock(conn: &mut SqliteConnection, product_id: i64, quantity: i64) -> Result<i64> {
  let remaining = sqlx::query_scalar::<_, i64>(
    "UPDATE products SET stock_quantity = stock_quantity - ?2
     WHERE product_id = ?1 AND stock_quantity >= ?2
     RETURNING stock_quantity",
  )
  .bind(product_id)
  .bind(quantity)
  .fetch_optional(&mut *conn)
  .await?;

  match remaining {
    Some(left) => Ok(left),
    None => {
      let available = get_stock(&mut *conn, product_id).await?;
      Err(AppError::InsufficientStock {
        product_id,
        requested: quantity,
        available,
      })
    }
  }
}

/// Puts reserved units back on the shelf.
pub async fn restore_stock(conn: &mut SqliteConnection, product_id: i64, quantity: i64) -> Result<i64> {
  sqlx::query_scalar::<_, i64>(
    "UPDATE products SET stock_quantity = stock_quantity + ?2 WHERE product_id = ?1 RETURNING stock_quantity",
  )
  .bind(product_id)
  .bind(quantity)
  .fetch_optional(conn)
  .await?
  .ok_or_else(|| product_not_found(product_id))
}

// --- Categories ---

pub async fn list_categories<'e>(executor: impl SqliteExecutor<'e>) -> Result<Vec<Category>> {
  Ok(
    sqlx::query_as::<_, Category>(
      "SELECT category_id, category_name, price_range FROM categories ORDER BY category_id",
    )
    .fetch_all(executor)
    .await?,
  )
}

pub async fn add_category<'e>(executor: impl SqliteExecutor<'e>, name: &str, price_range: &str) -> Result<Category> {
  sqlx::query_as::<_, Category>(
    "INSERT INTO categories (category_name, price_range) VALUES (?1, ?2)
     RETURNING category_id, category_name, price_range",
  )
  .bind(name)
  .bind(price_range)
  .fetch_one(executor)
  .await
  .map_err(|e| {
    let err = AppError::from(e);
    if err.is_unique_violation() {
      AppError::Conflict(format!("Category '{}' already exists.", name))
    } else {
      err
    }
  })
}

pub async fn update_category<'e>(
  executor: impl SqliteExecutor<'e>,
  category_id: i64,
  name: Option<&str>,
  price_range: Option<&str>,
) -> Result<Category> {
  sqlx::query_as::<_, Category>(
    "UPDATE categories SET category_name = COALESCE(?2, category_name), price_range = COALESCE(?3, price_range)
     WHERE category_id = ?1 RETURNING category_id, category_name, price_range",
  )
  .bind(category_id)
  .bind(name)
  .bind(price_range)
  .fetch_optional(executor)
  .await
  .map_err(|e| {
    let err = AppError::from(e);
    if err.is_unique_violation() {
      AppError::Conflict("Another category already has that name.".to_string())
    } else {
      err
    }
  })?
  .ok_or_else(|| AppError::NotFound(format!("Category {} not found.", category_id)))
}

/// Deletes a category; its products become uncategorised.
pub async fn delete_category<'e>(executor: impl SqliteExecutor<'e>, category_id: i64) -> Result<()> {
  let deleted = sqlx::query("DELETE FROM categories WHERE category_id = ?1")
    .bind(category_id)
    .execute(executor)
    .await?
    .rows_affected();
  if deleted == 0 {
    return Err(AppError::NotFound(format!("Category {} not found.", category_id)));
  }
  Ok(())
}

fn product_not_found(product_id: i64) -> AppError {
  AppError::NotFound(format!("Product {} not found.", product_id))
}

fn map_category_fk(e: sqlx::Error, category_id: Option<i64>) -> AppError {
  let err = AppError::from(e);
  match category_id {
    Some(id) if err.is_foreign_key_violation() => AppError::NotFound(format!("Category {} not found.", id)),
    _ => err,
  }
}
