// shopkeep/src/db/carts.rs

//! Cart lines. Every line holds stock already taken off `products.stock_quantity`.

use crate::errors::Result;
use crate::models::{Cart, CartLine, Money};
use sqlx::sqlite::{SqliteConnection, SqliteExecutor};
use sqlx::FromRow;

const LINE_SELECT: &str = "SELECT sc.cart_id, sc.user_id, sc.product_id, p.name AS product_name, \
   sc.quantity, sc.unit_price_cents, sc.reserved_at_ms \
   FROM shopping_carts sc JOIN products p ON p.product_id = sc.product_id";

/// A line whose reservation has outlived its lease.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StaleLine {
  pub cart_id: i64,
  pub user_id: i64,
  pub product_id: i64,
  pub quantity: i64,
}

pub async fn load_cart<'e>(executor: impl SqliteExecutor<'e>, user_id: i64) -> Result<Cart> {
  let sql = format!("{} WHERE sc.user_id = ?1 ORDER BY sc.cart_id", LINE_SELECT);
  let lines = sqlx::query_as::<_, CartLine>(&sql)
    .bind(user_id)
    .fetch_all(executor)
    .await?;
  Ok(Cart { user_id, lines })
}

pub async fn find_line<'e>(executor: impl SqliteExecutor<'e>, user_id: i64, cart_id: i64) -> Result<Option<CartLine>> {
  let sql = format!("{} WHERE sc.user_id = ?1 AND sc.cart_id = ?2", LINE_SELECT);
  Ok(
    sqlx::query_as::<_, CartLine>(&sql)
      .bind(user_id)
      .bind(cart_id)
      .fetch_optional(executor)
      .await?,
  )
}

/// Adds `quantity` to the user's line for this product at this price, creating
/// the line if there is none. Returns the line's id.
pub async fn add_or_merge_line(
  conn: &mut SqliteConnection,
  user_id: i64,
  product_id: i64,
  quantity: i64,
  unit_price: Money,
  reserved_at_ms: i64,
) -> Result<i64> {
  Ok(
    sqlx::query_scalar::<_, i64>(
      "INSERT INTO shopping_carts (user_id, product_id, quantity, unit_price_cents, reserved_at_ms)
       VALUES (?1, ?2, ?3, ?4, ?5)
       ON CONFLICT (user_id, product_id, unit_price_cents)
       DO UPDATE SET quantity = quantity + excluded.quantity, reserved_at_ms = excluded.reserved_at_ms
       RETURNING cart_id",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(reserved_at_ms)
    .fetch_one(conn)
    .await?,
  )
}

/// Inserts a fresh line, never merging.
pub async fn insert_line(
  conn: &mut SqliteConnection,
  user_id: i64,
  product_id: i64,
  quantity: i64,
  unit_price: Money,
  reserved_at_ms: i64,
) -> Result<i64> {
  Ok(
    sqlx::query_scalar::<_, i64>(
      "INSERT INTO shopping_carts (user_id, product_id, quantity, unit_price_cents, reserved_at_ms)
       VALUES (?1, ?2, ?3, ?4, ?5) RETURNING cart_id",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(reserved_at_ms)
    .fetch_one(conn)
    .await?,
  )
}

pub async fn set_line_quantity(conn: &mut SqliteConnection, cart_id: i64, quantity: i64) -> Result<()> {
  sqlx::query("UPDATE shopping_carts SET quantity = ?2 WHERE cart_id = ?1")
    .bind(cart_id)
    .bind(quantity)
    .execute(conn)
    .await?;
  Ok(())
}

pub async fn delete_line(conn: &mut SqliteConnection, cart_id: i64) -> Result<u64> {
  Ok(
    sqlx::query("DELETE FROM shopping_carts WHERE cart_id = ?1")
      .bind(cart_id)
      .execute(conn)
      .await?
      .rows_affected(),
  )
}

/// Deletes every line of the user's cart without touching stock.
pub async fn clear_cart(conn: &mut SqliteConnection, user_id: i64) -> Result<u64> {
  Ok(
    sqlx::query("DELETE FROM shopping_carts WHERE user_id = ?1")
      .bind(user_id)
      .execute(conn)
      .await?
      .rows_affected(),
  )
}

/// Deletes the lines reserved strictly before `cutoff_ms` and returns them.
/// The caller owns putting their units back on the shelf.
pub async fn take_stale_lines(conn: &mut SqliteConnection, cutoff_ms: i64) -> Result<Vec<StaleLine>> {
  Ok(
    sqlx::query_as::<_, StaleLine>(
      "DELETE FROM shopping_carts WHERE reserved_at_ms < ?1
       RETURNING cart_id, user_id, product_id, quantity",
    )
    .bind(cutoff_ms)
    .fetch_all(conn)
    .await?,
  )
}

/// Units of `product_id` held across all carts.
pub async fn reserved_units<'e>(executor: impl SqliteExecutor<'e>, product_id: i64) -> Result<i64> {
  Ok(
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(quantity), 0) FROM shopping_carts WHERE product_id = ?1")
      .bind(product_id)
      .fetch_one(executor)
      .await?,
  )
}
