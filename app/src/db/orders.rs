// shopkeep/src/db/orders.rs

use crate::errors::Result;
use crate::models::{Order, OrderLine, PopularProduct, Receipt, SalesSummary, TrackingId};
use sqlx::sqlite::{Sqlite, SqliteConnection, SqliteExecutor};
use sqlx::{FromRow, QueryBuilder};

const ORDER_COLUMNS: &str = "tracking_id, user_id, courier_info, receipt_text, total_cost_cents, placed_at";

/// An order line that was taken from a cart line still present in the cart.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CoveredLine {
  pub cart_line_id: i64,
  pub tracking_id: TrackingId,
  pub quantity: i64,
}

/// Writes the order header and one snapshot row per receipt line.
pub async fn persist_order(conn: &mut SqliteConnection, receipt: &Receipt, receipt_text: &str) -> Result<()> {
  sqlx::query(
    "INSERT INTO orders (tracking_id, user_id, courier_info, receipt_text, total_cost_cents, placed_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
  )
  .bind(receipt.tracking_id)
  .bind(receipt.user_id)
  .bind(&receipt.courier_info)
  .bind(receipt_text)
  .bind(receipt.total_cost)
  .bind(receipt.placed_at)
  .execute(&mut *conn)
  .await?;

  for line in &receipt.lines {
    sqlx::query(
      "INSERT INTO order_items (tracking_id, cart_line_id, product_id, product_name, quantity, unit_price_cents)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(receipt.tracking_id)
    .bind(line.cart_line_id)
    .bind(line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.unit_price)
    .execute(&mut *conn)
    .await?;
  }
  Ok(())
}

/// Which of `cart_line_ids` already appear in some order.
pub async fn covered_cart_lines(conn: &mut SqliteConnection, cart_line_ids: &[i64]) -> Result<Vec<CoveredLine>> {
  if cart_line_ids.is_empty() {
    return Ok(Vec::new());
  }
  let mut qb =
    QueryBuilder::<Sqlite>::new("SELECT cart_line_id, tracking_id, quantity FROM order_items WHERE cart_line_id IN (");
  let mut separated = qb.separated(", ");
  for id in cart_line_ids {
    separated.push_bind(*id);
  }
  separated.push_unseparated(") ORDER BY cart_line_id");
  Ok(qb.build_query_as::<CoveredLine>().fetch_all(conn).await?)
}

pub async fn find_order<'e>(executor: impl SqliteExecutor<'e>, tracking_id: TrackingId) -> Result<Option<Order>> {
  let sql = format!("SELECT {} FROM orders WHERE tracking_id = ?1", ORDER_COLUMNS);
  Ok(
    sqlx::query_as::<_, Order>(&sql)
      .bind(tracking_id)
      .fetch_optional(executor)
      .await?,
  )
}

pub async fn order_lines<'e>(executor: impl SqliteExecutor<'e>, tracking_id: TrackingId) -> Result<Vec<OrderLine>> {
  Ok(
    sqlx::query_as::<_, OrderLine>(
      "SELECT order_item_id, tracking_id, cart_line_id, product_id, product_name, quantity, unit_price_cents
       FROM order_items WHERE tracking_id = ?1 ORDER BY order_item_id",
    )
    .bind(tracking_id)
    .fetch_all(executor)
    .await?,
  )
}

pub async fn orders_for_user<'e>(executor: impl SqliteExecutor<'e>, user_id: i64) -> Result<Vec<Order>> {
  let sql = format!(
    "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY tracking_id",
    ORDER_COLUMNS
  );
  Ok(sqlx::query_as::<_, Order>(&sql).bind(user_id).fetch_all(executor).await?)
}

pub async fn count_orders<'e>(executor: impl SqliteExecutor<'e>) -> Result<i64> {
  Ok(
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
      .fetch_one(executor)
      .await?,
  )
}

/// Units of `product_id` sold across all orders.
pub async fn units_ordered<'e>(executor: impl SqliteExecutor<'e>, product_id: i64) -> Result<i64> {
  Ok(
    sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(quantity), 0) FROM order_items WHERE product_id = ?1")
      .bind(product_id)
      .fetch_one(executor)
      .await?,
  )
}

pub async fn max_tracking_id<'e>(executor: impl SqliteExecutor<'e>) -> Result<Option<TrackingId>> {
  Ok(
    sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(tracking_id) FROM orders")
      .fetch_one(executor)
      .await?
      .map(TrackingId::new),
  )
}

pub async fn sales_summary<'e>(executor: impl SqliteExecutor<'e>) -> Result<SalesSummary> {
  Ok(
    sqlx::query_as::<_, SalesSummary>(
      "SELECT COUNT(*) AS order_count, COALESCE(SUM(total_cost_cents), 0) AS total_sales_cents FROM orders",
    )
    .fetch_one(executor)
    .await?,
  )
}

/// Top `limit` products by number of orders containing them; ties go to more units sold.
pub async fn popular_products<'e>(executor: impl SqliteExecutor<'e>, limit: i64) -> Result<Vec<PopularProduct>> {
  Ok(
    sqlx::query_as::<_, PopularProduct>(
      "SELECT oi.product_id, p.name, COUNT(DISTINCT oi.tracking_id) AS order_count, SUM(oi.quantity) AS units_sold
       FROM order_items oi JOIN products p ON p.product_id = oi.product_id
       GROUP BY oi.product_id, p.name
       ORDER BY order_count DESC, units_sold DESC, oi.product_id
       LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?,
  )
}
