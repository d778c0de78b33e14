// tests/reports_tests.rs
mod common;

use common::*;
use shopkeep::actions;
use shopkeep::models::Money;

#[tokio::test]
async fn empty_store_reports_zero_sales() {
  let state = memory_state().await;
  let summary = actions::reports::sales_summary(&state).await.unwrap();
  assert_eq!(summary.order_count, 0);
  assert_eq!(summary.total_sales, Money::ZERO);
  assert!(actions::reports::popular_products(&state, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn sales_and_popularity_follow_orders() {
  let state = memory_state().await;
  let alice = register(&state, "alice").await;
  let bob = register(&state, "bob").await;
  let pen = product(&state, "Pen", 150, 50).await;
  let pad = product(&state, "Pad", 400, 50).await;

  actions::cart::add_to_cart(&state, alice.user_id, pen.product_id, 2).await.unwrap();
  actions::cart::add_to_cart(&state, alice.user_id, pad.product_id, 1).await.unwrap();
  actions::checkout::checkout(&state, alice.user_id, "Courier").await.unwrap();

  actions::cart::add_to_cart(&state, bob.user_id, pen.product_id, 3).await.unwrap();
  actions::checkout::checkout(&state, bob.user_id, "Courier").await.unwrap();

  let summary = actions::reports::sales_summary(&state).await.unwrap();
  assert_eq!(summary.order_count, 2);
  // 2 * 1.50 + 4.00 + 3 * 1.50
  assert_eq!(summary.total_sales, Money::from_cents(1150));

  let popular = actions::reports::popular_products(&state, None).await.unwrap();
  assert_eq!(popular.len(), 2);
  assert_eq!(popular[0].product_id, pen.product_id);
  assert_eq!(popular[0].order_count, 2);
  assert_eq!(popular[0].units_sold, 5);
  assert_eq!(popular[1].product_id, pad.product_id);

  let top_one = actions::reports::popular_products(&state, Some(1)).await.unwrap();
  assert_eq!(top_one.len(), 1);
  assert!(actions::reports::popular_products(&state, Some(0)).await.is_err());
}
