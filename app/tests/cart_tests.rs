// tests/cart_tests.rs
mod common;

use common::*;
use shopkeep::actions;
use shopkeep::models::Money;
use shopkeep::AppError;

#[tokio::test]
async fn add_to_cart_reserves_stock_and_records_line() {
  let state = memory_state().await;
  let user = register(&state, "alice").await;
  let p = product(&state, "Widget", 250, 10).await;

  let added = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 4).await.unwrap();
  assert_eq!(added.remaining_stock, 6);
  assert_eq!(added.line.quantity, 4);
  assert_eq!(added.line.unit_price, Money::from_cents(250));
  assert_eq!(added.line.product_name, "Widget");

  assert_eq!(stock_of(&state, p.product_id).await, 6);
  let cart = actions::cart::view_cart(&state, user.user_id).await.unwrap();
  assert_eq!(cart.lines.len(), 1);
  assert_eq!(cart.total_cost(), Money::from_cents(1000));
}

#[tokio::test]
async fn repeated_adds_merge_into_one_line() {
  let state = memory_state().await;
  let user = register(&state, "bob").await;
  let p = product(&state, "Widget", 250, 10).await;

  actions::cart::add_to_cart(&state, user.user_id, p.product_id, 2).await.unwrap();
  let second = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 3).await.unwrap();

  assert_eq!(second.line.quantity, 5);
  let cart = actions::cart::view_cart(&state, user.user_id).await.unwrap();
  assert_eq!(cart.lines.len(), 1);
  assert_eq!(stock_of(&state, p.product_id).await, 5);
}

#[tokio::test]
async fn price_change_starts_a_new_line_at_the_new_price() {
  let state = memory_state().await;
  let user = register(&state, "carol").await;
  let p = product(&state, "Widget", 250, 10).await;

  actions::cart::add_to_cart(&state, user.user_id, p.product_id, 1).await.unwrap();
  actions::catalog::update_product(&state, p.product_id, None, Some(Money::from_cents(300)))
    .await
    .unwrap();
  actions::cart::add_to_cart(&state, user.user_id, p.product_id, 1).await.unwrap();

  let cart = actions::cart::view_cart(&state, user.user_id).await.unwrap();
  let prices: Vec<_> = cart.lines.iter().map(|l| l.unit_price.cents()).collect();
  assert_eq!(prices, vec![250, 300]);
  assert_eq!(cart.reserved_units(p.product_id), 2);
}

#[tokio::test]
async fn insufficient_stock_changes_nothing() {
  let state = memory_state().await;
  let user = register(&state, "dave").await;
  let p = product(&state, "Widget", 250, 10).await;
  actions::cart::add_to_cart(&state, user.user_id, p.product_id, 4).await.unwrap();

  let err = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 7).await.unwrap_err();
  match err {
    AppError::InsufficientStock {
      product_id,
      requested,
      available,
    } => {
      assert_eq!(product_id, p.product_id);
      assert_eq!(requested, 7);
      assert_eq!(available, 6);
    }
    other => panic!("expected InsufficientStock, got {other:?}"),
  }

  assert_eq!(stock_of(&state, p.product_id).await, 6);
  let cart = actions::cart::view_cart(&state, user.user_id).await.unwrap();
  assert_eq!(cart.lines.len(), 1);
  assert_eq!(cart.lines[0].quantity, 4);
}

#[tokio::test]
async fn exact_stock_can_be_reserved() {
  let state = memory_state().await;
  let user = register(&state, "erin").await;
  let p = product(&state, "Widget", 100, 3).await;

  let added = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 3).await.unwrap();
  assert_eq!(added.remaining_stock, 0);

  let err = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 1).await.unwrap_err();
  assert!(matches!(err, AppError::InsufficientStock { available: 0, .. }));
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
  let state = memory_state().await;
  let user = register(&state, "frank").await;
  let p = product(&state, "Widget", 100, 3).await;

  for quantity in [0, -2] {
    let err = actions::cart::add_to_cart(&state, user.user_id, p.product_id, quantity)
      .await
      .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
  }
  assert_eq!(stock_of(&state, p.product_id).await, 3);
}

#[tokio::test]
async fn unknown_product_or_user_is_not_found() {
  let state = memory_state().await;
  let user = register(&state, "gina").await;
  let p = product(&state, "Widget", 100, 3).await;

  let err = actions::cart::add_to_cart(&state, user.user_id, 9_999, 1).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

  let err = actions::cart::add_to_cart(&state, 9_999, p.product_id, 1).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
  assert_eq!(stock_of(&state, p.product_id).await, 3);
}

#[tokio::test]
async fn removing_from_cart_returns_units_to_stock() {
  let state = memory_state().await;
  let user = register(&state, "hank").await;
  let p = product(&state, "Widget", 100, 10).await;
  let added = actions::cart::add_to_cart(&state, user.user_id, p.product_id, 5).await.unwrap();

  let partial = actions::cart::remove_from_cart(&state, user.user_id, added.line.cart_id, Some(2))
    .await
    .unwrap();
  assert_eq!(partial.units_returned, 2);
  assert_eq!(partial.quantity_left, 3);
  assert_eq!(stock_of(&state, p.product_id).await, 7);

  let rest = actions::cart::remove_from_cart(&state, user.user_id, added.line.cart_id, None)
    .await
    .unwrap();
  assert_eq!(rest.units_returned, 3);
  assert_eq!(rest.quantity_left, 0);
  assert_eq!(stock_of(&state, p.product_id).await, 10);
  assert!(actions::cart::view_cart(&state, user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn cannot_remove_another_users_line() {
  let state = memory_state().await;
  let owner = register(&state, "ivy").await;
  let other = register(&state, "jack").await;
  let p = product(&state, "Widget", 100, 10).await;
  let added = actions::cart::add_to_cart(&state, owner.user_id, p.product_id, 2).await.unwrap();

  let err = actions::cart::remove_from_cart(&state, other.user_id, added.line.cart_id, None)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
  assert_eq!(stock_of(&state, p.product_id).await, 8);
}
