// tests/concurrency_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopkeep::actions;
use shopkeep::AppError;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn competing_adds_never_oversell() {
  let dir = TempDir::new().unwrap();
  let state = file_state(&dir).await;
  let alice = register(&state, "alice").await;
  let bob = register(&state, "bob").await;
  let p = product(&state, "Last Widgets", 500, 5).await;

  let (a, b) = tokio::join!(
    actions::cart::add_to_cart(&state, alice.user_id, p.product_id, 3),
    actions::cart::add_to_cart(&state, bob.user_id, p.product_id, 3),
  );

  let results = [a, b];
  let successes = results.iter().filter(|r| r.is_ok()).count();
  let refusals = results
    .iter()
    .filter(|r| matches!(r, Err(AppError::InsufficientStock { .. })))
    .count();
  assert_eq!((successes, refusals), (1, 1), "results: {results:?}");
  assert_eq!(stock_of(&state, p.product_id).await, 2);
  assert_stock_conserved(&state, p.product_id, 5).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn many_concurrent_buyers_drain_stock_exactly() {
  let dir = TempDir::new().unwrap();
  let state = file_state(&dir).await;
  let p = product(&state, "Limited Edition", 1000, 7).await;

  let mut buyers = Vec::new();
  for i in 0..12 {
    buyers.push(register(&state, &format!("buyer{i}")).await);
  }

  let handles: Vec<_> = buyers
    .iter()
    .map(|buyer| {
      let state = state.clone();
      let (user_id, product_id) = (buyer.user_id, p.product_id);
      tokio::spawn(async move { actions::cart::add_to_cart(&state, user_id, product_id, 1).await })
    })
    .collect();

  let mut successes = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => successes += 1,
      Err(AppError::InsufficientStock { .. }) => {}
      Err(other) => panic!("unexpected error: {other:?}"),
    }
  }

  assert_eq!(successes, 7);
  assert_eq!(stock_of(&state, p.product_id).await, 0);
  assert_stock_conserved(&state, p.product_id, 7).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_checkouts_of_one_cart_produce_one_order() {
  let dir = TempDir::new().unwrap();
  let state = file_state(&dir).await;
  let user = register(&state, "carol").await;
  let p = product(&state, "Widget", 250, 10).await;
  actions::cart::add_to_cart(&state, user.user_id, p.product_id, 2).await.unwrap();

  let (a, b) = tokio::join!(
    actions::checkout::checkout(&state, user.user_id, "Courier"),
    actions::checkout::checkout(&state, user.user_id, "Courier"),
  );

  let results = [a, b];
  assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1, "results: {results:?}");
  assert!(results
    .iter()
    .any(|r| matches!(r, Err(AppError::EmptyCart { .. }))));
  assert_eq!(order_count(&state).await, 1);
  assert_stock_conserved(&state, p.product_id, 10).await;
}
