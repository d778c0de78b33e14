// tests/cli_tests.rs
mod common;

use common::*;
use shopkeep::cli::Console;
use shopkeep::AppState;
use std::io::Cursor;

async fn run_script(state: &AppState, script: &str) -> String {
  let mut console = Console::new(state.clone(), Cursor::new(script.as_bytes().to_vec()), Vec::new());
  console.run().await.expect("console session");
  String::from_utf8(console.into_output()).expect("utf-8 output")
}

#[tokio::test]
async fn customer_can_shop_and_check_out() {
  let state = memory_state().await;
  register(&state, "alice").await;
  let p = product(&state, "Desk Lamp", 1999, 4).await;

  let script = format!(
    "1\n1\nalice\nsecret-pass\n4\n{id}\n2\n5\n7\nTrack Express\n0\n0\n0\n",
    id = p.product_id
  );
  let output = run_script(&state, &script).await;

  assert!(output.contains("Welcome to the Online Shopping System!"));
  assert!(output.contains("Login successful!"));
  assert!(output.contains("Added to cart: Desk Lamp"));
  assert!(output.contains("Order placed successfully!"));
  assert!(output.contains("Tracking ID: TRK-"));
  assert!(output.contains("Total Cost: $39.98"));
  assert!(output.contains("Thank you for visiting"));
  assert_eq!(stock_of(&state, p.product_id).await, 2);
  assert_eq!(order_count(&state).await, 1);
}

#[tokio::test]
async fn errors_are_shown_and_the_menu_continues() {
  let state = memory_state().await;
  register(&state, "bob").await;
  let p = product(&state, "Mug", 500, 1).await;

  let script = format!(
    "1\n1\nbob\nwrong\n1\nbob\nsecret-pass\n4\n{id}\n3\n7\nCourier\n0\n0\n0\n",
    id = p.product_id
  );
  let output = run_script(&state, &script).await;

  assert!(output.contains("Error: "));
  assert!(output.contains("Login successful!"));
  assert!(!output.contains("Order placed successfully!"));
  assert_eq!(stock_of(&state, p.product_id).await, 1);
  assert_eq!(order_count(&state).await, 0);
}

#[tokio::test]
async fn non_numeric_ids_are_reprompted() {
  let state = memory_state().await;
  register(&state, "carol").await;
  let p = product(&state, "Pencil", 100, 10).await;

  let script = format!("1\n1\ncarol\nsecret-pass\n2\nabc\n{id}\n0\n0\n0\n", id = p.product_id);
  let output = run_script(&state, &script).await;

  assert!(output.contains("'abc' is not a whole number."));
  assert!(output.contains("Pencil"));
}

#[tokio::test]
async fn end_of_input_ends_the_session() {
  let state = memory_state().await;
  let output = run_script(&state, "1\n").await;
  assert!(output.ends_with("Goodbye.\n"));
}
