// shopkeep/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive these wrapped in
//! `shopkeep_flow::ContextData`.

use crate::db::TxSlot;
use crate::models::{Cart, CartLine, Product, Receipt, TrackingId, User};
use crate::state::AppState;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub full_name: String,
  pub email: String,
  pub created_user: Option<User>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub user: Option<User>,
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub user_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub tx: TxSlot,
  /// Shelf stock left after this reservation.
  pub remaining_stock: Option<i64>,
  pub product: Option<Product>,
  pub cart_line: Option<CartLine>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, user_id: i64, product_id: i64, quantity: i64) -> Self {
    Self {
      app_state,
      user_id,
      product_id,
      quantity,
      tx: TxSlot::new(),
      remaining_stock: None,
      product: None,
      cart_line: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user_id: i64,
  pub courier_info: String,
  pub tx: TxSlot,
  /// Lines still to be ordered.
  pub cart: Option<Cart>,
  /// Set when every line in the cart had already been ordered by an earlier run.
  pub resumed_order: Option<TrackingId>,
  pub tracking_id: Option<TrackingId>,
  pub receipt: Option<Receipt>,
  pub receipt_text: Option<String>,
  pub lines_cleared: u64,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user_id: i64, courier_info: String) -> Self {
    Self {
      app_state,
      user_id,
      courier_info,
      tx: TxSlot::new(),
      cart: None,
      resumed_order: None,
      tracking_id: None,
      receipt: None,
      receipt_text: None,
      lines_cleared: 0,
    }
  }
}
