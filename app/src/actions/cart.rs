// shopkeep/src/actions/cart.rs

use crate::db::{carts, catalog, users};
use crate::errors::{AppError, Result};
use crate::models::{Cart, CartLine};
use crate::pipelines::contexts::AddToCartCtxData;
use crate::state::AppState;
use serde::Serialize;
use shopkeep_flow::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCartOutcome {
  /// The cart line after the add, including any merged quantity.
  pub line: CartLine,
  pub remaining_stock: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovedUnits {
  pub product_id: i64,
  pub units_returned: i64,
  /// Quantity left on the line; zero when the line was deleted.
  pub quantity_left: i64,
}

/// Reserves `quantity` units of `product_id` for `user_id` and records them in the cart.
///
/// Fails with `InsufficientStock` when fewer units are on hand; stock and cart
/// are then exactly as before the call.
#[instrument(name = "action::add_to_cart", skip(state), err(Display))]
pub async fn add_to_cart(state: &AppState, user_id: i64, product_id: i64, quantity: i64) -> Result<AddToCartOutcome> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(state.clone(), user_id, product_id, quantity));
  let tx = { ctx_data.read().tx.clone() };

  let run = state.workflows.run(ctx_data.clone()).await;
  // A failed or stopped run leaves its transaction open.
  tx.rollback().await;

  match run? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let line = guard
        .cart_line
        .clone()
        .ok_or_else(|| AppError::Internal("Cart updated, but the line is unavailable.".to_string()))?;
      let remaining_stock = guard.remaining_stock.unwrap_or_default();
      info!(cart_id = line.cart_id, line_quantity = line.quantity, remaining_stock, "Added to cart.");
      Ok(AddToCartOutcome { line, remaining_stock })
    }
    PipelineResult::Stopped => {
      warn!("Add to cart pipeline was stopped by a handler.");
      Err(AppError::Internal("Adding the item to the cart was halted.".to_string()))
    }
  }
}

pub async fn view_cart(state: &AppState, user_id: i64) -> Result<Cart> {
  carts::load_cart(&state.db_pool, user_id).await
}

/// Takes `quantity` units (or the whole line when `None`) off a cart line and
/// returns them to stock.
#[instrument(name = "action::remove_from_cart", skip(state), err(Display))]
pub async fn remove_from_cart(
  state: &AppState,
  user_id: i64,
  cart_id: i64,
  quantity: Option<i64>,
) -> Result<RemovedUnits> {
  if let Some(q) = quantity {
    if q <= 0 {
      return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
    }
  }

  let mut tx = state.db_pool.begin().await?;
  users::lock_cart(&mut tx, user_id).await?;
  let line = carts::find_line(&mut *tx, user_id, cart_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Cart line {} not found in your cart.", cart_id)))?;

  let units = quantity.unwrap_or(line.quantity).min(line.quantity);
  let quantity_left = line.quantity - units;
  if quantity_left == 0 {
    carts::delete_line(&mut tx, cart_id).await?;
  } else {
    carts::set_line_quantity(&mut tx, cart_id, quantity_left).await?;
  }
  catalog::restore_stock(&mut tx, line.product_id, units).await?;
  tx.commit().await?;

  info!(product_id = line.product_id, units, quantity_left, "Removed from cart.");
  Ok(RemovedUnits {
    product_id: line.product_id,
    units_returned: units,
    quantity_left,
  })
}
