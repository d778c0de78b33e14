// shopkeep/src/pipelines/checkout_pipeline.rs

//! Checkout: turn the cart into an immutable order and clear it, atomically.
//!
//! Stock was reserved when each line entered the cart, so nothing here
//! touches `products.stock_quantity`. The order rows and the cart delete are
//! written in the same transaction; any failure rolls back both.

use crate::db::{carts, orders, users};
use crate::errors::AppError;
use crate::models::TrackingId;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::receipt;
use chrono::Utc;
use shopkeep_flow::{ContextData, Pipeline, PipelineControl, SkipCondition, Workflows};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Later steps have nothing to do once an earlier run is found to have ordered the whole cart.
fn skip_when_resumed() -> SkipCondition<CheckoutCtxData> {
  Arc::new(|ctx_data: ContextData<CheckoutCtxData>| ctx_data.read().resumed_order.is_some())
}

pub fn register_checkout_pipeline(workflows: &Arc<Workflows<AppError>>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_input", false, None),
    ("open_checkout_transaction", false, None),
    ("load_cart_for_checkout", false, None),
    ("reconcile_prior_checkout", false, None),
    ("issue_tracking_id", false, Some(skip_when_resumed())),
    ("build_receipt", false, Some(skip_when_resumed())),
    ("persist_order", false, Some(skip_when_resumed())),
    ("clear_cart", false, Some(skip_when_resumed())),
    ("commit_checkout_transaction", false, None),
  ]);

  // Step 1: Validate input
  p.on_root("validate_checkout_input", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let courier_info = { ctx_data.read().courier_info.trim().to_string() };
      if courier_info.is_empty() {
        warn!("Checkout: courier information missing.");
        return Err(AppError::Validation("Courier information is required.".to_string()));
      }
      ctx_data.write().courier_info = courier_info;
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Open the transaction and take the cart lock
  p.on_root("open_checkout_transaction", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (tx, pool, user_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.app_state.db_pool.clone(), guard.user_id)
      };
      tx.begin(&pool).await?;
      let mut conn = tx.conn().await?;
      let version = users::lock_cart(&mut conn, user_id).await?;
      debug!(user_id, cart_version = version, "Checkout: cart locked.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Load the cart; nothing to order is an error
  p.on_root("load_cart_for_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (tx, user_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.user_id)
      };
      let cart = {
        let mut conn = tx.conn().await?;
        carts::load_cart(&mut *conn, user_id).await?
      };
      if cart.is_empty() {
        warn!(user_id, "Checkout: cart is empty.");
        return Err(AppError::EmptyCart { user_id });
      }
      info!(user_id, lines = cart.lines.len(), total = %cart.total_cost(), "Checkout: cart loaded.");
      ctx_data.write().cart = Some(cart);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Drop lines an earlier run already turned into order lines
  p.on_root("reconcile_prior_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (tx, user_id, cart) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.user_id, guard.cart.clone())
      };
      let cart = cart.ok_or_else(|| AppError::Internal("cart not loaded before reconcile".to_string()))?;
      let line_ids: Vec<i64> = cart.lines.iter().map(|l| l.cart_id).collect();

      let mut conn = tx.conn().await?;
      let covered = orders::covered_cart_lines(&mut conn, &line_ids).await?;
      if covered.is_empty() {
        return Ok(PipelineControl::Continue);
      }

      for done in &covered {
        let Some(line) = cart.lines.iter().find(|l| l.cart_id == done.cart_line_id) else {
          continue;
        };
        carts::delete_line(&mut conn, line.cart_id).await?;
        // Units merged into the line after it was ordered are still pending.
        let remainder = line.quantity - done.quantity;
        if remainder > 0 {
          carts::insert_line(
            &mut conn,
            line.user_id,
            line.product_id,
            remainder,
            line.unit_price,
            line.reserved_at_ms,
          )
          .await?;
        }
      }
      let pending = carts::load_cart(&mut *conn, user_id).await?;
      drop(conn);

      let resumed_order = covered.iter().map(|c| c.tracking_id).max();
      warn!(
        user_id,
        already_ordered = covered.len(),
        pending_lines = pending.lines.len(),
        "Checkout: found cart lines from an earlier checkout."
      );
      let mut guard = ctx_data.write();
      if pending.is_empty() {
        guard.resumed_order = resumed_order;
      }
      guard.cart = Some(pending);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Issue a tracking id
  p.on_root("issue_tracking_id", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let tracking_id: TrackingId = {
        let guard = ctx_data.read();
        guard.app_state.tracking_ids.next()
      };
      ctx_data.write().tracking_id = Some(tracking_id);
      debug!(%tracking_id, "Checkout: tracking id issued.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: Build the receipt from the cart as it stands
  p.on_root("build_receipt", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let tracking_id = guard
        .tracking_id
        .ok_or_else(|| AppError::Internal("tracking id missing before receipt".to_string()))?;
      let cart = guard
        .cart
        .as_ref()
        .ok_or_else(|| AppError::Internal("cart missing before receipt".to_string()))?;
      let built = receipt::build_receipt(tracking_id, cart, &guard.courier_info, Utc::now())?;
      guard.receipt_text = Some(receipt::render(&built));
      guard.receipt = Some(built);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 7: Persist the order and its line snapshots
  p.on_root("persist_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (tx, receipt, receipt_text) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.receipt.clone(), guard.receipt_text.clone())
      };
      let (receipt, receipt_text) = receipt
        .zip(receipt_text)
        .ok_or_else(|| AppError::Internal("receipt missing before persist".to_string()))?;

      let mut conn = tx.conn().await?;
      if let Err(e) = orders::persist_order(&mut conn, &receipt, &receipt_text).await {
        warn!(tracking_id = %receipt.tracking_id, error = %e, "Checkout: order write rejected.");
        return Err(e);
      }
      info!(tracking_id = %receipt.tracking_id, total = %receipt.total_cost, "Checkout: order persisted.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 8: Clear the cart; runs only after the order rows are written
  p.on_root("clear_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (tx, user_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.user_id)
      };
      let cleared = {
        let mut conn = tx.conn().await?;
        carts::clear_cart(&mut conn, user_id).await?
      };
      ctx_data.write().lines_cleared = cleared;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 9: Commit
  p.on_root("commit_checkout_transaction", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let tx = { ctx_data.read().tx.clone() };
      tx.commit().await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.after_root("commit_checkout_transaction", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      match (&guard.receipt, guard.resumed_order) {
        (Some(receipt), _) => info!(
          user_id = guard.user_id,
          tracking_id = %receipt.tracking_id,
          lines = receipt.lines.len(),
          lines_cleared = guard.lines_cleared,
          total = %receipt.total_cost,
          "Checkout completed."
        ),
        (None, Some(tracking_id)) => info!(
          user_id = guard.user_id,
          %tracking_id,
          "Checkout resumed: cart had already been ordered."
        ),
        (None, None) => {}
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register_pipeline(p);
  info!("Checkout pipeline registered.");
}
