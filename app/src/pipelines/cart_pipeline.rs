// shopkeep/src/pipelines/cart_pipeline.rs

//! Add-to-cart: reserve stock and record the cart line in one transaction.

use crate::db::{self, carts, catalog, users};
use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use shopkeep_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub fn register_add_to_cart_pipeline(workflows: &Arc<Workflows<AppError>>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("open_cart_transaction", false, None),
    ("reserve_stock", false, None),
    ("fetch_product_for_cart", false, None),
    ("add_or_merge_cart_line", false, None),
    ("commit_cart_transaction", false, None),
  ]);

  // Step 1: Validate input
  p.on_root("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = { ctx_data.read().quantity };
      if quantity <= 0 {
        warn!(quantity, "Add to Cart: quantity must be positive.");
        return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Open the transaction and take the cart lock
  p.on_root("open_cart_transaction", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (tx, pool, user_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.app_state.db_pool.clone(), guard.user_id)
      };
      tx.begin(&pool).await?;
      let mut conn = tx.conn().await?;
      let version = users::lock_cart(&mut conn, user_id).await?;
      debug!(user_id, cart_version = version, "Add to Cart: cart locked.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Check and decrement stock
  p.on_root("reserve_stock", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (tx, product_id, quantity) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.product_id, guard.quantity)
      };
      let reserved = {
        let mut conn = tx.conn().await?;
        catalog::decrement_stock(&mut conn, product_id, quantity).await
      };
      match reserved {
        Ok(remaining) => {
          ctx_data.write().remaining_stock = Some(remaining);
          info!(product_id, quantity, remaining, "Add to Cart: stock reserved.");
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        Err(e) => {
          warn!(product_id, quantity, error = %e, "Add to Cart: reservation refused.");
          Err(e)
        }
      }
    })
  });

  // Step 4: Capture the product and its current price
  p.on_root("fetch_product_for_cart", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (tx, product_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.product_id)
      };
      let product = {
        let mut conn = tx.conn().await?;
        catalog::require_product(&mut *conn, product_id).await?
      };
      ctx_data.write().product = Some(product);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Append a new line or merge into the matching one
  p.on_root("add_or_merge_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (tx, user_id, product_id, quantity, unit_price) = {
        let guard = ctx_data.read();
        let price = guard
          .product
          .as_ref()
          .map(|p| p.price)
          .ok_or_else(|| AppError::Internal("product not loaded before cart write".to_string()))?;
        (guard.tx.clone(), guard.user_id, guard.product_id, guard.quantity, price)
      };

      let line = {
        let mut conn = tx.conn().await?;
        let cart_id =
          carts::add_or_merge_line(&mut conn, user_id, product_id, quantity, unit_price, db::now_ms()).await?;
        carts::find_line(&mut *conn, user_id, cart_id)
          .await?
          .ok_or_else(|| AppError::Internal(format!("cart line {} vanished after write", cart_id)))?
      };
      debug!(user_id, cart_id = line.cart_id, line_quantity = line.quantity, "Add to Cart: line written.");
      ctx_data.write().cart_line = Some(line);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: Commit
  p.on_root("commit_cart_transaction", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let tx = { ctx_data.read().tx.clone() };
      tx.commit().await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  workflows.register_pipeline(p);
  info!("Add-to-cart pipeline registered.");
}
