// shopkeep/src/pipelines/mod.rs

//! Multi-step workflows run through the `shopkeep_flow` registry.
//!
//! Each workflow has its own context type, so `state.workflows.run(ctx)`
//! selects the pipeline from the context it is handed.

use crate::errors::AppError;
use shopkeep_flow::Workflows;
use std::sync::Arc;

pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Registers every pipeline; called once while building `AppState`.
pub fn register_all_pipelines(workflows: &Arc<Workflows<AppError>>) {
  tracing::info!("Registering pipelines...");

  signup_pipeline::register_signup_pipeline(workflows);
  signin_pipeline::register_signin_pipeline(workflows);
  cart_pipeline::register_add_to_cart_pipeline(workflows);
  checkout_pipeline::register_checkout_pipeline(workflows);

  tracing::info!("All pipelines registered.");
}
