// shopkeep/src/actions/auth.rs

use crate::db::users;
use crate::errors::{AppError, Result};
use crate::models::User;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use shopkeep_flow::{ContextData, PipelineResult};
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct Registration {
  pub username: String,
  pub password: String,
  pub full_name: String,
  pub email: String,
}

#[instrument(name = "action::register", skip(state, registration), fields(username = %registration.username), err(Display))]
pub async fn register(state: &AppState, registration: Registration) -> Result<User> {
  let ctx_data = ContextData::new(SignupCtxData {
    app_state: state.clone(),
    username: registration.username,
    password: registration.password,
    full_name: registration.full_name,
    email: registration.email,
    created_user: None,
  });

  match state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => ctx_data
      .read()
      .created_user
      .clone()
      .ok_or_else(|| AppError::Internal("Signup completed without a user.".to_string())),
    PipelineResult::Stopped => Err(AppError::Internal("Signup was halted.".to_string())),
  }
}

#[instrument(name = "action::sign_in", skip(state, password), err(Display))]
pub async fn sign_in(state: &AppState, username: &str, password: &str) -> Result<User> {
  let ctx_data = ContextData::new(SigninCtxData {
    app_state: state.clone(),
    username: username.to_string(),
    password: password.to_string(),
    user: None,
  });

  match state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => ctx_data
      .read()
      .user
      .clone()
      .ok_or_else(|| AppError::Internal("Sign-in completed without a user.".to_string())),
    PipelineResult::Stopped => Err(AppError::Auth("Sign-in was halted.".to_string())),
  }
}

pub async fn update_profile(state: &AppState, user_id: i64, full_name: &str, email: &str) -> Result<User> {
  let (full_name, email) = (full_name.trim(), email.trim());
  if full_name.is_empty() || !email.contains('@') {
    return Err(AppError::Validation("A full name and a valid email are required.".to_string()));
  }
  let user = users::update_profile(&state.db_pool, user_id, full_name, email).await?;
  info!(user_id, "Profile updated.");
  Ok(user)
}

pub async fn change_password(state: &AppState, user_id: i64, new_password: &str) -> Result<()> {
  if new_password.chars().count() < crate::pipelines::signup_pipeline::MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      crate::pipelines::signup_pipeline::MIN_PASSWORD_LEN
    )));
  }
  users::change_password(&state.db_pool, user_id, new_password).await?;
  info!(user_id, "Password changed.");
  Ok(())
}

pub async fn set_shipping_address(state: &AppState, user_id: i64, address: &str) -> Result<User> {
  let address = address.trim();
  if address.is_empty() {
    return Err(AppError::Validation("Shipping address cannot be blank.".to_string()));
  }
  users::set_shipping_address(&state.db_pool, user_id, address).await
}
