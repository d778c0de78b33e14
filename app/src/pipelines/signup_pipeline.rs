// shopkeep/src/pipelines/signup_pipeline.rs

use crate::db::users::{self, NewUser};
use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use shopkeep_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

pub const MIN_PASSWORD_LEN: usize = 4;

/// Registers the customer registration pipeline.
pub fn register_signup_pipeline(workflows: &Arc<Workflows<AppError>>) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("create_user_in_db", false, None),
  ]);

  // Step 1: Validate input
  signup_p.on_root("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.username = guard.username.trim().to_string();
      guard.full_name = guard.full_name.trim().to_string();
      guard.email = guard.email.trim().to_string();

      event!(Level::DEBUG, username = %guard.username, "Validating signup input.");
      if guard.username.is_empty() || guard.username.contains(char::is_whitespace) {
        warn!("Signup rejected: bad username.");
        return Err(AppError::Validation(
          "Username is required and may not contain spaces.".to_string(),
        ));
      }
      if guard.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("Signup rejected: password too short.");
        return Err(AppError::Validation(format!(
          "Password must be at least {} characters long.",
          MIN_PASSWORD_LEN
        )));
      }
      if guard.full_name.is_empty() {
        return Err(AppError::Validation("Full name is required.".to_string()));
      }
      if !guard.email.contains('@') {
        warn!("Signup rejected: bad email.");
        return Err(AppError::Validation("A valid email is required.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Create the user; duplicate username or email is a conflict
  signup_p.on_root("create_user_in_db", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (pool, username, password, full_name, email) = {
        let guard = ctx_data.read();
        (
          guard.app_state.db_pool.clone(),
          guard.username.clone(),
          guard.password.clone(),
          guard.full_name.clone(),
          guard.email.clone(),
        )
      };

      let new_user = NewUser {
        username: &username,
        password: &password,
        full_name: &full_name,
        email: &email,
      };
      match users::create_user(&pool, &new_user).await {
        Ok(user) => {
          info!(user_id = user.user_id, username = %user.username, "User registered.");
          ctx_data.write().created_user = Some(user);
          Ok(PipelineControl::Continue)
        }
        Err(e) => {
          event!(Level::WARN, error = %e, "User registration failed.");
          Err(e)
        }
      }
    })
  });

  workflows.register_pipeline(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}
