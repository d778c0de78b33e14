// shopkeep/src/pipelines/signin_pipeline.rs

use crate::db::users;
use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use shopkeep_flow::{ContextData, Pipeline, PipelineControl, Workflows};
use std::sync::Arc;
use tracing::{info, warn};

pub fn register_signin_pipeline(workflows: &Arc<Workflows<AppError>>) {
  let mut p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("verify_credentials", false, None),
  ]);

  p.on_root("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (username_blank, password_blank) = {
        let guard = ctx_data.read();
        (guard.username.trim().is_empty(), guard.password.is_empty())
      };
      if username_blank || password_blank {
        return Err(AppError::Validation("Username and password are required.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  p.on_root("verify_credentials", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (pool, username, password) = {
        let guard = ctx_data.read();
        (
          guard.app_state.db_pool.clone(),
          guard.username.trim().to_string(),
          guard.password.clone(),
        )
      };

      match users::find_by_credentials(&pool, &username, &password).await? {
        Some(user) => {
          info!(user_id = user.user_id, "Sign-in succeeded.");
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(%username, "Sign-in failed: unknown user or wrong password.");
          Err(AppError::Auth("Invalid username or password.".to_string()))
        }
      }
    })
  });

  workflows.register_pipeline(p);
  info!("Sign-in pipeline registered.");
}
