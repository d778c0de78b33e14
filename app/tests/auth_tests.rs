// tests/auth_tests.rs
mod common;

use common::*;
use shopkeep::actions::{self, auth::Registration};
use shopkeep::AppError;

fn registration(username: &str, password: &str) -> Registration {
  Registration {
    username: username.to_string(),
    password: password.to_string(),
    full_name: "Test User".to_string(),
    email: format!("{}@example.com", username),
  }
}

#[tokio::test]
async fn register_then_sign_in() {
  let state = memory_state().await;
  let created = actions::auth::register(&state, registration("alice", "hunter22")).await.unwrap();
  assert_eq!(created.username, "alice");
  assert_eq!(created.shipping_address, None);

  let signed_in = actions::auth::sign_in(&state, "alice", "hunter22").await.unwrap();
  assert_eq!(signed_in.user_id, created.user_id);
}

#[tokio::test]
async fn duplicate_usernames_conflict() {
  let state = memory_state().await;
  actions::auth::register(&state, registration("alice", "hunter22")).await.unwrap();
  let err = actions::auth::register(&state, registration("alice", "another1"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn signup_input_is_validated() {
  let state = memory_state().await;
  let short = actions::auth::register(&state, registration("bob", "ab")).await.unwrap_err();
  assert!(matches!(short, AppError::Validation(_)));

  let mut no_email = registration("bob", "long-enough");
  no_email.email = "not-an-address".to_string();
  let err = actions::auth::register(&state, no_email).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  let blank = actions::auth::register(&state, registration("  ", "long-enough")).await.unwrap_err();
  assert!(matches!(blank, AppError::Validation(_)));
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
  let state = memory_state().await;
  register(&state, "carol").await;

  let err = actions::auth::sign_in(&state, "carol", "wrong-pass").await.unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));
  let err = actions::auth::sign_in(&state, "nobody", "secret-pass").await.unwrap_err();
  assert!(matches!(err, AppError::Auth(_)));
  let err = actions::auth::sign_in(&state, "", "").await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn account_settings_persist() {
  let state = memory_state().await;
  let user = register(&state, "dave").await;

  let updated = actions::auth::update_profile(&state, user.user_id, "Dave Smith", "dave@shop.test")
    .await
    .unwrap();
  assert_eq!(updated.full_name, "Dave Smith");
  assert_eq!(updated.email, "dave@shop.test");

  let err = actions::auth::update_profile(&state, user.user_id, "Dave", "no-at-sign")
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  actions::auth::change_password(&state, user.user_id, "fresh-pass").await.unwrap();
  assert!(actions::auth::sign_in(&state, "dave", "secret-pass").await.is_err());
  actions::auth::sign_in(&state, "dave", "fresh-pass").await.unwrap();

  let err = actions::auth::change_password(&state, user.user_id, "x").await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  let addressed = actions::auth::set_shipping_address(&state, user.user_id, "1 Main St")
    .await
    .unwrap();
  assert_eq!(addressed.shipping_address.as_deref(), Some("1 Main St"));
}

#[tokio::test]
async fn profile_email_must_stay_unique() {
  let state = memory_state().await;
  register(&state, "erin").await;
  let frank = register(&state, "frank").await;
  let err = actions::auth::update_profile(&state, frank.user_id, "Frank", "erin@example.com")
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}
