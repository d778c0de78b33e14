// shopkeep/src/db/users.rs

use crate::errors::{AppError, Result};
use crate::models::User;
use sqlx::sqlite::{SqliteConnection, SqliteExecutor};

pub struct NewUser<'a> {
  pub username: &'a str,
  pub password: &'a str,
  pub full_name: &'a str,
  pub email: &'a str,
}

/// Inserts a user. A taken username or email surfaces as `Conflict`.
pub async fn create_user<'e>(executor: impl SqliteExecutor<'e>, new_user: &NewUser<'_>) -> Result<User> {
  sqlx::query_as::<_, User>(
    "INSERT INTO users (username, password, full_name, email) VALUES (?1, ?2, ?3, ?4)
     RETURNING user_id, username, full_name, email, shipping_address",
  )
  .bind(new_user.username)
  .bind(new_user.password)
  .bind(new_user.full_name)
  .bind(new_user.email)
  .fetch_one(executor)
  .await
  .map_err(|e| {
    let err = AppError::from(e);
    if err.is_unique_violation() {
      AppError::Conflict("That username or email is already registered.".to_string())
    } else {
      err
    }
  })
}

pub async fn find_by_credentials<'e>(
  executor: impl SqliteExecutor<'e>,
  username: &str,
  password: &str,
) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(
    "SELECT user_id, username, full_name, email, shipping_address FROM users WHERE username = ?1 AND password = ?2",
  )
  .bind(username)
  .bind(password)
  .fetch_optional(executor)
  .await?;
  Ok(user)
}

pub async fn find_user<'e>(executor: impl SqliteExecutor<'e>, user_id: i64) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>("SELECT user_id, username, full_name, email, shipping_address FROM users WHERE user_id = ?1")
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
  Ok(user)
}

pub async fn update_profile<'e>(
  executor: impl SqliteExecutor<'e>,
  user_id: i64,
  full_name: &str,
  email: &str,
) -> Result<User> {
  sqlx::query_as::<_, User>(
    "UPDATE users SET full_name = ?2, email = ?3 WHERE user_id = ?1
     RETURNING user_id, username, full_name, email, shipping_address",
  )
  .bind(user_id)
  .bind(full_name)
  .bind(email)
  .fetch_optional(executor)
  .await
  .map_err(|e| {
    let err = AppError::from(e);
    if err.is_unique_violation() {
      AppError::Conflict("That email is already registered.".to_string())
    } else {
      err
    }
  })?
  .ok_or_else(|| user_not_found(user_id))
}

pub async fn change_password<'e>(executor: impl SqliteExecutor<'e>, user_id: i64, new_password: &str) -> Result<()> {
  let updated = sqlx::query("UPDATE users SET password = ?2 WHERE user_id = ?1")
    .bind(user_id)
    .bind(new_password)
    .execute(executor)
    .await?
    .rows_affected();
  if updated == 0 {
    return Err(user_not_found(user_id));
  }
  Ok(())
}

pub async fn set_shipping_address<'e>(executor: impl SqliteExecutor<'e>, user_id: i64, address: &str) -> Result<User> {
  sqlx::query_as::<_, User>(
    "UPDATE users SET shipping_address = ?2 WHERE user_id = ?1
     RETURNING user_id, username, full_name, email, shipping_address",
  )
  .bind(user_id)
  .bind(address)
  .fetch_optional(executor)
  .await?
  .ok_or_else(|| user_not_found(user_id))
}

/// Bumps the user's cart version and returns the new value.
///
/// Run first in every cart-mutating transaction: the write takes SQLite's
/// write lock before anything is read, and concurrent mutations of the same
/// cart queue up behind it.
pub async fn lock_cart(conn: &mut SqliteConnection, user_id: i64) -> Result<i64> {
  sqlx::query_scalar::<_, i64>(
    "UPDATE users SET cart_version = cart_version + 1 WHERE user_id = ?1 RETURNING cart_version",
  )
  .bind(user_id)
  .fetch_optional(conn)
  .await?
  .ok_or_else(|| user_not_found(user_id))
}

fn user_not_found(user_id: i64) -> AppError {
  AppError::NotFound(format!("User {} not found.", user_id))
}
