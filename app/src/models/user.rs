// shopkeep/src/models/user.rs

use serde::Serialize;
use sqlx::FromRow;

/// A registered customer. The password column is never loaded into this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
  pub user_id: i64,
  pub username: String,
  pub full_name: String,
  pub email: String,
  /// Used as the courier destination when checkout is given none.
  pub shipping_address: Option<String>,
}
