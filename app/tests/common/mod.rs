// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use shopkeep::actions::{self, auth::Registration};
use shopkeep::db::{carts, catalog, orders};
use shopkeep::models::{Money, Product, User};
use shopkeep::{AppConfig, AppState};
use tempfile::TempDir;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Fresh state over a private in-memory database.
pub async fn memory_state() -> AppState {
  setup_tracing();
  AppState::init(AppConfig::in_memory()).await.expect("in-memory state")
}

/// Fresh state over a database file in `dir`, with several pooled connections.
pub async fn file_state(dir: &TempDir) -> AppState {
  setup_tracing();
  let path = dir.path().join("shop.db");
  let config = AppConfig {
    database_url: format!("sqlite://{}", path.display()),
    db_max_connections: 8,
    ..AppConfig::default()
  };
  AppState::init(config).await.expect("file-backed state")
}

pub async fn register(state: &AppState, username: &str) -> User {
  actions::auth::register(
    state,
    Registration {
      username: username.to_string(),
      password: "secret-pass".to_string(),
      full_name: format!("{} Tester", username),
      email: format!("{}@example.com", username),
    },
  )
  .await
  .expect("registration")
}

pub async fn product(state: &AppState, name: &str, cents: i64, stock: i64) -> Product {
  actions::catalog::add_product(state, name, Money::from_cents(cents), stock, None)
    .await
    .expect("product")
}

pub async fn stock_of(state: &AppState, product_id: i64) -> i64 {
  catalog::get_stock(&state.db_pool, product_id).await.expect("stock")
}

pub async fn reserved_of(state: &AppState, product_id: i64) -> i64 {
  carts::reserved_units(&state.db_pool, product_id).await.expect("reserved")
}

pub async fn ordered_of(state: &AppState, product_id: i64) -> i64 {
  orders::units_ordered(&state.db_pool, product_id).await.expect("ordered")
}

pub async fn order_count(state: &AppState) -> i64 {
  orders::count_orders(&state.db_pool).await.expect("order count")
}

/// Asserts that shelf stock plus open reservations plus units sold equals `initial`.
pub async fn assert_stock_conserved(state: &AppState, product_id: i64, initial: i64) {
  let stock = stock_of(state, product_id).await;
  let reserved = reserved_of(state, product_id).await;
  let ordered = ordered_of(state, product_id).await;
  assert!(stock >= 0, "stock went negative: {stock}");
  assert_eq!(
    stock + reserved + ordered,
    initial,
    "stock {stock} + reserved {reserved} + ordered {ordered} != {initial}"
  );
}
