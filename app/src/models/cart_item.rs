// shopkeep/src/models/cart_item.rs

use super::Money;
use serde::Serialize;
use sqlx::FromRow;

/// One reserved line in a user's cart, joined with the product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartLine {
  pub cart_id: i64,
  pub user_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i64,
  /// Price captured when the line was added.
  #[sqlx(rename = "unit_price_cents")]
  pub unit_price: Money,
  pub reserved_at_ms: i64,
}

impl CartLine {
  pub fn line_total(&self) -> Money {
    // quantity and price are bounded by CHECK constraints; saturate rather than wrap.
    self
      .unit_price
      .checked_times(self.quantity)
      .unwrap_or(Money::from_cents(i64::MAX))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
  pub user_id: i64,
  pub lines: Vec<CartLine>,
}

impl Cart {
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn total_cost(&self) -> Money {
    self.lines.iter().map(CartLine::line_total).sum()
  }

  /// Units of `product_id` currently held by this cart.
  pub fn reserved_units(&self, product_id: i64) -> i64 {
    self
      .lines
      .iter()
      .filter(|l| l.product_id == product_id)
      .map(|l| l.quantity)
      .sum()
  }
}
