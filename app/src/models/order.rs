// shopkeep/src/models/order.rs

use super::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Unique, strictly increasing order identifier, shown as `TRK-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TrackingId(i64);

impl TrackingId {
  pub const PREFIX: &'static str = "TRK-";

  pub const fn new(value: i64) -> Self {
    TrackingId(value)
  }

  pub const fn value(self) -> i64 {
    self.0
  }
}

impl fmt::Display for TrackingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", Self::PREFIX, self.0)
  }
}

impl FromStr for TrackingId {
  type Err = std::num::ParseIntError;

  /// Accepts both `TRK-123` and a bare `123`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let digits = s.strip_prefix(Self::PREFIX).unwrap_or(s);
    digits.parse().map(TrackingId)
  }
}

/// A finalized order. Rows are written once at checkout and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
  pub tracking_id: TrackingId,
  pub user_id: i64,
  pub courier_info: String,
  pub receipt_text: String,
  #[sqlx(rename = "total_cost_cents")]
  pub total_cost: Money,
  pub placed_at: DateTime<Utc>,
}

/// Line snapshot stored with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderLine {
  pub order_item_id: i64,
  pub tracking_id: TrackingId,
  /// The cart line this snapshot was taken from.
  pub cart_line_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i64,
  #[sqlx(rename = "unit_price_cents")]
  pub unit_price: Money,
}

/// One line of a receipt, priced as of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
  pub cart_line_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub quantity: i64,
  pub unit_price: Money,
  pub line_total: Money,
}

/// Immutable summary handed back from checkout and stored as `receipt_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
  pub tracking_id: TrackingId,
  pub user_id: i64,
  pub courier_info: String,
  pub lines: Vec<ReceiptLine>,
  pub total_cost: Money,
  pub placed_at: DateTime<Utc>,
}

/// Aggregate figures over every order placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct SalesSummary {
  pub order_count: i64,
  #[sqlx(rename = "total_sales_cents")]
  pub total_sales: Money,
}

/// A product ranked by how many orders it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PopularProduct {
  pub product_id: i64,
  pub name: String,
  pub order_count: i64,
  pub units_sold: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tracking_id_round_trips_through_display() {
    let id = TrackingId::new(1_700_000_000_123);
    assert_eq!(id.to_string(), "TRK-1700000000123");
    assert_eq!(id.to_string().parse::<TrackingId>().unwrap(), id);
    assert_eq!("42".parse::<TrackingId>().unwrap(), TrackingId::new(42));
    assert!("TRK-".parse::<TrackingId>().is_err());
  }
}
