// shopkeep/src/services/receipt.rs

//! Receipt construction and plain-text rendering.

use crate::errors::{AppError, Result};
use crate::models::{Cart, Money, Receipt, ReceiptLine, TrackingId};
use chrono::{DateTime, SecondsFormat, Utc};

const RULE_WIDTH: usize = 30;

/// Snapshots every cart line at its captured price.
pub fn build_receipt(
  tracking_id: TrackingId,
  cart: &Cart,
  courier_info: &str,
  placed_at: DateTime<Utc>,
) -> Result<Receipt> {
  let mut lines = Vec::with_capacity(cart.lines.len());
  for line in &cart.lines {
    let line_total = line.unit_price.checked_times(line.quantity).ok_or_else(|| {
      AppError::Validation(format!("Line total for product {} is too large.", line.product_id))
    })?;
    lines.push(ReceiptLine {
      cart_line_id: line.cart_id,
      product_id: line.product_id,
      product_name: line.product_name.clone(),
      quantity: line.quantity,
      unit_price: line.unit_price,
      line_total,
    });
  }

  let total_cost = lines
    .iter()
    .try_fold(Money::ZERO, |acc, l| acc.cents().checked_add(l.line_total.cents()).map(Money::from_cents))
    .ok_or_else(|| AppError::Validation("Order total is too large.".to_string()))?;

  Ok(Receipt {
    tracking_id,
    user_id: cart.user_id,
    courier_info: courier_info.to_string(),
    lines,
    total_cost,
    placed_at,
  })
}

/// The text stored with the order and shown to the customer.
pub fn render(receipt: &Receipt) -> String {
  let rule = "-".repeat(RULE_WIDTH);
  let mut out = vec![
    "Payment Receipt".to_string(),
    rule.clone(),
    format!("Tracking ID: {}", receipt.tracking_id),
    format!("Placed: {}", receipt.placed_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    format!("Courier: {}", receipt.courier_info),
    rule.clone(),
  ];
  out.extend(receipt.lines.iter().map(|line| {
    format!(
      "Product ID: {}, {}, Quantity: {} @ {} = {}",
      line.product_id, line.product_name, line.quantity, line.unit_price, line.line_total
    )
  }));
  out.push(rule);
  out.push(format!("Total Cost: {}", receipt.total_cost));
  out.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::CartLine;
  use chrono::TimeZone;

  fn sample_cart() -> Cart {
    Cart {
      user_id: 7,
      lines: vec![
        CartLine {
          cart_id: 11,
          user_id: 7,
          product_id: 1,
          product_name: "Wireless Mouse".to_string(),
          quantity: 4,
          unit_price: Money::from_cents(2499),
          reserved_at_ms: 0,
        },
        CartLine {
          cart_id: 12,
          user_id: 7,
          product_id: 2,
          product_name: "Skillet".to_string(),
          quantity: 1,
          unit_price: Money::from_cents(3200),
          reserved_at_ms: 0,
        },
      ],
    }
  }

  #[test]
  fn receipt_matches_cart_contents() {
    let placed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let receipt = build_receipt(TrackingId::new(42), &sample_cart(), "123 Main St", placed_at).unwrap();

    assert_eq!(receipt.user_id, 7);
    assert_eq!(receipt.lines.len(), 2);
    assert_eq!(receipt.lines[0].cart_line_id, 11);
    assert_eq!(receipt.lines[0].line_total, Money::from_cents(9996));
    assert_eq!(receipt.total_cost, Money::from_cents(13196));
    assert_eq!(receipt.total_cost, sample_cart().total_cost());
  }

  #[test]
  fn rendered_text_lists_lines_and_total() {
    let placed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let receipt = build_receipt(TrackingId::new(42), &sample_cart(), "123 Main St", placed_at).unwrap();
    let text = render(&receipt);

    assert!(text.starts_with("Payment Receipt\n"));
    assert!(text.contains("Tracking ID: TRK-42"));
    assert!(text.contains("Placed: 2024-05-01T12:00:00Z"));
    assert!(text.contains("Courier: 123 Main St"));
    assert!(text.contains("Product ID: 1, Wireless Mouse, Quantity: 4 @ $24.99 = $99.96"));
    assert!(text.ends_with("Total Cost: $131.96"));
  }

  #[test]
  fn overflowing_line_is_rejected() {
    let mut cart = sample_cart();
    cart.lines[0].unit_price = Money::from_cents(i64::MAX);
    let placed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let err = build_receipt(TrackingId::new(1), &cart, "x", placed_at).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }
}
