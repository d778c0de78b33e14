// shopkeep/src/cli/render.rs

//! Plain-text tables for the console.

use crate::models::{Cart, Category, Order, OrderLine, PopularProduct, Product, ProductListing, SalesSummary};

pub fn product_table(products: &[ProductListing]) -> String {
  if products.is_empty() {
    return "No products found.".to_string();
  }
  let mut out = vec![format!(
    "{:>4}  {:<32} {:>10} {:>6}  {}",
    "ID", "Name", "Price", "Stock", "Category"
  )];
  out.extend(products.iter().map(|p| {
    format!(
      "{:>4}  {:<32} {:>10} {:>6}  {}",
      p.product_id,
      truncate(&p.name, 32),
      p.price.to_string(),
      p.stock_quantity,
      p.category_name.as_deref().unwrap_or("-")
    )
  }));
  out.join("\n")
}

pub fn product_details(product: &Product) -> String {
  format!(
    "Product ID: {}\nName: {}\nPrice: {}\nStock Quantity: {}\nCategory ID: {}",
    product.product_id,
    product.name,
    product.price,
    product.stock_quantity,
    product
      .category_id
      .map(|id| id.to_string())
      .unwrap_or_else(|| "-".to_string())
  )
}

pub fn category_table(categories: &[Category]) -> String {
  if categories.is_empty() {
    return "No categories defined.".to_string();
  }
  let mut out = vec![format!("{:>4}  {:<24} {}", "ID", "Category", "Price range")];
  out.extend(
    categories
      .iter()
      .map(|c| format!("{:>4}  {:<24} {}", c.category_id, truncate(&c.category_name, 24), c.price_range)),
  );
  out.join("\n")
}

pub fn cart_table(cart: &Cart) -> String {
  if cart.is_empty() {
    return "Your shopping cart is empty.".to_string();
  }
  let mut out = vec![format!(
    "{:>5}  {:<32} {:>5} {:>10} {:>11}",
    "Line", "Product", "Qty", "Price", "Subtotal"
  )];
  out.extend(cart.lines.iter().map(|l| {
    format!(
      "{:>5}  {:<32} {:>5} {:>10} {:>11}",
      l.cart_id,
      truncate(&l.product_name, 32),
      l.quantity,
      l.unit_price.to_string(),
      l.line_total().to_string()
    )
  }));
  out.push(format!("Total Cost: {}", cart.total_cost()));
  out.join("\n")
}

pub fn order_list(orders: &[Order]) -> String {
  if orders.is_empty() {
    return "No orders yet.".to_string();
  }
  orders
    .iter()
    .map(|o| {
      format!(
        "{}  {}  {:>10}  {}",
        o.tracking_id,
        o.placed_at.format("%Y-%m-%d %H:%M"),
        o.total_cost.to_string(),
        o.courier_info
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn order_lines(lines: &[OrderLine]) -> String {
  lines
    .iter()
    .map(|l| format!("  {} x {} @ {}", l.quantity, l.product_name, l.unit_price))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn sales_summary(summary: &SalesSummary) -> String {
  format!(
    "Sales Report\nOrders placed: {}\nTotal sales: {}",
    summary.order_count, summary.total_sales
  )
}

pub fn popular_products(rows: &[PopularProduct]) -> String {
  if rows.is_empty() {
    return "No sales recorded yet.".to_string();
  }
  let mut out = vec!["Popular Products".to_string()];
  out.extend(rows.iter().enumerate().map(|(rank, p)| {
    format!(
      "{}. {} (ID {}): {} orders, {} units",
      rank + 1,
      p.name,
      p.product_id,
      p.order_count,
      p.units_sold
    )
  }));
  out.join("\n")
}

fn truncate(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let mut cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('~');
    cut
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{CartLine, Money};

  #[test]
  fn cart_rendering_shows_total() {
    let cart = Cart {
      user_id: 1,
      lines: vec![CartLine {
        cart_id: 3,
        user_id: 1,
        product_id: 9,
        product_name: "Cast Iron Skillet".to_string(),
        quantity: 2,
        unit_price: Money::from_cents(3200),
        reserved_at_ms: 0,
      }],
    };
    let text = cart_table(&cart);
    assert!(text.contains("Cast Iron Skillet"));
    assert!(text.contains("$64.00"));
    assert!(text.ends_with("Total Cost: $64.00"));
  }

  #[test]
  fn long_names_are_truncated() {
    assert_eq!(truncate("abcdef", 4), "abc~");
    assert_eq!(truncate("abc", 4), "abc");
  }
}
