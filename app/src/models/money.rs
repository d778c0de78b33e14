// shopkeep/src/models/money.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// An amount in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
  pub const ZERO: Money = Money(0);

  pub const fn from_cents(cents: i64) -> Self {
    Money(cents)
  }

  pub const fn cents(self) -> i64 {
    self.0
  }

  /// Price of `quantity` units, or `None` on overflow.
  pub fn checked_times(self, quantity: i64) -> Option<Money> {
    self.0.checked_mul(quantity).map(Money)
  }
}

impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money {
    Money(self.0 + rhs.0)
  }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
    iter.fold(Money::ZERO, Add::add)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.0 < 0 { "-" } else { "" };
    let abs = self.0.unsigned_abs();
    write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid amount (expected e.g. 12, 12.5 or $12.50)")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
  type Err = ParseMoneyError;

  /// Accepts a non-negative amount with at most two decimals, optionally prefixed with `$`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ParseMoneyError(s.to_string());
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);

    let (whole, frac) = match digits.split_once('.') {
      Some((w, f)) => (w, f),
      None => (digits, ""),
    };
    if whole.is_empty() && frac.is_empty() {
      return Err(invalid());
    }
    if frac.len() > 2 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
      return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac_cents: i64 = match frac.len() {
      0 => 0,
      1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
      _ => frac.parse().map_err(|_| invalid())?,
    };

    whole
      .checked_mul(100)
      .and_then(|c| c.checked_add(frac_cents))
      .map(Money)
      .ok_or_else(invalid)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn displays_dollars_and_cents() {
    assert_eq!(Money::from_cents(1999).to_string(), "$19.99");
    assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    assert_eq!(Money::ZERO.to_string(), "$0.00");
  }

  #[test]
  fn parses_common_inputs() {
    assert_eq!("12".parse::<Money>().unwrap(), Money::from_cents(1200));
    assert_eq!("12.5".parse::<Money>().unwrap(), Money::from_cents(1250));
    assert_eq!("$0.99".parse::<Money>().unwrap(), Money::from_cents(99));
    assert_eq!(".5".parse::<Money>().unwrap(), Money::from_cents(50));
  }

  #[test]
  fn rejects_malformed_amounts() {
    for bad in ["", "$", "1.234", "-3", "abc", "1.2.3", "."] {
      assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
    }
  }

  #[test]
  fn sums_and_multiplies() {
    let total: Money = [Money::from_cents(250), Money::from_cents(100)].into_iter().sum();
    assert_eq!(total, Money::from_cents(350));
    assert_eq!(Money::from_cents(250).checked_times(4), Some(Money::from_cents(1000)));
    assert_eq!(Money::from_cents(i64::MAX).checked_times(2), None);
  }
}
