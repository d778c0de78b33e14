// shopkeep/src/services/tracking.rs

//! Tracking id issuance.

use crate::db::{self, orders};
use crate::errors::Result;
use crate::models::TrackingId;
use sqlx::sqlite::SqlitePool;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, instrument};

/// Issues tracking ids that are unique and strictly increasing within the process.
///
/// An id is the current Unix time in milliseconds, bumped past the last id
/// issued when two checkouts land in the same millisecond or the clock steps back.
#[derive(Debug, Default)]
pub struct TrackingIdGenerator {
  last: AtomicI64,
}

impl TrackingIdGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  /// A generator that will never reissue an id already stored in `orders`.
  #[instrument(skip(pool))]
  pub async fn seeded_from(pool: &SqlitePool) -> Result<Self> {
    let generator = Self::new();
    if let Some(max) = orders::max_tracking_id(pool).await? {
      generator.advance_past(max);
      debug!(last_tracking_id = %max, "Tracking id generator seeded.");
    }
    Ok(generator)
  }

  /// Ensures every later id is greater than `id`.
  pub fn advance_past(&self, id: TrackingId) {
    self.last.fetch_max(id.value(), Ordering::SeqCst);
  }

  pub fn next(&self) -> TrackingId {
    self.next_at(db::now_ms())
  }

  fn next_at(&self, now_ms: i64) -> TrackingId {
    let step = |last: i64| now_ms.max(last.saturating_add(1));
    let prev = match self
      .last
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(step(last)))
    {
      Ok(prev) | Err(prev) => prev,
    };
    TrackingId::new(step(prev))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;
  use std::sync::Arc;

  #[test]
  fn same_millisecond_does_not_collide() {
    let generator = TrackingIdGenerator::new();
    let a = generator.next_at(1_000);
    let b = generator.next_at(1_000);
    let c = generator.next_at(999);
    assert_eq!(a, TrackingId::new(1_000));
    assert_eq!(b, TrackingId::new(1_001));
    assert_eq!(c, TrackingId::new(1_002));
  }

  #[test]
  fn advance_past_skips_known_ids() {
    let generator = TrackingIdGenerator::new();
    generator.advance_past(TrackingId::new(5_000));
    assert_eq!(generator.next_at(1_000), TrackingId::new(5_001));
    assert_eq!(generator.next_at(9_000), TrackingId::new(9_000));
  }

  #[test]
  fn ids_are_unique_across_threads() {
    let generator = Arc::new(TrackingIdGenerator::new());
    let handles: Vec<_> = (0..8)
      .map(|_| {
        let generator = Arc::clone(&generator);
        std::thread::spawn(move || (0..500).map(|_| generator.next()).collect::<Vec<_>>())
      })
      .collect();

    let mut seen = HashSet::new();
    for handle in handles {
      for id in handle.join().unwrap() {
        assert!(seen.insert(id), "duplicate tracking id {id}");
      }
    }
    assert_eq!(seen.len(), 8 * 500);
  }
}
