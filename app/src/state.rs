// shopkeep/src/state.rs

use crate::config::AppConfig;
use crate::db;
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::services::tracking::TrackingIdGenerator;
use shopkeep_flow::Workflows;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Everything an operation needs, passed explicitly. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub workflows: Arc<Workflows<AppError>>,
  pub config: Arc<AppConfig>,
  pub tracking_ids: Arc<TrackingIdGenerator>,
}

impl AppState {
  /// Connects, migrates, optionally seeds the demo catalog and registers pipelines.
  pub async fn init(config: AppConfig) -> Result<Self> {
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;
    if config.seed_db {
      db::seed::seed_demo_catalog(&pool).await?;
    }
    Self::with_pool(pool, config).await
  }

  /// Builds state over an already migrated pool.
  pub async fn with_pool(db_pool: SqlitePool, config: AppConfig) -> Result<Self> {
    let tracking_ids = TrackingIdGenerator::seeded_from(&db_pool).await?;

    let workflows = Arc::new(Workflows::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);

    info!("Application state ready.");
    Ok(Self {
      db_pool,
      workflows,
      config: Arc::new(config),
      tracking_ids: Arc::new(tracking_ids),
    })
  }
}
