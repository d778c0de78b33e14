// shopkeep/src/lib.rs

//! Console shopping manager over SQLite.
//!
//! Stock is reserved when a product is added to a cart and checkout turns
//! the cart into an immutable order in a single transaction. Multi-step
//! operations run as `shopkeep_flow` pipelines registered on [`AppState`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
