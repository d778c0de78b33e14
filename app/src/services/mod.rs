// shopkeep/src/services/mod.rs

pub mod receipt;
pub mod reservations;
pub mod tracking;
