// shopkeep/src/actions/mod.rs

//! Operations the console (or any other front end) calls. Every operation
//! takes the acting user's id explicitly and returns a typed result.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod reports;
