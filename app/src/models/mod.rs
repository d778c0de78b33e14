// shopkeep/src/models/mod.rs

//! Data structures representing store rows and the values built from them.

pub mod cart_item;
pub mod money;
pub mod order;
pub mod product;
pub mod user;

pub use cart_item::{Cart, CartLine};
pub use money::Money;
pub use order::{Order, OrderLine, PopularProduct, Receipt, ReceiptLine, SalesSummary, TrackingId};
pub use product::{Category, Product, ProductListing, ProductSearch};
pub use user::User;
