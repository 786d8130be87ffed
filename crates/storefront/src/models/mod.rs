//! Domain models for storefront.
//!
//! Row types map directly onto the `store` schema via `sqlx::FromRow`.
//! Session-resident types live in [`session`].

pub mod catalog;
pub mod customer;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::{Category, Product};
pub use customer::Customer;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, PlacedOrder};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
