//! Nepal Clothing Core - Shared domain types.
//!
//! This crate provides the types used across the workspace:
//! - `storefront` - Public-facing e-commerce site
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure business rules - no I/O, no
//! database access, no HTTP. Cart arithmetic, tax and shipping live here so
//! they can be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, usernames, the session cart, prices and totals,
//!   shipping details and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
