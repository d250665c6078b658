//! ShopVista Core - Shared types library.
//!
//! This crate provides the value types used across all ShopVista components:
//! - `storefront` - Cart, wishlist, catalog filtering, orders and sessions
//! - `cli` - Command-line driver over a local JSON store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no clocks,
//! no storage. This keeps it lightweight and trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
