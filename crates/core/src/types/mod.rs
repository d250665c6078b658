//! Core types for ShopVista.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use category::{canonical_category, category_display_name};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, format_money};
pub use status::OrderStatus;
