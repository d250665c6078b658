//! ShopVista storefront library.
//!
//! Cart, wishlist, catalog search, order placement, the simulated user
//! session and feedback submission, each persisted through a [`store::Store`]
//! and reaching the outside world only through a [`transport::Transport`].
//!
//! State is passed explicitly: services borrow a store (and a transport
//! where they need one) and operate on caller-owned [`cart::Cart`] and
//! [`wishlist::Wishlist`] values, so every test can build an isolated
//! storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod feedback;
pub mod orders;
pub mod session;
pub mod state;
pub mod store;
pub mod transport;
pub mod validation;
pub mod wishlist;
