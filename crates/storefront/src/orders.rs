//! Order placement and history.
//!
//! Orders are immutable snapshots of a cart. Placing one appends it to the
//! `order-history` list; clearing the live cart afterwards is the caller's
//! job (see [`crate::checkout::CheckoutFlow`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopvista_core::{OrderId, OrderStatus};

use crate::cart::{Cart, CartLineItem};
use crate::store::{Repository, Store, StoreError, StoreKey};

/// Errors raised when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart has no items.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// The order history could not be saved; no order was recorded.
    #[error("failed to save order history: {0}")]
    Store(#[from] StoreError),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartLineItem>,
    pub total: Decimal,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Sum of item quantities in the order.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity.get()))
    }
}

/// Notification text for the order history view.
#[must_use]
pub fn order_count_message(count: usize) -> String {
    if count == 0 {
        "No orders found".to_string()
    } else {
        format!("You have {count} order(s)")
    }
}

/// Order history operations.
pub struct OrderService<'a, S: ?Sized> {
    repo: Repository<'a, S>,
}

impl<'a, S: Store + ?Sized> OrderService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Record an order for the cart's current contents.
    ///
    /// The cart itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the cart has no items, and
    /// `OrderError::Store` if the history cannot be saved. Nothing is appended
    /// in either case.
    pub fn place_order(&self, cart: &Cart) -> Result<Order, OrderError> {
        self.place_order_at(cart, Utc::now())
    }

    /// [`Self::place_order`] with an explicit placement time.
    ///
    /// # Errors
    ///
    /// See [`Self::place_order`].
    #[instrument(skip(self, cart), fields(item_count = cart.item_count()))]
    pub fn place_order_at(&self, cart: &Cart, now: DateTime<Utc>) -> Result<Order, OrderError> {
        if cart.is_empty() {
            tracing::warn!("Order rejected: cart is empty");
            return Err(OrderError::EmptyCart);
        }

        let mut history = self.list_orders();
        let last_id = history.iter().map(|order| order.id).max();
        let order = Order {
            id: OrderId::next_after(last_id, now.timestamp_millis()),
            items: cart.items().to_vec(),
            total: cart.total(),
            placed_at: now,
            status: OrderStatus::Confirmed,
        };

        history.push(order.clone());
        self.repo.save(StoreKey::OrderHistory, &history)?;

        tracing::info!(
            order_id = %order.id,
            total = %order.total,
            history_len = history.len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Every recorded order, oldest first. Empty if none or unreadable.
    #[must_use]
    pub fn list_orders(&self) -> Vec<Order> {
        self.repo.load(StoreKey::OrderHistory)
    }
}
