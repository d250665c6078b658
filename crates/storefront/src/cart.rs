//! Shopping cart model.
//!
//! A [`Cart`] is plain data: an insertion-ordered list of line items, unique
//! by product, from which the item count and total are always derived.
//! [`CartService`] applies user mutations and persists the result under the
//! `cart-state` key before handing the new state back.
//!
//! Every mutation is computed on a copy and only committed to the caller's
//! cart once the write has succeeded, so a failed write changes nothing.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopvista_core::{Price, PriceError, ProductId};

use crate::store::{Repository, Store, StoreError, StoreKey};

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The price text could not be parsed; the item was not added.
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),

    /// The new cart state could not be persisted; the cart is unchanged.
    #[error("failed to save cart: {0}")]
    Store(#[from] StoreError),
}

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub quantity: NonZeroU32,
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Price of this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity.get())
    }
}

/// Cart contents.
///
/// Persisted as a bare JSON array of line items. Duplicate product entries in
/// stored data are merged on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity.get()))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Line total for one product, zero if it is not in the cart.
    #[must_use]
    pub fn line_total(&self, product_id: &ProductId) -> Decimal {
        self.get(product_id)
            .map_or(Decimal::ZERO, CartLineItem::line_total)
    }

    /// Add one unit of a product.
    ///
    /// An existing line has its quantity bumped and keeps its original title,
    /// price and `added_at`. Otherwise a new line with quantity 1 is appended.
    pub fn add(
        &mut self,
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Price,
        now: DateTime<Utc>,
    ) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }

        self.items.push(CartLineItem {
            product_id,
            title: title.into(),
            unit_price,
            quantity: NonZeroU32::MIN,
            added_at: now,
        });
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged
                .iter_mut()
                .find(|existing| existing.product_id == item.product_id)
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity.get());
                }
                None => merged.push(item),
            }
        }
        Self { items: merged }
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

/// Human label for a cart size, e.g. `"1 item"`, `"3 items"`.
#[must_use]
pub fn item_count_label(count: u32) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

/// Persisting cart operations.
pub struct CartService<'a, S: ?Sized> {
    repo: Repository<'a, S>,
}

impl<'a, S: Store + ?Sized> CartService<'a, S> {
    /// Create a cart service over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Load the persisted cart, or an empty cart if none is stored or it is unreadable.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Cart {
        let cart: Cart = self.repo.load(StoreKey::Cart);
        tracing::debug!(
            lines = cart.len(),
            item_count = cart.item_count(),
            "Cart restored"
        );
        cart
    }

    /// Add one unit of a product whose price is given as display text (`"$19.99"`).
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidPrice` if the price text is malformed or
    /// negative, and `CartError::Store` if the new state cannot be saved. The
    /// cart is unchanged in both cases.
    #[instrument(skip(self, cart, title), fields(product_id = %product_id))]
    pub fn add_item<'c>(
        &self,
        cart: &'c mut Cart,
        product_id: &ProductId,
        title: &str,
        unit_price: &str,
    ) -> Result<&'c Cart, CartError> {
        let price = Price::parse(unit_price).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected add to cart");
        })?;
        self.add_priced(cart, product_id, title, price)
    }

    /// Add one unit of a product at an already validated price.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the new state cannot be saved; the cart is
    /// unchanged.
    #[instrument(skip(self, cart, title), fields(product_id = %product_id, price = %price))]
    pub fn add_priced<'c>(
        &self,
        cart: &'c mut Cart,
        product_id: &ProductId,
        title: &str,
        price: Price,
    ) -> Result<&'c Cart, CartError> {
        let mut next = cart.clone();
        next.add(product_id.clone(), title, price, Utc::now());
        let cart = self.commit(cart, next)?;
        tracing::info!(
            item_count = cart.item_count(),
            total = %cart.total(),
            "Item added to cart"
        );
        Ok(cart)
    }

    /// Remove a product from the cart. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the new state cannot be saved.
    #[instrument(skip(self, cart), fields(product_id = %product_id))]
    pub fn remove_item<'c>(
        &self,
        cart: &'c mut Cart,
        product_id: &ProductId,
    ) -> Result<&'c Cart, CartError> {
        let mut next = cart.clone();
        if next.remove(product_id) {
            tracing::info!("Item removed from cart");
        }
        self.commit(cart, next)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the new state cannot be saved.
    #[instrument(skip(self, cart))]
    pub fn clear<'c>(&self, cart: &'c mut Cart) -> Result<&'c Cart, CartError> {
        self.commit(cart, Cart::new())
    }

    fn commit<'c>(&self, cart: &'c mut Cart, next: Cart) -> Result<&'c Cart, CartError> {
        self.repo.save(StoreKey::Cart, &next)?;
        *cart = next;
        Ok(cart)
    }
}
