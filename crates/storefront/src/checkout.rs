//! Checkout flow: validate shipping, submit, record the order, empty the cart.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopvista_core::Email;

use crate::cart::{Cart, CartError, CartService};
use crate::orders::{Order, OrderError, OrderService};
use crate::store::Store;
use crate::transport::{InFlight, Request, Transport, TransportError};
use crate::validation::ValidationErrors;

/// Errors raised by [`CheckoutFlow::checkout`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Another checkout is still pending.
    #[error("a checkout is already in progress")]
    AlreadyInProgress,

    /// The cart has no items.
    #[error("your cart is empty")]
    EmptyCart,

    /// Required shipping fields are missing or invalid.
    #[error("invalid shipping details: {0}")]
    InvalidShipping(ValidationErrors),

    /// Order submission failed; nothing was recorded.
    #[error("order submission failed: {0}")]
    Transport(#[from] TransportError),

    /// The order could not be recorded.
    #[error(transparent)]
    Order(OrderError),

    /// The order was recorded but the cart could not be cleared.
    #[error("order {order_id} placed but the cart could not be cleared: {source}")]
    ClearCart {
        order_id: shopvista_core::OrderId,
        source: CartError,
    },
}

impl From<OrderError> for CheckoutError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::EmptyCart,
            other => Self::Order(other),
        }
    }
}

/// Shipping form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl ShippingDetails {
    /// Check that every field is filled in and the email is well formed.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let filled = |value: &str| !value.trim().is_empty();

        errors.check(filled(&self.first_name), "firstName", "First name is required");
        errors.check(filled(&self.last_name), "lastName", "Last name is required");
        if filled(&self.email) {
            if let Err(e) = Email::parse(&self.email) {
                errors.push("email", format!("Please enter a valid email address ({e})"));
            }
        } else {
            errors.push("email", "Email is required");
        }
        errors.check(filled(&self.address), "address", "Address is required");
        errors.check(filled(&self.city), "city", "City is required");
        errors.check(filled(&self.state), "state", "State is required");
        errors.check(filled(&self.zip), "zip", "ZIP code is required");

        errors.into_result()
    }
}

/// Drives a checkout from the live cart to a recorded order.
pub struct CheckoutFlow<'a, S: ?Sized, T> {
    carts: CartService<'a, S>,
    orders: OrderService<'a, S>,
    transport: &'a T,
    pending: Arc<AtomicBool>,
}

impl<'a, S: Store + ?Sized, T: Transport> CheckoutFlow<'a, S, T> {
    #[must_use]
    pub fn new(store: &'a S, transport: &'a T) -> Self {
        Self {
            carts: CartService::new(store),
            orders: OrderService::new(store),
            transport,
            pending: Arc::default(),
        }
    }

    /// Share the pending flag with other flows, so only one checkout runs
    /// across all of them.
    #[must_use]
    pub fn with_pending(mut self, pending: Arc<AtomicBool>) -> Self {
        self.pending = pending;
        self
    }

    /// Whether a checkout is currently pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Place an order for the cart and empty it.
    ///
    /// The cart emptiness and shipping checks run before anything is sent.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::AlreadyInProgress` while another checkout is pending
    /// - `CheckoutError::EmptyCart` for an empty cart
    /// - `CheckoutError::InvalidShipping` listing every failing field
    /// - `CheckoutError::Transport` if submission fails (nothing recorded)
    /// - `CheckoutError::Order` if the order history cannot be saved
    /// - `CheckoutError::ClearCart` if the order was recorded but the cart
    ///   could not be emptied
    #[instrument(skip_all, fields(item_count = cart.item_count(), total = %cart.total()))]
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        shipping: &ShippingDetails,
    ) -> Result<Order, CheckoutError> {
        let Some(_guard) = InFlight::acquire(&self.pending) else {
            tracing::warn!("Checkout rejected: already in progress");
            return Err(CheckoutError::AlreadyInProgress);
        };

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        shipping.validate().map_err(|errors| {
            tracing::info!(invalid = ?errors.fields(), "Checkout rejected: invalid shipping");
            CheckoutError::InvalidShipping(errors)
        })?;

        self.transport
            .send(Request::PlaceOrder {
                item_count: cart.item_count(),
                total: cart.total(),
            })
            .await?;

        let order = self.orders.place_order(cart)?;
        self.carts
            .clear(cart)
            .map_err(|source| CheckoutError::ClearCart {
                order_id: order.id,
                source,
            })?;

        tracing::info!(order_id = %order.id, "Checkout completed");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::store::MemoryStore;
    use crate::transport::{Latency, SimulatedTransport};
    use shopvista_core::ProductId;

    /// Transport that records requests and can be told to fail.
    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<Request>>,
        fail: bool,
    }

    impl Transport for Recording {
        async fn send(&self, request: Request) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(request);
            if self.fail {
                Err(TransportError::Unavailable("offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
        }
    }

    fn cart_with_item(store: &MemoryStore) -> Cart {
        let mut cart = Cart::new();
        CartService::new(store)
            .add_item(&mut cart, &ProductId::new("p1"), "Widget", "$19.99")
            .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_checkout_places_order_and_clears_cart() {
        let store = MemoryStore::new();
        let transport = Recording::default();
        let flow = CheckoutFlow::new(&store, &transport);
        let mut cart = cart_with_item(&store);

        let order = flow.checkout(&mut cart, &shipping()).await.unwrap();

        assert_eq!(order.items.len(), 1);
        assert!(cart.is_empty());
        assert!(CartService::new(&store).restore().is_empty());
        assert_eq!(OrderService::new(&store).list_orders(), vec![order]);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
        assert!(!flow.is_pending());
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_submission() {
        let store = MemoryStore::new();
        let transport = Recording::default();
        let flow = CheckoutFlow::new(&store, &transport);

        let result = flow.checkout(&mut Cart::new(), &shipping()).await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_shipping_lists_every_field() {
        let store = MemoryStore::new();
        let transport = Recording::default();
        let flow = CheckoutFlow::new(&store, &transport);
        let mut cart = cart_with_item(&store);
        let details = ShippingDetails {
            email: "not-an-email".to_string(),
            ..ShippingDetails::default()
        };

        let Err(CheckoutError::InvalidShipping(errors)) = flow.checkout(&mut cart, &details).await
        else {
            panic!("expected shipping validation failure");
        };
        assert_eq!(
            errors.fields(),
            ["firstName", "lastName", "email", "address", "city", "state", "zip"]
        );
        assert_eq!(cart.item_count(), 1);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_records_nothing() {
        let store = MemoryStore::new();
        let transport = Recording {
            fail: true,
            ..Recording::default()
        };
        let flow = CheckoutFlow::new(&store, &transport);
        let mut cart = cart_with_item(&store);

        let result = flow.checkout(&mut cart, &shipping()).await;
        assert!(matches!(result, Err(CheckoutError::Transport(_))));
        assert_eq!(cart.item_count(), 1);
        assert!(OrderService::new(&store).list_orders().is_empty());
        assert!(!flow.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_checkout_rejected_while_pending() {
        let store = MemoryStore::new();
        let transport = SimulatedTransport::new(Latency {
            order: Duration::from_secs(2),
            ..Latency::NONE
        });
        let flow = CheckoutFlow::new(&store, &transport);
        let mut first_cart = cart_with_item(&store);
        let mut second_cart = first_cart.clone();
        let details = shipping();

        let (first, second) = tokio::join!(
            flow.checkout(&mut first_cart, &details),
            flow.checkout(&mut second_cart, &details)
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(CheckoutError::AlreadyInProgress)));
        assert_eq!(OrderService::new(&store).list_orders().len(), 1);
    }

    #[test]
    fn test_shipping_validation_accepts_complete_form() {
        assert!(shipping().validate().is_ok());
    }
}
