//! Application state shared across front-end handlers.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::cart::CartService;
use crate::checkout::CheckoutFlow;
use crate::config::StorefrontConfig;
use crate::feedback::FeedbackService;
use crate::orders::OrderService;
use crate::session::AuthService;
use crate::store::{JsonFileStore, Store, StoreError};
use crate::transport::SimulatedTransport;
use crate::wishlist::WishlistService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the persistent store, the transport and configuration. Services are
/// built on demand and borrow from it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Box<dyn Store>,
    transport: SimulatedTransport,
    checkout_pending: Arc<AtomicBool>,
    auth_pending: Arc<AtomicBool>,
    feedback_pending: Arc<AtomicBool>,
}

impl AppState {
    /// Create application state backed by a JSON file store in
    /// `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the data directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(&config.data_dir)?;
        Ok(Self::with_store(config, store))
    }

    /// Create application state over any store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: impl Store + 'static) -> Self {
        let transport = SimulatedTransport::new(config.latency);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Box::new(store),
                transport,
                checkout_pending: Arc::default(),
                auth_pending: Arc::default(),
                feedback_pending: Arc::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persistent store.
    #[must_use]
    pub fn store(&self) -> &(dyn Store + 'static) {
        self.inner.store.as_ref()
    }

    /// Get a reference to the transport.
    #[must_use]
    pub fn transport(&self) -> &SimulatedTransport {
        &self.inner.transport
    }

    #[must_use]
    pub fn carts(&self) -> CartService<'_, dyn Store> {
        CartService::new(self.store())
    }

    #[must_use]
    pub fn wishlists(&self) -> WishlistService<'_, dyn Store> {
        WishlistService::new(self.store())
    }

    #[must_use]
    pub fn orders(&self) -> OrderService<'_, dyn Store> {
        OrderService::new(self.store())
    }

    /// Checkout flow. Every flow built from this state (or its clones)
    /// shares one pending flag.
    #[must_use]
    pub fn checkout(&self) -> CheckoutFlow<'_, dyn Store, SimulatedTransport> {
        CheckoutFlow::new(self.store(), self.transport())
            .with_pending(Arc::clone(&self.inner.checkout_pending))
    }

    /// Session service. Sign-in and sign-up share one pending flag across
    /// the state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_, dyn Store, SimulatedTransport> {
        AuthService::new(self.store(), self.transport())
            .with_pending(Arc::clone(&self.inner.auth_pending))
    }

    #[must_use]
    pub fn feedback(&self) -> FeedbackService<'_, SimulatedTransport> {
        FeedbackService::new(self.transport(), self.config().page_url.clone())
            .with_pending(Arc::clone(&self.inner.feedback_pending))
    }
}
