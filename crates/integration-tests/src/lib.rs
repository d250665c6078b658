//! Integration tests for ShopVista.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopvista-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flows` - Multi-step shopper scenarios over an on-disk store
//! - `persistence` - Reload and corruption behaviour of the JSON file store
//! - `properties` - Property tests for cart, wishlist and filter laws
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use tempfile::TempDir;

use shopvista_core::{Price, ProductId};
use shopvista_storefront::catalog::{Catalog, MAX_RATING, Product, Rating};
use shopvista_storefront::checkout::ShippingDetails;
use shopvista_storefront::store::{JsonFileStore, StoreError};
use shopvista_storefront::transport::{Request, Transport, TransportError};

/// A JSON file store in a temporary directory that is removed on drop.
pub struct TempStore {
    dir: TempDir,
    store: JsonFileStore,
}

impl TempStore {
    /// Create a store in a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the directory cannot be created.
    pub fn new() -> Result<Self, StoreError> {
        let dir = tempfile::tempdir().map_err(|source| StoreError::Open {
            path: std::env::temp_dir(),
            source,
        })?;
        let store = JsonFileStore::open(dir.path())?;
        Ok(Self { dir, store })
    }

    /// The store.
    #[must_use]
    pub const fn store(&self) -> &JsonFileStore {
        &self.store
    }

    /// Open a second store over the same directory, as a restarted process would.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the directory has gone away.
    pub fn reopen(&self) -> Result<JsonFileStore, StoreError> {
        JsonFileStore::open(self.dir.path())
    }
}

/// Transport that records every request and answers from a fixed outcome.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<Request>>,
    offline: bool,
}

impl RecordingTransport {
    /// A transport whose requests all succeed.
    #[must_use]
    pub fn online() -> Self {
        Self::default()
    }

    /// A transport whose requests all fail.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Requests seen so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: Request) -> Result<(), TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        if self.offline {
            Err(TransportError::Unavailable("offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Build a product with a whole-dollar price. Ratings above 5 are capped.
#[must_use]
pub fn product(id: &str, title: &str, category: &str, dollars: u32, rating: u8) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        category: category.to_string(),
        price: Price::from_cents(dollars * 100),
        rating: Rating::new(rating.min(MAX_RATING)).unwrap_or_default(),
    }
}

/// A small mixed catalog.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        product("p1", "Wireless Headphones", "electronics", 25, 4),
        product("p2", "Mystery Novel", "books", 75, 3),
        product("p3", "Laptop Pro", "electronics", 550, 5),
        product("p4", "Garden Hose", "home-garden", 35, 1),
        product("p5", "Running Shoes", "fashion", 120, 4),
    ])
}

/// A complete shipping form.
#[must_use]
pub fn shipping() -> ShippingDetails {
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
