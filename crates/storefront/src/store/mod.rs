//! Persistent key-value store for storefront state.
//!
//! State lives in four independent JSON blobs under fixed keys:
//!
//! | Key              | Contents                       |
//! |------------------|--------------------------------|
//! | `cart-state`     | cart line items                |
//! | `user-session`   | the signed-in user, or nothing |
//! | `order-history`  | placed orders, oldest first    |
//! | `wishlist-state` | wishlist entries               |
//!
//! Backends implement the raw [`Store`] trait over strings; models go through
//! the typed [`Repository`], which treats absent or malformed blobs as empty
//! state rather than failing the caller. Writes are always reported.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Fixed names of the persisted blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Cart,
    UserSession,
    OrderHistory,
    Wishlist,
}

impl StoreKey {
    /// Every key, in a stable order.
    pub const ALL: [Self; 4] = [
        Self::Cart,
        Self::UserSession,
        Self::OrderHistory,
        Self::Wishlist,
    ];

    /// Storage name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart-state",
            Self::UserSession => "user-session",
            Self::OrderHistory => "order-history",
            Self::Wishlist => "wishlist-state",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by store backends and the typed repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store location could not be opened or created.
    #[error("cannot open store at {path}: {source}")]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a blob failed.
    #[error("I/O error on {key}: {source}")]
    Io {
        key: StoreKey,
        #[source]
        source: std::io::Error,
    },

    /// A stored blob is not valid JSON for the expected type.
    #[error("stored {key} is corrupt: {source}")]
    Corrupt {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific failure (e.g. a poisoned lock).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Raw blob storage.
///
/// Implementations hold one string value per [`StoreKey`] and may be shared
/// across tasks.
pub trait Store: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn write(&self, key: StoreKey, value: &str) -> Result<(), StoreError>;

    /// Delete the blob stored under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, key: StoreKey) -> Result<(), StoreError>;
}

/// Typed JSON access to a [`Store`].
pub struct Repository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Repository<'a, S> {
    /// Create a repository over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the value under `key`, or `T::default()` when it is absent or unreadable.
    pub fn load<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        self.load_optional(key).unwrap_or_default()
    }

    /// Load the value under `key`, or `None` when it is absent or unreadable.
    ///
    /// Read failures are logged and absorbed.
    pub fn load_optional<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable stored state");
                None
            }
        }
    }

    /// Load the value under `key`, reporting read and parse failures.
    ///
    /// A stored JSON `null` is treated the same as an absent key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the blob does not parse as `T`, or
    /// the backend's error if it cannot be read.
    pub fn try_load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str::<Option<T>>(&raw).map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(value).map_err(|source| StoreError::Serialize { key, source })?;
        self.store.write(key, &json)
    }

    /// Remove the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend write fails.
    pub fn clear(&self, key: StoreKey) -> Result<(), StoreError> {
        self.store.remove(key)
    }
}
