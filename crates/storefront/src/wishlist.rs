//! Wishlist model.
//!
//! Saved products, unique by product ID, kept in the order they were saved
//! and persisted under the `wishlist-state` key after every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopvista_core::{Price, ProductId};

use crate::cart::{Cart, CartError, CartService};
use crate::store::{Repository, Store, StoreError, StoreKey};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub image_ref: String,
    pub date_added: DateTime<Utc>,
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Wishlist contents, persisted as a bare JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WishlistEntry>", into = "Vec<WishlistEntry>")]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in the order they were saved.
    #[must_use]
    pub fn list(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&WishlistEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.product_id == product_id)
    }

    /// Remove the product if saved, otherwise save it.
    pub fn toggle(
        &mut self,
        product_id: ProductId,
        title: impl Into<String>,
        price: Price,
        image_ref: impl Into<String>,
        now: DateTime<Utc>,
    ) -> ToggleOutcome {
        if self.remove(&product_id) {
            return ToggleOutcome::Removed;
        }

        self.entries.push(WishlistEntry {
            product_id,
            title: title.into(),
            price,
            image_ref: image_ref.into(),
            date_added: now,
        });
        ToggleOutcome::Added
    }

    /// Remove a product. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.product_id != product_id);
        self.entries.len() != before
    }
}

impl From<Vec<WishlistEntry>> for Wishlist {
    fn from(entries: Vec<WishlistEntry>) -> Self {
        let mut unique: Vec<WishlistEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.iter().any(|e| e.product_id == entry.product_id) {
                unique.push(entry);
            }
        }
        Self { entries: unique }
    }
}

impl From<Wishlist> for Vec<WishlistEntry> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.entries
    }
}

/// Persisting wishlist operations.
pub struct WishlistService<'a, S: ?Sized> {
    repo: Repository<'a, S>,
}

impl<'a, S: Store + ?Sized> WishlistService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Load the persisted wishlist, empty if absent or unreadable.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Wishlist {
        let wishlist: Wishlist = self.repo.load(StoreKey::Wishlist);
        tracing::debug!(entries = wishlist.len(), "Wishlist restored");
        wishlist
    }

    /// Add the product if absent, remove it if present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the new state cannot be saved; the wishlist is
    /// unchanged.
    #[instrument(skip(self, wishlist, title, image_ref), fields(product_id = %product_id))]
    pub fn toggle(
        &self,
        wishlist: &mut Wishlist,
        product_id: &ProductId,
        title: &str,
        price: Price,
        image_ref: &str,
    ) -> Result<ToggleOutcome, StoreError> {
        let mut next = wishlist.clone();
        let outcome = next.toggle(product_id.clone(), title, price, image_ref, Utc::now());
        self.commit(wishlist, next)?;
        tracing::info!(outcome = ?outcome, entries = wishlist.len(), "Wishlist toggled");
        Ok(outcome)
    }

    /// Remove a product. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the new state cannot be saved.
    #[instrument(skip(self, wishlist), fields(product_id = %product_id))]
    pub fn remove(&self, wishlist: &mut Wishlist, product_id: &ProductId) -> Result<(), StoreError> {
        let mut next = wishlist.clone();
        next.remove(product_id);
        self.commit(wishlist, next)
    }

    /// Add a saved product to the cart at its saved price.
    ///
    /// The entry stays in the wishlist. Returns `false` if the product is not
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the cart cannot be saved.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn move_to_cart<C: Store + ?Sized>(
        &self,
        wishlist: &Wishlist,
        product_id: &ProductId,
        carts: &CartService<'_, C>,
        cart: &mut Cart,
    ) -> Result<bool, CartError> {
        let Some(entry) = wishlist.get(product_id) else {
            tracing::debug!("Product not in wishlist");
            return Ok(false);
        };
        carts.add_priced(cart, &entry.product_id, &entry.title, entry.price)?;
        Ok(true)
    }

    fn commit(&self, wishlist: &mut Wishlist, next: Wishlist) -> Result<(), StoreError> {
        self.repo.save(StoreKey::Wishlist, &next)?;
        *wishlist = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = MemoryStore::new();
        let service = WishlistService::new(&store);
        let mut wishlist = service.restore();

        let first = service
            .toggle(&mut wishlist, &pid("p2"), "Lamp", Price::from_cents(4500), "lamp.jpg")
            .unwrap();
        assert_eq!(first, ToggleOutcome::Added);
        assert!(wishlist.contains(&pid("p2")));

        let second = service
            .toggle(&mut wishlist, &pid("p2"), "Lamp", Price::from_cents(4500), "lamp.jpg")
            .unwrap();
        assert_eq!(second, ToggleOutcome::Removed);
        assert!(wishlist.is_empty());
        assert!(service.restore().is_empty());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut wishlist = Wishlist::new();
        let now = Utc::now();
        for id in ["c", "a", "b"] {
            wishlist.toggle(pid(id), id, Price::ZERO, "", now);
        }
        let ids: Vec<_> = wishlist.list().iter().map(|e| e.product_id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        let service = WishlistService::new(&store);
        let mut wishlist = Wishlist::new();
        service
            .toggle(&mut wishlist, &pid("p1"), "A", Price::ZERO, "a.png")
            .unwrap();

        service.remove(&mut wishlist, &pid("p1")).unwrap();
        service.remove(&mut wishlist, &pid("p1")).unwrap();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_persisted_entries_survive_restore() {
        let store = MemoryStore::new();
        let service = WishlistService::new(&store);
        let mut wishlist = Wishlist::new();
        service
            .toggle(&mut wishlist, &pid("p1"), "A", Price::from_cents(999), "a.png")
            .unwrap();

        let restored = WishlistService::new(&store).restore();
        assert_eq!(restored, wishlist);
        assert_eq!(restored.get(&pid("p1")).unwrap().image_ref, "a.png");
    }

    #[test]
    fn test_restore_drops_duplicate_entries() {
        let json = r#"[
            {"productId":"p1","title":"A","price":"1","imageRef":"","dateAdded":"2024-01-01T00:00:00Z"},
            {"productId":"p1","title":"A again","price":"1","imageRef":"","dateAdded":"2024-01-02T00:00:00Z"}
        ]"#;
        let wishlist: Wishlist = serde_json::from_str(json).unwrap();
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.list().first().unwrap().title, "A");
    }

    #[test]
    fn test_move_to_cart_keeps_entry() {
        let store = MemoryStore::new();
        let wishlists = WishlistService::new(&store);
        let carts = CartService::new(&store);
        let mut wishlist = Wishlist::new();
        let mut cart = Cart::new();
        wishlists
            .toggle(&mut wishlist, &pid("p1"), "A", Price::from_cents(1250), "")
            .unwrap();

        assert!(
            wishlists
                .move_to_cart(&wishlist, &pid("p1"), &carts, &mut cart)
                .unwrap()
        );
        assert!(
            !wishlists
                .move_to_cart(&wishlist, &pid("missing"), &carts, &mut cart)
                .unwrap()
        );

        assert!(wishlist.contains(&pid("p1")));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), Price::from_cents(1250).amount());
    }
}
