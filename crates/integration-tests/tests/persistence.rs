//! Reload and corruption behaviour of the JSON file store.
//!
//! Stored blobs are written by hand here to simulate state left behind by an
//! older or crashed process.

#![allow(clippy::unwrap_used)]

use std::fs;

use rust_decimal::Decimal;

use shopvista_core::{Price, ProductId};
use shopvista_integration_tests::{RecordingTransport, TempStore};
use shopvista_storefront::cart::{Cart, CartService};
use shopvista_storefront::orders::{Order, OrderService};
use shopvista_storefront::session::AuthService;
use shopvista_storefront::store::{Repository, StoreError, StoreKey};
use shopvista_storefront::wishlist::WishlistService;

fn write_raw(fixture: &TempStore, key: StoreKey, raw: &str) {
    fs::write(fixture.store().path_for(key), raw).unwrap();
}

// =============================================================================
// File Layout
// =============================================================================

#[test]
fn test_each_key_has_its_own_file() {
    let fixture = TempStore::new().unwrap();
    let carts = CartService::new(fixture.store());
    let wishlists = WishlistService::new(fixture.store());

    let mut cart = carts.restore();
    carts
        .add_item(&mut cart, &ProductId::new("p1"), "Widget", "$3")
        .unwrap();
    let mut wishlist = wishlists.restore();
    wishlists
        .toggle(&mut wishlist, &ProductId::new("p2"), "Scarf", Price::from_cents(900), "")
        .unwrap();

    let dir = fixture.store().dir();
    assert!(dir.join("cart-state.json").is_file());
    assert!(dir.join("wishlist-state.json").is_file());
    assert!(!dir.join("order-history.json").exists());
    assert!(!dir.join("cart-state.json.tmp").exists());
}

#[test]
fn test_cart_is_stored_as_camel_case_array() {
    let fixture = TempStore::new().unwrap();
    let carts = CartService::new(fixture.store());
    let mut cart = carts.restore();
    carts
        .add_item(&mut cart, &ProductId::new("p1"), "Widget", "$19.99")
        .unwrap();

    let raw = fs::read_to_string(fixture.store().path_for(StoreKey::Cart)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let line = json.as_array().and_then(|items| items.first()).unwrap();

    assert_eq!(line["productId"], "p1");
    assert_eq!(line["unitPrice"], "19.99");
    assert_eq!(line["quantity"], 1);
    assert!(line.get("addedAt").is_some());
}

// =============================================================================
// Fail-Open Reads
// =============================================================================

#[test]
fn test_corrupt_blobs_restore_as_empty() {
    let fixture = TempStore::new().unwrap();
    write_raw(&fixture, StoreKey::Cart, "{not json");
    write_raw(&fixture, StoreKey::Wishlist, r#"{"unexpected": true}"#);
    write_raw(&fixture, StoreKey::OrderHistory, "[1, 2, 3]");
    write_raw(&fixture, StoreKey::UserSession, "42");

    let transport = RecordingTransport::online();
    assert!(CartService::new(fixture.store()).restore().is_empty());
    assert!(WishlistService::new(fixture.store()).restore().is_empty());
    assert!(OrderService::new(fixture.store()).list_orders().is_empty());
    assert!(AuthService::new(fixture.store(), &transport).current().is_none());
}

#[test]
fn test_corrupt_blob_is_reported_by_strict_read() {
    let fixture = TempStore::new().unwrap();
    write_raw(&fixture, StoreKey::Cart, "{not json");

    let repo = Repository::new(fixture.store());
    let result = repo.try_load::<Cart>(StoreKey::Cart);

    assert!(matches!(
        result,
        Err(StoreError::Corrupt {
            key: StoreKey::Cart,
            ..
        })
    ));
}

#[test]
fn test_null_session_reads_as_signed_out() {
    let fixture = TempStore::new().unwrap();
    write_raw(&fixture, StoreKey::UserSession, "null");

    let transport = RecordingTransport::online();
    assert!(AuthService::new(fixture.store(), &transport).current().is_none());
}

#[test]
fn test_corrupt_cart_is_replaced_by_next_mutation() {
    let fixture = TempStore::new().unwrap();
    write_raw(&fixture, StoreKey::Cart, "garbage");

    let carts = CartService::new(fixture.store());
    let mut cart = carts.restore();
    carts
        .add_item(&mut cart, &ProductId::new("p1"), "Widget", "$4.00")
        .unwrap();

    let restored = CartService::new(&fixture.reopen().unwrap()).restore();
    assert_eq!(restored.item_count(), 1);
    assert_eq!(restored.total(), Decimal::new(400, 2));
}

#[test]
fn test_corrupt_history_is_replaced_by_next_order() {
    let fixture = TempStore::new().unwrap();
    write_raw(&fixture, StoreKey::OrderHistory, "{");

    let carts = CartService::new(fixture.store());
    let mut cart = carts.restore();
    carts
        .add_item(&mut cart, &ProductId::new("p1"), "Widget", "$4.00")
        .unwrap();

    let orders = OrderService::new(fixture.store());
    let order = orders.place_order(&cart).unwrap();
    assert_eq!(orders.list_orders(), vec![order]);
}

// =============================================================================
// Legacy Data
// =============================================================================

#[test]
fn test_duplicate_cart_lines_merge_on_restore() {
    let fixture = TempStore::new().unwrap();
    write_raw(
        &fixture,
        StoreKey::Cart,
        r#"[
            {"productId": "p1", "title": "Widget", "unitPrice": "19.99", "quantity": 1, "addedAt": "2024-01-01T00:00:00Z"},
            {"productId": "p2", "title": "Gadget", "unitPrice": "5.00", "quantity": 3, "addedAt": "2024-01-02T00:00:00Z"},
            {"productId": "p1", "title": "Widget", "unitPrice": "19.99", "quantity": 2, "addedAt": "2024-01-03T00:00:00Z"}
        ]"#,
    );

    let cart = CartService::new(fixture.store()).restore();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 6);
    let widget = cart.get(&ProductId::new("p1")).unwrap();
    assert_eq!(widget.quantity.get(), 3);
    assert_eq!(widget.added_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
}

#[test]
fn test_order_history_reads_back_in_creation_order() {
    let fixture = TempStore::new().unwrap();
    let carts = CartService::new(fixture.store());
    let orders = OrderService::new(fixture.store());
    let mut cart = carts.restore();

    let mut placed: Vec<Order> = Vec::new();
    for (id, price) in [("p1", "$1"), ("p2", "$2"), ("p3", "$3")] {
        carts
            .add_item(&mut cart, &ProductId::new(id), "Item", price)
            .unwrap();
        placed.push(orders.place_order(&cart).unwrap());
        carts.clear(&mut cart).unwrap();
    }

    let reopened = fixture.reopen().unwrap();
    assert_eq!(OrderService::new(&reopened).list_orders(), placed);
}
