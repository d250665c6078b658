//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! shopvista cart add p1 "Wireless Headphones" '$79.99'
//! shopvista cart remove p1
//! shopvista cart clear
//! shopvista cart show
//! ```

use shopvista_core::{ProductId, format_money};
use shopvista_storefront::cart::{Cart, item_count_label};
use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;

/// Add one unit of a product.
pub fn add(state: &AppState, id: &str, title: &str, price: &str) -> Result<(), AppError> {
    let carts = state.carts();
    let mut cart = carts.restore();
    let cart = carts.add_item(&mut cart, &ProductId::new(id), title, price)?;
    print_summary(cart);
    Ok(())
}

/// Remove a product.
pub fn remove(state: &AppState, id: &str) -> Result<(), AppError> {
    let carts = state.carts();
    let mut cart = carts.restore();
    let cart = carts.remove_item(&mut cart, &ProductId::new(id))?;
    print_summary(cart);
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &AppState) -> Result<(), AppError> {
    let carts = state.carts();
    let mut cart = carts.restore();
    print_summary(carts.clear(&mut cart)?);
    Ok(())
}

/// Show cart contents.
pub fn show(state: &AppState) {
    print_cart(&state.carts().restore());
}

#[allow(clippy::print_stdout)]
fn print_summary(cart: &Cart) {
    println!(
        "Cart: {} - {}",
        item_count_label(cart.item_count()),
        format_money(cart.total())
    );
}

#[allow(clippy::print_stdout)]
pub fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        println!(
            "{:<12} {:<32} {:>4} x {:>12} = {:>12}",
            item.product_id,
            item.title,
            item.quantity,
            item.unit_price,
            format_money(item.line_total())
        );
    }
    print_summary(cart);
}
