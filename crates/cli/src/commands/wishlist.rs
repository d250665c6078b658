//! Wishlist commands.

use shopvista_core::{Price, ProductId};
use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;
use shopvista_storefront::wishlist::ToggleOutcome;

use super::cart::print_cart;

/// Save or unsave a product.
#[allow(clippy::print_stdout)]
pub fn toggle(
    state: &AppState,
    id: &str,
    title: &str,
    price: &str,
    image: &str,
) -> Result<(), AppError> {
    let price = Price::parse(price)?;
    let wishlists = state.wishlists();
    let mut wishlist = wishlists.restore();
    match wishlists.toggle(&mut wishlist, &ProductId::new(id), title, price, image)? {
        ToggleOutcome::Added => println!("Added to wishlist: {title}"),
        ToggleOutcome::Removed => println!("Removed from wishlist: {title}"),
    }
    Ok(())
}

/// Remove a saved product.
pub fn remove(state: &AppState, id: &str) -> Result<(), AppError> {
    let wishlists = state.wishlists();
    let mut wishlist = wishlists.restore();
    wishlists.remove(&mut wishlist, &ProductId::new(id))?;
    show(state);
    Ok(())
}

/// Show saved products.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let wishlist = state.wishlists().restore();
    if wishlist.is_empty() {
        println!("Your wishlist is empty");
        return;
    }
    for entry in wishlist.list() {
        println!(
            "{:<12} {:<32} {:>12}  saved {}",
            entry.product_id,
            entry.title,
            entry.price,
            entry.date_added.format("%Y-%m-%d")
        );
    }
}

/// Add a saved product to the cart.
pub fn to_cart(state: &AppState, id: &str) -> Result<(), AppError> {
    let product_id = ProductId::new(id);
    let wishlist = state.wishlists().restore();
    let carts = state.carts();
    let mut cart = carts.restore();

    if !state
        .wishlists()
        .move_to_cart(&wishlist, &product_id, &carts, &mut cart)?
    {
        return Err(AppError::NotFound(format!("wishlist entry {product_id}")));
    }
    print_cart(&cart);
    Ok(())
}
