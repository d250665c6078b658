//! Checkout command.

use shopvista_core::format_money;
use shopvista_storefront::checkout::ShippingDetails;
use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;

use crate::ShippingArgs;

/// Place an order for the current cart.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, args: ShippingArgs) -> Result<(), AppError> {
    let shipping = ShippingDetails {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        address: args.address,
        city: args.city,
        state: args.state,
        zip: args.zip,
    };

    let mut cart = state.carts().restore();
    println!("Processing your order...");
    let order = state.checkout().checkout(&mut cart, &shipping).await?;
    println!(
        "Order placed successfully! Order ID: {} ({})",
        order.id,
        format_money(order.total)
    );
    Ok(())
}
