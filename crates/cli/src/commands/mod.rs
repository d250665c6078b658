//! Command implementations.
//!
//! Each command prints its result to stdout; logs go to stderr.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod feedback;
pub mod orders;
pub mod search;
pub mod wishlist;

use shopvista_storefront::error::AppError;

/// Print the shopper-facing message for a failed command.
#[allow(clippy::print_stderr)]
pub fn report_error(error: &AppError) {
    eprintln!("error: {}", error.user_message());
    if let AppError::Checkout(shopvista_storefront::checkout::CheckoutError::InvalidShipping(
        errors,
    ))
    | AppError::Feedback(shopvista_storefront::feedback::FeedbackError::Invalid(errors)) = error
    {
        for field in errors.iter() {
            eprintln!("  {}: {}", field.field, field.message);
        }
    }
}
