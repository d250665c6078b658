//! Unified error handling.
//!
//! Provides a unified `AppError` type for front ends. Module errors convert
//! into it with `?`, and [`AppError::user_message`] gives the text that is
//! safe to show the shopper.

use thiserror::Error;

use shopvista_core::PriceError;

use crate::cart::CartError;
use crate::catalog::{CatalogError, FilterError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::feedback::FeedbackError;
use crate::orders::OrderError;
use crate::session::AuthError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cart mutation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Sign-in, sign-up or sign-out failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Feedback submission failed.
    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Filter controls had unusable values.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Price text could not be parsed.
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the shopper can fix this by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Cart(err) => matches!(err, CartError::InvalidPrice(_)),
            Self::Order(err) => matches!(err, OrderError::EmptyCart),
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::EmptyCart
                    | CheckoutError::InvalidShipping(_)
                    | CheckoutError::AlreadyInProgress
            ),
            Self::Auth(err) => matches!(
                err,
                AuthError::InvalidEmail(_)
                    | AuthError::MissingName
                    | AuthError::MissingPassword
                    | AuthError::PasswordMismatch
                    | AuthError::AlreadyInProgress
            ),
            Self::Feedback(err) => matches!(
                err,
                FeedbackError::Invalid(_) | FeedbackError::AlreadyInProgress
            ),
            Self::Filter(_) | Self::Price(_) | Self::NotFound(_) => true,
            Self::Config(_) | Self::Store(_) | Self::Catalog(_) => false,
        }
    }

    /// Message suitable for showing to the shopper.
    ///
    /// Storage and delivery details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Cart(CartError::InvalidPrice(err)) | Self::Price(err) => {
                format!("Invalid price: {err}")
            }
            Self::Order(OrderError::EmptyCart) | Self::Checkout(CheckoutError::EmptyCart) => {
                "Your cart is empty".to_string()
            }
            Self::Checkout(CheckoutError::InvalidShipping(_)) => {
                "Please fill in all required fields".to_string()
            }
            Self::Checkout(CheckoutError::AlreadyInProgress) => {
                "Your order is already being processed".to_string()
            }
            Self::Checkout(CheckoutError::Transport(_)) => {
                "Failed to place order. Please try again.".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::MissingName => "Please enter your name".to_string(),
                AuthError::MissingPassword => "Please enter your password".to_string(),
                AuthError::PasswordMismatch => "Passwords do not match".to_string(),
                AuthError::AlreadyInProgress => "Already signing in...".to_string(),
                AuthError::Transport(_) | AuthError::Store(_) => {
                    "Authentication error".to_string()
                }
            },
            Self::Feedback(FeedbackError::Invalid(_)) => {
                "Please fix the errors in the form".to_string()
            }
            Self::Feedback(FeedbackError::AlreadyInProgress) => {
                "Your feedback is already being sent".to_string()
            }
            Self::Feedback(FeedbackError::Delivery(_)) => {
                "Failed to submit feedback. Please try again.".to_string()
            }
            Self::Filter(err) => err.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Config(_)
            | Self::Store(_)
            | Self::Cart(CartError::Store(_))
            | Self::Order(OrderError::Store(_))
            | Self::Checkout(CheckoutError::Order(_) | CheckoutError::ClearCart { .. })
            | Self::Catalog(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrors;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::from(OrderError::EmptyCart);
        assert_eq!(
            err.to_string(),
            "Order error: cannot place an order with an empty cart"
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(AppError::from(OrderError::EmptyCart).is_user_error());
        assert!(AppError::from(AuthError::PasswordMismatch).is_user_error());
        assert!(
            AppError::from(CheckoutError::InvalidShipping(ValidationErrors::new())).is_user_error()
        );
        assert!(!AppError::from(StoreError::Backend("Lock poisoned".to_string())).is_user_error());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::from(CartError::Store(StoreError::Backend(
            "disk on fire".to_string(),
        )));
        let message = err.user_message();
        assert!(!message.contains("disk on fire"));
        assert_eq!(message, "Something went wrong. Please try again.");
    }

    #[test]
    fn test_user_message_for_invalid_price() {
        let err = AppError::from(CartError::InvalidPrice(PriceError::InvalidFormat(
            "abc".to_string(),
        )));
        assert_eq!(err.user_message(), "Invalid price: invalid price format: \"abc\"");
    }
}
