//! Feedback command.

use shopvista_storefront::error::AppError;
use shopvista_storefront::feedback::FeedbackForm;
use shopvista_storefront::state::AppState;

use crate::FeedbackArgs;

/// Submit the feedback form.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, args: FeedbackArgs) -> Result<(), AppError> {
    let form = FeedbackForm {
        name: args.name,
        email: args.email,
        subject: args.subject,
        message: args.message,
        consent: args.consent,
    };

    println!("Sending...");
    state.feedback().submit(&form).await?;
    println!("Feedback submitted successfully!");
    Ok(())
}
