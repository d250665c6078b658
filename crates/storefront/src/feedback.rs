//! Feedback form submission.
//!
//! The form is validated field by field, collecting every failure, then
//! turned into a [`FeedbackPayload`] and handed to the [`Transport`].
//! Where the payload ends up is the transport's business.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use shopvista_core::Email;

use crate::transport::{InFlight, Request, Transport, TransportError};
use crate::validation::ValidationErrors;

/// Subject used when the form leaves it blank.
pub const DEFAULT_SUBJECT: &str = "General Feedback";

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;

/// Errors raised by [`FeedbackService::submit`].
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// One or more fields failed validation.
    #[error("invalid feedback form: {0}")]
    Invalid(ValidationErrors),

    /// A submission is still pending.
    #[error("feedback submission already in progress")]
    AlreadyInProgress,

    /// The payload could not be delivered.
    #[error("failed to deliver feedback: {0}")]
    Delivery(#[from] TransportError),
}

/// Raw feedback form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub consent: bool,
}

impl FeedbackForm {
    /// Check every field, reporting all failures at once.
    ///
    /// # Errors
    ///
    /// Returns the failing fields in form order: `name`, `email`, `message`,
    /// `consent`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Name is required");
        } else if name.chars().count() < MIN_NAME_CHARS {
            errors.push("name", "Name must be at least 2 characters");
        }

        if self.email.trim().is_empty() {
            errors.push("email", "Email is required");
        } else if Email::parse(&self.email).is_err() {
            errors.push("email", "Please enter a valid email address");
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.push("message", "Message is required");
        } else if message.chars().count() < MIN_MESSAGE_CHARS {
            errors.push("message", "Message must be at least 10 characters");
        }

        errors.check(self.consent, "consent", "You must agree to the privacy policy");

        errors.into_result()
    }

    fn subject(&self) -> String {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT)
            .to_string()
    }
}

/// What gets sent for a valid feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub client_context: String,
    pub page_url: Url,
}

impl FeedbackPayload {
    /// Build the payload for a form.
    ///
    /// # Errors
    ///
    /// Returns the form's validation errors.
    pub fn from_form(
        form: &FeedbackForm,
        client_context: &str,
        page_url: &Url,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        form.validate()?;

        let email = Email::parse(&form.email).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.push("email", e.to_string());
            errors
        })?;

        Ok(Self {
            name: form.name.trim().to_string(),
            email,
            subject: form.subject(),
            message: form.message.trim().to_string(),
            timestamp: now,
            client_context: client_context.to_string(),
            page_url: page_url.clone(),
        })
    }
}

/// Default client description, e.g. `shopvista/0.1.0 (linux)`.
#[must_use]
pub fn default_client_context() -> String {
    format!(
        "shopvista/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

/// Submits feedback forms.
pub struct FeedbackService<'a, T> {
    transport: &'a T,
    page_url: Url,
    client_context: String,
    pending: Arc<AtomicBool>,
}

impl<'a, T: Transport> FeedbackService<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, page_url: Url) -> Self {
        Self {
            transport,
            page_url,
            client_context: default_client_context(),
            pending: Arc::default(),
        }
    }

    /// Share the pending flag with other services.
    #[must_use]
    pub fn with_pending(mut self, pending: Arc<AtomicBool>) -> Self {
        self.pending = pending;
        self
    }

    /// Override the client description stamped on payloads.
    #[must_use]
    pub fn with_client_context(mut self, client_context: impl Into<String>) -> Self {
        self.client_context = client_context.into();
        self
    }

    /// Validate the form and deliver its payload.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Invalid` with every failing field (nothing is
    /// sent), `FeedbackError::AlreadyInProgress` while another submission is
    /// pending, and `FeedbackError::Delivery` if the transport fails.
    #[instrument(skip_all)]
    pub async fn submit(&self, form: &FeedbackForm) -> Result<FeedbackPayload, FeedbackError> {
        let payload = FeedbackPayload::from_form(form, &self.client_context, &self.page_url, Utc::now())
            .map_err(|errors| {
                tracing::info!(invalid = ?errors.fields(), "Feedback rejected");
                FeedbackError::Invalid(errors)
            })?;

        let _guard = InFlight::acquire(&self.pending).ok_or(FeedbackError::AlreadyInProgress)?;
        self.transport
            .send(Request::Feedback(Box::new(payload.clone())))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Feedback delivery failed"))?;

        tracing::info!(subject = %payload.subject, "Feedback submitted");
        Ok(payload)
    }
}
