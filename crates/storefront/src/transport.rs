//! Outbound network boundary.
//!
//! Order submission, sign-in/sign-up and feedback delivery all leave the
//! storefront through a [`Transport`]. The demo storefront has no backend, so
//! [`SimulatedTransport`] waits a configured latency and succeeds; tests
//! provide their own implementation to get deterministic outcomes.

use core::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use shopvista_core::Email;

use crate::feedback::FeedbackPayload;

/// Errors returned by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote side could not be reached.
    #[error("network unavailable: {0}")]
    Unavailable(String),

    /// The remote side answered with a failure.
    #[error("request rejected: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// Category of an outbound request, used to pick latency and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    PlaceOrder,
    Auth,
    Feedback,
}

impl RequestKind {
    /// Stable name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlaceOrder => "place_order",
            Self::Auth => "auth",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request.
#[derive(Debug, Clone)]
pub enum Request {
    /// Submit an order for the current cart.
    PlaceOrder { item_count: u32, total: Decimal },
    /// Authenticate an existing account.
    SignIn { email: Email },
    /// Register a new account.
    SignUp { email: Email },
    /// Deliver a feedback form submission.
    Feedback(Box<FeedbackPayload>),
}

impl Request {
    /// The request's category.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::PlaceOrder { .. } => RequestKind::PlaceOrder,
            Self::SignIn { .. } | Self::SignUp { .. } => RequestKind::Auth,
            Self::Feedback(_) => RequestKind::Feedback,
        }
    }
}

/// Something that can deliver [`Request`]s.
pub trait Transport: Send + Sync {
    /// Send a request and wait for it to complete.
    fn send(&self, request: Request) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Per-kind latency for [`SimulatedTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub order: Duration,
    pub auth: Duration,
    pub feedback: Duration,
}

impl Latency {
    /// No delay for any request.
    pub const NONE: Self = Self {
        order: Duration::ZERO,
        auth: Duration::ZERO,
        feedback: Duration::ZERO,
    };

    /// Delay for a given request kind.
    #[must_use]
    pub const fn for_kind(&self, kind: RequestKind) -> Duration {
        match kind {
            RequestKind::PlaceOrder => self.order,
            RequestKind::Auth => self.auth,
            RequestKind::Feedback => self.feedback,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            order: Duration::from_millis(2000),
            auth: Duration::from_millis(1000),
            feedback: Duration::from_millis(2000),
        }
    }
}

/// Transport that pretends to talk to a backend: it sleeps, logs and succeeds.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    latency: Latency,
}

impl SimulatedTransport {
    /// Create a simulated transport with the given latencies.
    #[must_use]
    pub const fn new(latency: Latency) -> Self {
        Self { latency }
    }

    /// Simulated transport that completes immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Latency::NONE)
    }

    /// Configured latencies.
    #[must_use]
    pub const fn latency(&self) -> &Latency {
        &self.latency
    }
}

impl Transport for SimulatedTransport {
    async fn send(&self, request: Request) -> Result<(), TransportError> {
        let kind = request.kind();
        let delay = self.latency.for_kind(kind);
        tracing::debug!(kind = %kind, delay_ms = delay.as_millis(), "Simulating request");

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Request::Feedback(payload) = &request {
            match serde_json::to_string(payload) {
                Ok(body) => tracing::info!(kind = %kind, body = %body, "Feedback payload handed off"),
                Err(e) => tracing::warn!(kind = %kind, error = %e, "Feedback payload not serializable"),
            }
        } else {
            tracing::info!(kind = %kind, "Simulated request completed");
        }
        Ok(())
    }
}

/// Resets a pending-operation flag when dropped.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// Mark the operation as pending, or `None` if it already is.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
