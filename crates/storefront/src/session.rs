//! Simulated user session.
//!
//! There is no account backend: sign-in and sign-up go through the
//! [`Transport`] for their latency and then store a [`User`] under the
//! `user-session` key. At most one user is signed in at a time.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use shopvista_core::{Email, EmailError, UserId};

use crate::store::{Repository, Store, StoreError, StoreKey};
use crate::transport::{InFlight, Request, Transport, TransportError};

/// Errors that can occur during sign-in, sign-up or sign-out.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Sign-up without a name.
    #[error("name is required")]
    MissingName,

    /// Empty password.
    #[error("password is required")]
    MissingPassword,

    /// Sign-up password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Another sign-in or sign-up is still pending.
    #[error("authentication already in progress")]
    AlreadyInProgress,

    /// The authentication request failed.
    #[error("authentication request failed: {0}")]
    Transport(#[from] TransportError),

    /// The session could not be saved or cleared.
    #[error("session storage error: {0}")]
    Store(#[from] StoreError),
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl User {
    fn new(name: String, email: Email) -> Self {
        Self {
            id: UserId::generate(),
            name,
            email,
            created_at: Utc::now(),
        }
    }
}

/// Session operations.
pub struct AuthService<'a, S: ?Sized, T> {
    repo: Repository<'a, S>,
    transport: &'a T,
    pending: Arc<AtomicBool>,
}

impl<'a, S: Store + ?Sized, T: Transport> AuthService<'a, S, T> {
    /// Create a new session service.
    #[must_use]
    pub fn new(store: &'a S, transport: &'a T) -> Self {
        Self {
            repo: Repository::new(store),
            transport,
            pending: Arc::default(),
        }
    }

    /// Share the pending flag with other services, so only one sign-in or
    /// sign-up runs across all of them.
    #[must_use]
    pub fn with_pending(mut self, pending: Arc<AtomicBool>) -> Self {
        self.pending = pending;
        self
    }

    /// The signed-in user, if any. An unreadable session counts as signed out.
    #[must_use]
    pub fn current(&self) -> Option<User> {
        self.repo.load_optional(StoreKey::UserSession)
    }

    /// Sign in. The user's display name is the local part of their email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingPassword` for
    /// bad input, `AuthError::AlreadyInProgress` while another attempt is
    /// pending, and `AuthError::Transport` / `AuthError::Store` if the attempt
    /// fails. No session is stored on error.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let _guard = InFlight::acquire(&self.pending).ok_or(AuthError::AlreadyInProgress)?;
        self.transport
            .send(Request::SignIn {
                email: email.clone(),
            })
            .await?;

        let user = User::new(email.local_part().to_string(), email);
        self.repo.save(StoreKey::UserSession, &user)?;
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` before anything else when the
    /// confirmation differs, then the same errors as [`Self::sign_in`] plus
    /// `AuthError::MissingName`.
    #[instrument(skip_all)]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<User, AuthError> {
        if password.expose_secret() != confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let _guard = InFlight::acquire(&self.pending).ok_or(AuthError::AlreadyInProgress)?;
        self.transport
            .send(Request::SignUp {
                email: email.clone(),
            })
            .await?;

        let user = User::new(name.to_string(), email);
        self.repo.save(StoreKey::UserSession, &user)?;
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Sign out. Signing out with no active session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session cannot be cleared.
    #[instrument(skip_all)]
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.repo.clear(StoreKey::UserSession)?;
        tracing::info!("User signed out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::store::MemoryStore;
    use crate::transport::{Latency, SimulatedTransport};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl Transport for Counting {
        async fn send(&self, _request: Request) -> Result<(), TransportError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn test_sign_in_uses_email_local_part() {
        let store = MemoryStore::new();
        let transport = SimulatedTransport::instant();
        let auth = AuthService::new(&store, &transport);

        let user = auth
            .sign_in("jane.doe@example.com", &secret("hunter22"))
            .await
            .unwrap();
        assert_eq!(user.name, "jane.doe");
        assert_eq!(auth.current(), Some(user));
    }

    #[tokio::test]
    async fn test_sign_up_mismatch_fails_before_request() {
        let store = MemoryStore::new();
        let transport = Counting::default();
        let auth = AuthService::new(&store, &transport);

        let result = auth
            .sign_up("Jane", "jane@example.com", &secret("a"), &secret("b"))
            .await;
        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
        assert_eq!(transport.0.load(Ordering::SeqCst), 0);
        assert!(auth.current().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_requires_name() {
        let store = MemoryStore::new();
        let transport = Counting::default();
        let auth = AuthService::new(&store, &transport);

        let result = auth
            .sign_up("  ", "jane@example.com", &secret("pw"), &secret("pw"))
            .await;
        assert!(matches!(result, Err(AuthError::MissingName)));
    }

    #[tokio::test]
    async fn test_sign_up_keeps_given_name() {
        let store = MemoryStore::new();
        let transport = Counting::default();
        let auth = AuthService::new(&store, &transport);

        let user = auth
            .sign_up(" Jane Doe ", "jane@example.com", &secret("pw"), &secret("pw"))
            .await
            .unwrap();
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email.as_str(), "jane@example.com");
        assert_eq!(transport.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let store = MemoryStore::new();
        let transport = Counting::default();
        let auth = AuthService::new(&store, &transport);

        let result = auth.sign_in("jane", &secret("pw")).await;
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let store = MemoryStore::new();
        let transport = SimulatedTransport::instant();
        let auth = AuthService::new(&store, &transport);
        auth.sign_in("jane@example.com", &secret("pw")).await.unwrap();

        auth.sign_out().unwrap();
        assert!(auth.current().is_none());
        auth.sign_out().unwrap();
    }

    #[test]
    fn test_corrupt_session_reads_as_signed_out() {
        let store = MemoryStore::new();
        store.write(StoreKey::UserSession, "{\"id\":").unwrap();
        let transport = SimulatedTransport::instant();
        assert!(AuthService::new(&store, &transport).current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_sign_in_rejected() {
        let store = MemoryStore::new();
        let transport = SimulatedTransport::new(Latency {
            auth: Duration::from_secs(1),
            ..Latency::NONE
        });
        let auth = AuthService::new(&store, &transport);
        let password = secret("pw");

        let (first, second) = tokio::join!(
            auth.sign_in("a@example.com", &password),
            auth.sign_in("b@example.com", &password)
        );
        assert_eq!(first.unwrap().name, "a");
        assert!(matches!(second, Err(AuthError::AlreadyInProgress)));
    }
}
