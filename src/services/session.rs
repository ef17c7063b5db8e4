// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and identity management.
//!
//! [`SessionManager`] validates sign-in input and persists the resulting
//! [`User`]. Building the identity is delegated to an [`IdentityProvider`];
//! the only one shipped is [`MockIdentityProvider`], which accepts any
//! password after a simulated network delay.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::{self, keys, KeyValueStore};
use crate::time_utils::Clock;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Produces identities for the session manager.
///
/// Inputs have already been validated by the caller.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User>;
    async fn sign_in_with_google(&self) -> Result<User>;
}

/// Artificial delays for the mock sign-in flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub login: Duration,
    pub signup: Duration,
    pub google: Duration,
}

impl SimulatedLatency {
    /// Roughly what the real round trips would feel like.
    pub const NETWORK: Self = Self {
        login: Duration::from_millis(1000),
        signup: Duration::from_millis(1500),
        google: Duration::from_millis(2000),
    };

    pub const NONE: Self = Self {
        login: Duration::ZERO,
        signup: Duration::ZERO,
        google: Duration::ZERO,
    };
}

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";
const GOOGLE_AVATAR_URL: &str = "https://lh3.googleusercontent.com/a/default-user=s96-c";

/// Accepts every well-formed sign-in; no credential is checked.
pub struct MockIdentityProvider {
    clock: Arc<dyn Clock>,
    latency: SimulatedLatency,
}

impl MockIdentityProvider {
    pub fn new(clock: Arc<dyn Clock>, latency: SimulatedLatency) -> Self {
        Self { clock, latency }
    }

    async fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<User> {
        self.delay(self.latency.login).await;

        let name = email_local_part(email);
        Ok(User {
            id: format!("user_{}", self.clock.now_millis()),
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(avatar_url(name)),
        })
    }

    async fn sign_up(&self, name: &str, email: &str, _password: &str) -> Result<User> {
        self.delay(self.latency.signup).await;

        Ok(User {
            id: format!("user_{}", self.clock.now_millis()),
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(avatar_url(name)),
        })
    }

    async fn sign_in_with_google(&self) -> Result<User> {
        self.delay(self.latency.google).await;

        Ok(User {
            id: format!("google_{}", self.clock.now_millis()),
            name: "Google User".to_string(),
            email: "user@gmail.com".to_string(),
            avatar: Some(GOOGLE_AVATAR_URL.to_string()),
        })
    }
}

/// Owns the persisted [`User`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn IdentityProvider>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { store, provider }
    }

    /// The logged-in user, if any. Unreadable records count as logged out.
    pub fn current_user(&self) -> Option<User> {
        match store::get_json(self.store.as_ref(), keys::USER) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored user");
                None
            }
        }
    }

    /// Email/password login. The password is not verified.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;

        let user = self.provider.sign_in(email, password).await?;
        self.persist(user)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = self.provider.sign_up(name, email, password).await?;
        self.persist(user)
    }

    pub async fn login_with_google(&self) -> Result<User> {
        let user = self.provider.sign_in_with_google().await?;
        self.persist(user)
    }

    /// Forget the logged-in user. Safe to call when nobody is logged in.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::USER)?;
        tracing::info!("User logged out");
        Ok(())
    }

    fn persist(&self, user: User) -> Result<User> {
        store::set_json(self.store.as_ref(), keys::USER, &user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email address".to_string()))
    }
}

fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn avatar_url(name: &str) -> String {
    format!(
        "{}?name={}&background=2563EB&color=fff",
        AVATAR_BASE_URL,
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::time_utils::FixedClock;
    use chrono::NaiveDate;

    fn manager() -> SessionManager {
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        ));
        SessionManager::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MockIdentityProvider::new(clock, SimulatedLatency::NONE)),
        )
    }

    #[test]
    fn local_part_and_avatar() {
        assert_eq!(email_local_part("jane.doe@example.com"), "jane.doe");
        assert_eq!(
            avatar_url("Jane Doe"),
            "https://ui-avatars.com/api/?name=Jane%20Doe&background=2563EB&color=fff"
        );
    }

    #[tokio::test]
    async fn login_derives_name_and_persists() {
        let sessions = manager();

        let user = sessions.login("a@b.com", "whatever").await.unwrap();

        assert_eq!(user.name, "a");
        assert_eq!(user.email, "a@b.com");
        assert!(user.id.starts_with("user_"));
        assert_eq!(sessions.current_user(), Some(user));
    }

    #[tokio::test]
    async fn login_rejects_email_without_at() {
        let sessions = manager();

        let err = sessions.login("not-an-email", "pw").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(sessions.current_user(), None);
    }

    #[tokio::test]
    async fn signup_checks_password_length() {
        let sessions = manager();

        let err = sessions
            .signup("Jane", "jane@example.com", "12345")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("6 characters")));

        let user = sessions
            .signup("Jane", "jane@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(user.name, "Jane");
    }

    #[tokio::test]
    async fn signup_rejects_malformed_email() {
        let sessions = manager();

        let err = sessions
            .signup("Jane", "no-at-sign", "123456")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid email address"));
        assert_eq!(sessions.current_user(), None);
    }

    #[tokio::test]
    async fn google_login_uses_placeholder_identity() {
        let sessions = manager();

        let user = sessions.login_with_google().await.unwrap();

        assert!(user.id.starts_with("google_"));
        assert_eq!(user.email, "user@gmail.com");
        assert_eq!(user.avatar.as_deref(), Some(GOOGLE_AVATAR_URL));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let sessions = manager();
        sessions.login("a@b.com", "pw").await.unwrap();

        sessions.logout().unwrap();
        sessions.logout().unwrap();

        assert_eq!(sessions.current_user(), None);
    }
}
