//! Account registration, login and bearer token checks.

use std::sync::Arc;

use chrono::Utc;
use shared::EntityKind;
use tracing::{info, warn};

use crate::domain::credentials::{hash_password, verify_password, TokenSigner};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_id, User};
use crate::storage::traits::{DuplicateEmail, UserStorage};

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStorage>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStorage>, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    /// Create an account and return a token for it
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<String> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(DomainError::validation("A valid email is required"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("Password is required"));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .map_err(anyhow::Error::from)??;

        let user = User {
            id: new_id(EntityKind::User),
            email,
            password_hash,
            created_at: Utc::now(),
        };
        // a concurrent registration can still win between the lookup and the insert
        if let Err(e) = self.users.store_user(&user).await {
            if e.downcast_ref::<DuplicateEmail>().is_some() {
                return Err(DomainError::Conflict("Email already registered".to_string()));
            }
            return Err(e.into());
        }
        info!("Registered user {}", user.id);

        Ok(self.signer.issue(&user.id)?)
    }

    /// Check credentials and return a fresh token with the user
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<(String, User)> {
        let email = normalize_email(email);
        let verified = match self.users.find_user_by_email(&email).await? {
            Some(user) => {
                let plain = password.to_string();
                let stored = user.password_hash.clone();
                let matches = tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
                    .await
                    .map_err(anyhow::Error::from)?;
                matches.then_some(user)
            }
            None => None,
        };
        let Some(user) = verified else {
            warn!("Rejected login for {}", email);
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };

        let token = self.signer.issue(&user.id)?;
        Ok((token, user))
    }

    /// User id carried by a valid, unexpired token
    pub fn authenticate(&self, token: &str) -> DomainResult<String> {
        Ok(self.signer.verify(token)?.sub)
    }

    pub async fn profile(&self, user_id: &str) -> DomainResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
