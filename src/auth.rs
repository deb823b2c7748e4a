//! Admin authorization
//!
//! One capability check for every admin-mutating endpoint. The admin logs
//! in with a password verified against an Argon2 hash from configuration;
//! a uuid session token is issued, kept in memory and carried back in the
//! `plaktaki_admin` cookie. Restarting the server revokes all sessions.

use std::collections::HashSet;
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::ADMIN_COOKIE;
use crate::error::{AppError, Result};

/// The single admin principal of the site.
#[derive(Clone)]
pub struct AdminAuth {
    password_hash: Arc<String>,
    sessions: Arc<RwLock<HashSet<String>>>,
}

impl AdminAuth {
    pub fn new(password_hash: String) -> Self {
        Self {
            password_hash: Arc::new(password_hash),
            sessions: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Verify the admin password and mint a session token.
    pub async fn login(&self, password: &str) -> Result<String> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::Generic(format!("Invalid admin password hash: {}", e)))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            tracing::warn!("Rejected admin login attempt");
            return Err(AppError::Unauthorized);
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone());

        tracing::info!("Admin session opened");
        Ok(token)
    }

    /// Check whether a token belongs to a live session.
    pub async fn verify(&self, token: &str) -> bool {
        self.sessions.read().await.contains(token)
    }

    pub async fn logout(&self, token: &str) {
        if self.sessions.write().await.remove(token) {
            tracing::info!("Admin session closed");
        }
    }
}

/// Extractor proving the request carries a live admin session cookie.
///
/// Rejects with 401 otherwise; session-guarded handlers just take this as
/// an argument.
pub struct AdminSession;

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(session_cookie)
            .ok_or(AppError::Unauthorized)?;

        if state.auth.verify(&token).await {
            Ok(AdminSession)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Pull the admin session token out of a Cookie header value.
fn session_cookie(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(ADMIN_COOKIE)?.strip_prefix('=').map(str::to_string))
}

/// Hash a password for `PLAKTAKI_ADMIN_PASSWORD_HASH`.
///
/// Used by the `hash-password` maintenance flag in `main`.
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::PasswordHasher;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Generic(format!("Password hashing failed: {}", e)))
}
