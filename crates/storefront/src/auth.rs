//! Auth session store.
//!
//! Login delegates to the remote identity API; this store only caches the
//! result. The token and the profile are persisted under separate storage
//! keys so the catalog client can attach the token to requests (and evict
//! it on an authorization failure) without ever deserializing the profile.
//!
//! There is no refresh flow: a rejected token simply logs the user out.

use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::catalog::types::{AuthUser, LoginCredentials};
use crate::catalog::{CatalogClient, CatalogError};
use crate::storage::{AUTH_TOKEN_KEY, KeyValueStorage, USER_KEY};

/// Errors that can occur in the auth flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API rejected the credentials; the message is user-displayable.
    #[error("{0}")]
    InvalidCredentials(String),

    /// Any other catalog/auth API failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A cached login: profile plus bearer token.
pub struct AuthSession {
    pub user: AuthUser,
    token: SecretString,
}

impl AuthSession {
    /// The bearer token for this session.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// The auth state store.
///
/// Rehydrates any persisted session at open; exposes
/// authenticated/unauthenticated state to presentation code.
pub struct AuthStore {
    client: CatalogClient,
    storage: Arc<dyn KeyValueStorage>,
    session: Option<AuthSession>,
}

impl AuthStore {
    /// Open the store, rehydrating a persisted session if present.
    ///
    /// A corrupt cached profile degrades to logged-out (and the stale keys
    /// are cleared) rather than failing.
    #[must_use]
    pub fn open(client: CatalogClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        let session = match (storage.get(AUTH_TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(profile)) => match serde_json::from_str::<AuthUser>(&profile) {
                Ok(user) => Some(AuthSession {
                    user,
                    token: SecretString::from(token),
                }),
                Err(e) => {
                    warn!(error = %e, "cached profile is corrupt, treating as logged out");
                    storage.remove(AUTH_TOKEN_KEY);
                    storage.remove(USER_KEY);
                    None
                }
            },
            _ => None,
        };

        Self {
            client,
            storage,
            session,
        }
    }

    /// Whether a session is currently cached.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The logged-in user's profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// The current session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Log in with username and password.
    ///
    /// On success the catalog client has already persisted the token and
    /// profile; this store additionally caches them in memory.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] with the server's message
    /// when the credentials are rejected, or [`AuthError::Catalog`] for
    /// transport-level failures. Either way the previous state is kept:
    /// a failed login never logs an authenticated user out.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&mut self, credentials: &LoginCredentials) -> Result<&AuthUser, AuthError> {
        let user = self.client.login(credentials).await.map_err(|e| match e {
            CatalogError::Api {
                status: 400 | 401, message,
            } => AuthError::InvalidCredentials(message),
            CatalogError::Unauthorized => {
                AuthError::InvalidCredentials("Login failed. Please try again.".to_string())
            }
            other => AuthError::Catalog(other),
        })?;

        let token = SecretString::from(user.token.clone().unwrap_or_default());
        let session = self.session.insert(AuthSession {
            user: AuthUser { token: None, ..user },
            token,
        });

        Ok(&session.user)
    }

    /// Log out: clear the cached session and its persisted keys.
    pub fn logout(&mut self) {
        self.storage.remove(AUTH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.session = None;
    }

    /// Re-fetch the profile for the cached token.
    ///
    /// Updates the cached profile on success. If the API reports the token
    /// is no longer valid the session is dropped, matching the client's
    /// storage eviction.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Catalog`] when the request fails; on
    /// `Unauthorized`/`NotLoggedIn` the store is logged out first.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&AuthUser, AuthError> {
        match self.client.current_user().await {
            Ok(user) => {
                let profile = AuthUser { token: None, ..user };
                if let Ok(json) = serde_json::to_string(&profile) {
                    self.storage.set(USER_KEY, &json);
                }
                // Keep the in-memory token; fall back to the stored one if
                // the store was opened without a session
                let token = self.session.take().map_or_else(
                    || SecretString::from(self.storage.get(AUTH_TOKEN_KEY).unwrap_or_default()),
                    |session| session.token,
                );
                let session = self.session.insert(AuthSession {
                    user: profile,
                    token,
                });
                Ok(&session.user)
            }
            Err(e @ (CatalogError::Unauthorized | CatalogError::NotLoggedIn)) => {
                self.session = None;
                Err(AuthError::Catalog(e))
            }
            Err(e) => Err(AuthError::Catalog(e)),
        }
    }
}
