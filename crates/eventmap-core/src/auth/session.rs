use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheError, CacheManager, KeyValueStore, ACCESS_TOKEN_KEY, EVENTS_KEY, USER_INFO_KEY};
use crate::models::{Event, User};
use crate::utils::{password_is_valid, sanitize_email, validate_email, MIN_PASSWORD_LENGTH};

use super::context::AuthContext;
use super::error::{LoginError, GENERIC_LOGIN_FAILURE};
use super::token::is_token_expired;

/// Outcome of reading the cached session at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSession {
    pub user: Option<User>,
    /// A token is cached and not expired
    pub token_valid: bool,
}

impl RestoredSession {
    /// Skip the login form only when both halves of the session survived
    pub fn should_resume(&self) -> bool {
        self.token_valid && self.user.is_some()
    }
}

/// Drives login, startup restore and logout against the API and the cache,
/// publishing the current user through the shared `AuthContext`.
pub struct SessionManager<S> {
    api: ApiClient,
    cache: CacheManager<S>,
    context: Arc<AuthContext>,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(api: ApiClient, cache: CacheManager<S>, context: Arc<AuthContext>) -> Self {
        Self { api, cache, context }
    }

    pub fn context(&self) -> &Arc<AuthContext> {
        &self.context
    }

    pub fn cache(&self) -> &CacheManager<S> {
        &self.cache
    }

    /// Validate the form, authenticate, then persist the session.
    ///
    /// Both cache writes complete before the context is updated, so a caller
    /// that moves on after `Ok` always finds the session on disk.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, LoginError> {
        let email_ok = validate_email(email);
        let password_ok = password_is_valid(password);
        if !email_ok {
            return Err(LoginError::InvalidEmail);
        }
        if !password_ok {
            return Err(LoginError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let email = sanitize_email(email);
        let response = self
            .api
            .authenticate(&email, password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Authentication failed");
                Self::rejection(&e)
            })?;

        self.cache.set_in_cache(USER_INFO_KEY, &response.user).await?;
        self.cache
            .set_in_cache(ACCESS_TOKEN_KEY, &response.access_token)
            .await?;

        self.context.set_value(Some(response.user.clone()));
        info!(user_id = %response.user.id, "Login successful");
        Ok(response.user)
    }

    fn rejection(err: &ApiError) -> LoginError {
        let message = err
            .response_body()
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
        LoginError::Rejected(message)
    }

    /// Read the cached user and token concurrently.
    ///
    /// Each read is applied on its own: a cached user reaches the context even
    /// if the token is missing or expired. Read failures are logged, not returned.
    pub async fn restore(&self) -> RestoredSession {
        let user_read = async {
            match self.cache.get_from_cache::<User>(USER_INFO_KEY).await {
                Ok(user) => {
                    self.context.set_value(Some(user.clone()));
                    Some(user)
                }
                Err(e) => {
                    debug!(error = %e, "No cached user");
                    None
                }
            }
        };

        let token_read = async {
            match self.cache.get_from_cache::<String>(ACCESS_TOKEN_KEY).await {
                Ok(token) => !token.is_empty() && !is_token_expired(&token),
                Err(e) => {
                    debug!(error = %e, "No cached access token");
                    false
                }
            }
        };

        let (user, token_valid) = futures::join!(user_read, token_read);
        debug!(has_user = user.is_some(), token_valid, "Session restored");
        RestoredSession { user, token_valid }
    }

    /// Remove the cached session, then clear the context
    pub async fn logout(&self) -> Result<(), CacheError> {
        self.cache.remove(&[USER_INFO_KEY, ACCESS_TOKEN_KEY]).await?;
        self.context.set_value(None);
        info!("Logged out");
        Ok(())
    }

    /// The cached access token, whether or not it has expired
    pub async fn cached_token(&self) -> Option<String> {
        self.cache.get_from_cache::<String>(ACCESS_TOKEN_KEY).await.ok()
    }

    /// A client carrying the cached token, or the anonymous client when no
    /// unexpired token is cached
    pub async fn client(&self) -> ApiClient {
        match self.cached_token().await {
            Some(token) if !is_token_expired(&token) => self.api.with_token(token),
            _ => self.api.clone(),
        }
    }

    /// Events from the network, or the last cached list when the fetch fails
    pub async fn events(&self) -> Result<Vec<Event>, CacheError> {
        let client = self.client().await;
        self.cache
            .get_from_network_first(EVENTS_KEY, client.fetch_events())
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
