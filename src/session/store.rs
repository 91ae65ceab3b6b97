//! Session store: the explicit context object owning the token pair, the
//! resolved user, and the `needs_login` flag. Share it with `Arc`; every state
//! change is persisted and published to subscribers.
//!
//! Token writes (refresh, login, SSO, logout) are serialized by one async
//! mutex, so at most one refresh is in flight per store. A lookup that waited
//! on that mutex reuses whatever the previous holder produced instead of
//! refreshing again.

use super::{
    error::{SessionError, StorageError},
    policy::{is_authorized, valid_email},
    storage::{StoredTokens, TokenStorage},
    types::{TokenResponse, User},
};
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::guard::{Navigation, SIGNIN_PATH};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

pub const ME_PATH: &str = "/users/me";
pub const REFRESH_PATH: &str = "/users/me/token";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const PASSWORD_RESET_PATH: &str = "/password-reset";

/// Outcome of resolving the current user.
#[derive(Clone, Debug)]
pub enum UserLookup {
    /// The profile resolved; `needs_login` reflects the access policy.
    Authenticated(User),
    /// The server rejected the credentials and no refresh could recover them.
    NeedsLogin,
    /// No access token is held.
    SignedOut,
    /// Any other failure. The session state was left untouched.
    Unavailable(ApiError),
}

impl UserLookup {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Observable view of the session, published after every state change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub needs_login: bool,
    pub signed_in: bool,
}

#[derive(Default)]
struct SessionState {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    user: Option<User>,
    needs_login: bool,
}

impl SessionState {
    fn from_stored(tokens: StoredTokens) -> Self {
        Self {
            access_token: tokens.token.and_then(secret),
            refresh_token: tokens.refresh_token.and_then(secret),
            ..Self::default()
        }
    }

    fn to_stored(&self) -> StoredTokens {
        StoredTokens {
            token: self
                .access_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            refresh_token: self
                .refresh_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            needs_login: self.needs_login,
            signed_in: self.access_token.is_some(),
        }
    }

    fn holds(&self, token: &SecretString) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|current| current.expose_secret() == token.expose_secret())
    }

    fn sign_out(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.needs_login = true;
    }
}

pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<SessionState>,
    token_writes: Mutex<()>,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Builds the store around persisted tokens. No network I/O happens here.
    ///
    /// # Errors
    /// Returns an error if the persisted record cannot be read.
    pub fn open(api: ApiClient, storage: Arc<dyn TokenStorage>) -> Result<Self, SessionError> {
        let stored = storage.load()?;
        if stored.is_partial() {
            warn!("persisted session holds only one token");
        }

        let state = SessionState::from_stored(stored);
        let (updates, _) = watch::channel(state.snapshot());

        Ok(Self {
            api,
            storage,
            state: RwLock::new(state),
            token_writes: Mutex::new(()),
            updates,
        })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.updates.borrow().user.clone()
    }

    #[must_use]
    pub fn needs_login(&self) -> bool {
        self.updates.borrow().needs_login
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.updates.borrow().signed_in
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Resolves the current user, refreshing the access token once on `401`.
    #[instrument(skip(self))]
    pub async fn get_user(&self) -> UserLookup {
        let access_token = self.state.read().await.access_token.clone();
        let Some(access_token) = access_token else {
            debug!("no access token held");
            return UserLookup::SignedOut;
        };

        match self.fetch_me(&access_token).await {
            Ok(user) => self.accept_user(&access_token, user).await,
            Err(err) if err.is_unauthorized() => self.refresh_session(&access_token).await,
            Err(err) => {
                warn!(error = %err, "user lookup failed, keeping current session");
                UserLookup::Unavailable(err)
            }
        }
    }

    /// Signs in with email and password. The returned user must pass the access
    /// policy before any token is stored.
    ///
    /// # Errors
    /// Returns `SessionError::Unauthorized` if the user fails the access policy,
    /// and API, validation, or storage errors otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserLookup, SessionError> {
        ensure_email(email)?;

        let form = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.expose_secret().to_string()),
        ];
        let response: TokenResponse = self
            .api
            .fetch(
                LOGIN_PATH,
                ApiRequest::post().query("setCookie", "true").form(form),
            )
            .await?;

        if !is_authorized(&response.user) {
            warn!("login rejected, user lacks required permissions");
            return Err(SessionError::Unauthorized);
        }

        let access_token = issued(response.access_token, "access_token")?;
        let refresh_token = response
            .refresh_token
            .ok_or_else(|| ApiError::Parse("Login response is missing refresh_token".to_string()))
            .and_then(|token| issued(token, "refresh_token"))?;

        self.store_tokens(access_token, refresh_token).await?;

        info!("signed in");

        Ok(self.get_user().await)
    }

    /// Adopts tokens obtained from an external identity provider.
    ///
    /// # Errors
    /// Returns an error if either token is empty or the tokens cannot be persisted.
    #[instrument(skip_all)]
    pub async fn set_sso_creds(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<UserLookup, SessionError> {
        if access_token.expose_secret().is_empty() {
            return Err(SessionError::EmptyToken("access token"));
        }
        if refresh_token.expose_secret().is_empty() {
            return Err(SessionError::EmptyToken("refresh token"));
        }

        self.store_tokens(access_token, refresh_token).await?;

        Ok(self.get_user().await)
    }

    /// Clears the session, notifies the server (best effort), and returns the
    /// navigation to the sign-in view.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Navigation {
        {
            let _writes = self.token_writes.lock().await;
            let mut state = self.state.write().await;
            state.sign_out();
            self.commit(&state);
        }

        if let Err(err) = self.api.send(LOGOUT_PATH, ApiRequest::post()).await {
            debug!(error = %err, "logout notification failed");
        }

        info!("signed out");

        Navigation::Redirect(SIGNIN_PATH.to_string())
    }

    /// Asks the server to mail a password-reset code.
    ///
    /// # Errors
    /// Returns an error if the email is malformed or the request fails.
    #[instrument(skip(self))]
    pub async fn begin_reset_password(&self, email: &str) -> Result<(), SessionError> {
        ensure_email(email)?;

        self.api
            .send(PASSWORD_RESET_PATH, ApiRequest::get().query("email", email))
            .await?;

        Ok(())
    }

    /// Sets a new password using the mailed verification code.
    ///
    /// # Errors
    /// Returns an error if the email is malformed or the request fails.
    #[instrument(skip(self, code, password))]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &SecretString,
    ) -> Result<(), SessionError> {
        ensure_email(email)?;

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "code": code,
        });
        self.api
            .send(PASSWORD_RESET_PATH, ApiRequest::post().json(body))
            .await?;

        Ok(())
    }

    async fn fetch_me(&self, access_token: &SecretString) -> Result<User, ApiError> {
        self.api
            .fetch(ME_PATH, ApiRequest::get().bearer(access_token))
            .await
    }

    /// Stores a freshly fetched user if the token it was fetched with is still
    /// current. A user fetched with a superseded token is returned but not
    /// stored, unless the session was cleared in the meantime.
    async fn accept_user(&self, access_token: &SecretString, user: User) -> UserLookup {
        let mut state = self.state.write().await;
        if state.holds(access_token) {
            state.needs_login = !is_authorized(&user);
            state.user = Some(user.clone());
            self.publish(&state);
        } else if state.access_token.is_none() {
            debug!("session cleared during lookup, dropping user");
            return if state.needs_login {
                UserLookup::NeedsLogin
            } else {
                UserLookup::SignedOut
            };
        } else {
            debug!("credentials changed during lookup, not storing user");
        }

        UserLookup::Authenticated(user)
    }

    /// Single-flight refresh after `stale` was rejected with `401`.
    async fn refresh_session(&self, stale: &SecretString) -> UserLookup {
        let _writes = self.token_writes.lock().await;

        let refresh_token = {
            let mut state = self.state.write().await;

            if !state.holds(stale) {
                debug!("credentials changed while waiting, reusing current session");
                let current = state.access_token.clone();
                let user = state.user.clone();
                let needs_login = state.needs_login;
                drop(state);

                return match (current, user) {
                    (Some(_), Some(user)) => UserLookup::Authenticated(user),
                    (Some(current), None) => self.lookup_without_refresh(&current).await,
                    (None, _) if needs_login => UserLookup::NeedsLogin,
                    (None, _) => UserLookup::SignedOut,
                };
            }

            let Some(refresh_token) = state.refresh_token.clone() else {
                debug!("access token rejected and no refresh token held");
                state.needs_login = true;
                self.publish(&state);
                return UserLookup::NeedsLogin;
            };

            refresh_token
        };

        let result: Result<TokenResponse, ApiError> = self
            .api
            .fetch(
                REFRESH_PATH,
                ApiRequest::get()
                    .query("setCookie", "true")
                    .bearer(&refresh_token),
            )
            .await;

        // A missing refresh_token keeps the presented one; an empty one is malformed.
        let result = result.and_then(|response| {
            let access_token = issued(response.access_token, "access_token")?;
            let refresh_token = match response.refresh_token {
                Some(token) => issued(token, "refresh_token")?,
                None => refresh_token,
            };
            Ok((access_token, refresh_token, response.user))
        });

        let mut state = self.state.write().await;
        match result {
            Ok((access_token, refresh_token, user)) => {
                state.access_token = Some(access_token);
                state.refresh_token = Some(refresh_token);
                state.needs_login = !is_authorized(&user);
                state.user = Some(user.clone());
                self.commit(&state);

                info!("access token refreshed");
                UserLookup::Authenticated(user)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                state.sign_out();
                self.commit(&state);

                UserLookup::NeedsLogin
            }
        }
    }

    /// One lookup with credentials stored by another task; never refreshes.
    async fn lookup_without_refresh(&self, access_token: &SecretString) -> UserLookup {
        match self.fetch_me(access_token).await {
            Ok(user) => self.accept_user(access_token, user).await,
            Err(err) if err.is_unauthorized() => UserLookup::NeedsLogin,
            Err(err) => UserLookup::Unavailable(err),
        }
    }

    async fn store_tokens(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), StorageError> {
        let _writes = self.token_writes.lock().await;
        let mut state = self.state.write().await;

        self.storage.save(&StoredTokens {
            token: Some(access_token.expose_secret().to_string()),
            refresh_token: Some(refresh_token.expose_secret().to_string()),
        })?;

        // New credentials may belong to another account.
        state.access_token = Some(access_token);
        state.refresh_token = Some(refresh_token);
        state.user = None;
        state.needs_login = false;
        self.publish(&state);

        Ok(())
    }

    /// Persists and publishes. Persistence failures are logged; the in-memory
    /// session stays authoritative.
    fn commit(&self, state: &SessionState) {
        if let Err(err) = self.storage.save(&state.to_stored()) {
            error!(error = %err, "failed to persist session");
        }
        self.publish(state);
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.snapshot());
    }
}

/// Empty persisted strings count as absent tokens.
fn secret(token: String) -> Option<SecretString> {
    if token.is_empty() {
        None
    } else {
        Some(SecretString::from(token))
    }
}

/// Token issued by the server; an empty one is a malformed response.
fn issued(token: String, field: &str) -> Result<SecretString, ApiError> {
    if token.is_empty() {
        Err(ApiError::Parse(format!("Token response has an empty {field}")))
    } else {
        Ok(SecretString::from(token))
    }
}

fn ensure_email(email: &str) -> Result<(), SessionError> {
    if valid_email(email) {
        Ok(())
    } else {
        Err(SessionError::InvalidEmail(email.to_string()))
    }
}
