//! Explicitly scoped authentication session.
//!
//! An [`AuthSession`] is created at startup, restored from the token store
//! once, and passed to whoever needs the current user. Logging out clears
//! both the in-memory user and the stored token.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::auth::{LoginCredentials, SessionUser};
use super::ports::{LoginService, SessionTokenStore, Sleeper};

/// Session context: current user, loading flag and collaborators.
pub struct AuthSession {
    login: Arc<dyn LoginService>,
    tokens: Arc<dyn SessionTokenStore>,
    sleeper: Arc<dyn Sleeper>,
    login_delay: Duration,
    user: Option<SessionUser>,
    loading: bool,
}

impl AuthSession {
    /// New session in the loading state; call [`Self::restore`] next.
    pub fn new(
        login: Arc<dyn LoginService>,
        tokens: Arc<dyn SessionTokenStore>,
        sleeper: Arc<dyn Sleeper>,
        login_delay: Duration,
    ) -> Self {
        Self {
            login,
            tokens,
            sleeper,
            login_delay,
            user: None,
            loading: true,
        }
    }

    /// Rehydrate from the token store.
    ///
    /// Any stored token restores the fixed student identity; the token itself
    /// is not checked. Storage failures are logged and leave the session
    /// signed out.
    pub fn restore(&mut self) -> Option<&SessionUser> {
        self.user = match self.tokens.load() {
            Ok(Some(_)) => Some(SessionUser::rehydrated()),
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "could not read stored session token");
                None
            }
        };
        self.loading = false;
        self.user.as_ref()
    }

    /// Attempt a login after the simulated delay.
    ///
    /// Returns `false` for malformed input and unknown credentials alike.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.loading = true;
        self.sleeper.sleep(self.login_delay).await;
        let outcome = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => self.login.authenticate(&credentials).await.ok(),
            Err(_) => None,
        };
        self.loading = false;

        let Some(authenticated) = outcome else {
            info!("login rejected");
            return false;
        };
        if let Err(error) = self.tokens.save(&authenticated.token) {
            warn!(%error, "could not persist session token");
        }
        info!(user_id = %authenticated.user.id, role = %authenticated.user.role, "login succeeded");
        self.user = Some(authenticated.user);
        true
    }

    /// Sign out and forget the stored token.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "logged out");
        }
        if let Err(error) = self.tokens.clear() {
            warn!(%error, "could not clear session token");
        }
    }

    /// Signed-in user, if any.
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Whether the stored token is still being restored.
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
