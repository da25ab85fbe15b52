//! Port persisting the opaque session token between runs.

use std::sync::Mutex;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token storage adapters.
    pub enum TokenStoreError {
        /// Reading or writing the backing store failed.
        Io { message: String } => "session token storage failed: {message}",
    }
}

/// Storage for a single opaque session token.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokenStore: Send + Sync {
    /// Stored token, if any.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the stored token.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token; succeeds when nothing is stored.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore(Mutex<Option<String>>);

impl InMemoryTokenStore {
    /// Store seeded with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self(Mutex::new(Some(token.into())))
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, TokenStoreError> {
        self.0
            .lock()
            .map_err(|_| TokenStoreError::io("token store mutex poisoned"))
    }
}

impl SessionTokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot()? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot()? = None;
        Ok(())
    }
}
