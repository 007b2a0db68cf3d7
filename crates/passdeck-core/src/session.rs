// ── Session context ──
//
// Process-wide auth state: the current user plus the persisted token pair.
// Initialized once at startup via `restore()`, torn down by `logout()`.

use std::sync::{Arc, Mutex, RwLock};

use passdeck_api::{ApiClient, TokenPair};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::User;

// ── Token persistence ────────────────────────────────────────────────

/// Where a session's tokens survive between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<TokenPair>, CoreError>;
    fn save(&self, tokens: &TokenPair) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Non-persistent store: tokens live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, CoreError> {
        Ok(self.tokens.lock().expect("token store lock poisoned").clone())
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), CoreError> {
        *self.tokens.lock().expect("token store lock poisoned") = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.tokens.lock().expect("token store lock poisoned") = None;
        Ok(())
    }
}

// ── Session ──────────────────────────────────────────────────────────

pub struct Session {
    client: Arc<ApiClient>,
    store: Box<dyn TokenStore>,
    user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>, store: Box<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            user: RwLock::new(None),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().expect("session lock poisoned").is_some()
    }

    /// The signed-in user, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().ok_or(CoreError::NotAuthenticated)
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().expect("session lock poisoned") = user;
    }

    /// Resume a persisted session.
    ///
    /// Returns `None` when nothing is stored or the stored tokens were
    /// rejected; rejected tokens are removed from the store. Connection
    /// failures are returned as errors and leave the store intact.
    pub async fn restore(&self) -> Result<Option<User>, CoreError> {
        let Some(tokens) = self.store.load()? else {
            debug!("no persisted session");
            return Ok(None);
        };

        self.client.set_token(tokens.access_token.clone());
        match self.fetch_user().await {
            Ok(user) => {
                info!(email = %user.email, "session restored");
                Ok(Some(user))
            }
            Err(CoreError::AuthenticationFailed { .. }) => {
                if let Some(refreshed) = self.try_refresh(&tokens).await {
                    return Ok(Some(refreshed));
                }
                warn!("persisted session rejected, clearing it");
                self.client.clear_token();
                self.store.clear()?;
                Ok(None)
            }
            Err(e) => {
                self.client.clear_token();
                Err(e)
            }
        }
    }

    async fn try_refresh(&self, tokens: &TokenPair) -> Option<User> {
        let refresh_token = tokens.refresh_token.as_ref()?;
        self.client.clear_token();
        let fresh = match self.client.refresh(refresh_token).await {
            Ok(fresh) => fresh,
            Err(e) => {
                debug!(error = %e, "token refresh failed");
                return None;
            }
        };
        self.install(&fresh).ok()?;
        match self.fetch_user().await {
            Ok(user) => {
                info!(email = %user.email, "session refreshed");
                Some(user)
            }
            Err(e) => {
                debug!(error = %e, "user lookup after refresh failed");
                None
            }
        }
    }

    /// Log in with email and password and persist the resulting tokens.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        self.client.clear_token();
        let tokens = self.client.login(email, password).await?;
        self.install(&tokens)?;
        let user = self.fetch_user().await?;
        info!(email = %user.email, "logged in");
        Ok(user)
    }

    /// Authenticate with a bearer token obtained elsewhere. Nothing is
    /// persisted.
    pub async fn login_with_token(&self, token: SecretString) -> Result<User, CoreError> {
        self.client.set_token(token);
        self.fetch_user().await
    }

    /// Register a new user, then log in as that user.
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        full_name: Option<&str>,
    ) -> Result<User, CoreError> {
        self.client.clear_token();
        self.client.register(email, password, full_name).await?;
        info!(email, "registered");
        self.login(email, password).await
    }

    /// Forget the current user and the persisted tokens.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.client.clear_token();
        self.set_user(None);
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }

    fn install(&self, tokens: &TokenPair) -> Result<(), CoreError> {
        self.client.set_token(tokens.access_token.clone());
        self.store.save(tokens)
    }

    async fn fetch_user(&self) -> Result<User, CoreError> {
        let user: User = self.client.current_user().await?.into();
        self.set_user(Some(user.clone()));
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&TokenPair::new("abc")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.expose_secret(), "abc");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
