use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::v1::types::TokenResponse;

/// Access/refresh token pair issued by `auth/login` and `auth/refresh`.
///
/// Secrets stay wrapped; [`TokenPair::to_persisted`] is the only way the
/// raw strings leave this type, and only for the session store.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
}

/// Plain serialized form of a [`TokenPair`], used by session stores.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
        }
    }

    pub fn to_persisted(&self) -> PersistedTokens {
        PersistedTokens {
            access_token: self.access_token.expose_secret().to_owned(),
            refresh_token: self
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
        }
    }
}

impl From<PersistedTokens> for TokenPair {
    fn from(p: PersistedTokens) -> Self {
        Self {
            access_token: SecretString::from(p.access_token),
            refresh_token: p.refresh_token.map(SecretString::from),
        }
    }
}

impl From<TokenResponse> for TokenPair {
    fn from(r: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(r.access_token),
            refresh_token: r.refresh_token.map(SecretString::from),
        }
    }
}
