// Authentication endpoints
//
// OAuth2 password-flow login, token refresh, registration and the
// current-user lookup. Login does not install the token; the caller
// decides when a session becomes active.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::TokenPair;
use crate::error::Error;
use crate::v1::client::ApiClient;
use crate::v1::types::{RegisterRequest, TokenResponse, UserResponse};

impl ApiClient {
    /// Exchange email + password for a token pair.
    ///
    /// `POST auth/login` (form-encoded, OAuth2 `username` / `password`)
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<TokenPair, Error> {
        debug!(email, "logging in");
        let resp: TokenResponse = self
            .post_form(
                "auth/login",
                &[("username", email), ("password", password.expose_secret())],
            )
            .await?;
        debug!("login successful");
        Ok(resp.into())
    }

    /// Trade a refresh token for a fresh token pair.
    ///
    /// `POST auth/refresh` with `{"refresh_token": "..."}`
    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenPair, Error> {
        debug!("refreshing access token");
        let resp: TokenResponse = self
            .post(
                "auth/refresh",
                &json!({ "refresh_token": refresh_token.expose_secret() }),
            )
            .await?;
        Ok(resp.into())
    }

    /// Create a new dashboard user.
    ///
    /// `POST auth/register`
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        full_name: Option<&str>,
    ) -> Result<UserResponse, Error> {
        debug!(email, "registering user");
        self.post(
            "auth/register",
            &RegisterRequest {
                email,
                password: password.expose_secret(),
                full_name,
            },
        )
        .await
    }

    /// The user owning the current bearer token.
    ///
    /// `GET users/me`
    pub async fn current_user(&self) -> Result<UserResponse, Error> {
        self.get("users/me").await
    }
}
