// ── Core error types ──
//
// User-facing errors from passdeck-core. Consumers never see reqwest
// errors or raw JSON; the `From<passdeck_api::Error>` impl translates
// transport failures into domain variants.

use thiserror::Error;

use crate::model::{ColorError, FieldOpError};
use crate::validate::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client-side rule failures (never sent to the backend) ────────
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    InvalidColor(#[from] ColorError),

    #[error(transparent)]
    Field(#[from] FieldOpError),

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Operation rejected: {message}")]
    Rejected { message: String },

    // ── Connection / auth errors ─────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Server-provided detail, when the response carried one.
        detail: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration / internal ─────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }

    /// One line for the user: the server's detail message when there is
    /// one, otherwise `fallback` for backend failures, otherwise this
    /// error's own description.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Api { .. } | Self::Internal(_) => fallback.to_owned(),
            other => other.to_string(),
        }
    }

    /// The backend answered with a server-side status (4xx other than
    /// auth/not-found, or 5xx).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<passdeck_api::Error> for CoreError {
    fn from(err: passdeck_api::Error) -> Self {
        match err {
            passdeck_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            passdeck_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- log in again".into(),
            },
            passdeck_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        detail: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            passdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            passdeck_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            passdeck_api::Error::Api {
                status,
                detail,
                body: _,
            } => CoreError::Api {
                message: detail
                    .clone()
                    .unwrap_or_else(|| format!("backend returned HTTP {status}")),
                detail,
                status: Some(status),
            },
            passdeck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from backend: {message}"))
            }
        }
    }
}
