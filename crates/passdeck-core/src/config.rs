// ── Runtime connection configuration ──
//
// How to reach and authenticate with a backend. Built by the CLI from
// profiles and flags; core never reads config files.

use std::time::Duration;

use passdeck_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// How to authenticate when no persisted session is usable.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// OAuth2 password login.
    Password { email: String, password: SecretString },
    /// A bearer token obtained out of band.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root, e.g. `https://passes.example.com` (the `/api/v1`
    /// prefix is added by the client).
    pub url: Url,
    pub credentials: Option<AuthCredentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl DashboardConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
