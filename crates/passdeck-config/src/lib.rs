//! Shared configuration for passdeck.
//!
//! TOML profiles, credential resolution (flag + env + keyring + plaintext),
//! keyring-backed session persistence, and translation to
//! `passdeck_core::DashboardConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use passdeck_api::auth::PersistedTokens;
use passdeck_core::{AuthCredentials, CoreError, DashboardConfig, TlsVerification, TokenPair, TokenStore};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Keyring service name for every stored secret.
pub const KEYRING_SERVICE: &str = "passdeck";

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "PASSDECK_CONFIG";
/// Password fallback when the profile names no `password_env`.
pub const PASSWORD_ENV: &str = "PASSDECK_PASSWORD";
/// Bearer token obtained out of band; skips password login.
pub const TOKEN_ENV: &str = "PASSDECK_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use: explicit choice, else `default_profile`, else `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(String::from)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://passes.example.com").
    pub api_url: String,

    /// Login email.
    pub email: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$PASSDECK_CONFIG`, else platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "passdeck", "passdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("passdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` layered over defaults, then `PASSDECK_` environment
/// variables (nested keys use `__`, e.g. `PASSDECK_DEFAULTS__OUTPUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PASSDECK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str, item: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{item}"))
}

/// Resolve the login password.
///
/// Order: explicit value (CLI flag / prompt) → profile `password_env` →
/// `PASSDECK_PASSWORD` → system keyring → plaintext in config.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    explicit: Option<SecretString>,
) -> Result<SecretString, ConfigError> {
    if let Some(pw) = explicit {
        return Ok(pw);
    }

    if let Some(val) = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    if let Ok(pw) = keyring_entry(profile_name, "password").and_then(|e| e.get_password()) {
        return Ok(SecretString::from(pw));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password)?;
    Ok(())
}

/// Non-interactive credentials for a profile, if any are available.
///
/// `PASSDECK_TOKEN` wins; otherwise email + resolvable password.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Option<AuthCredentials> {
    if let Some(token) = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
        return Some(AuthCredentials::Token(SecretString::from(token)));
    }
    let email = profile.email.clone()?;
    match resolve_password(profile, profile_name, None) {
        Ok(password) => Some(AuthCredentials::Password { email, password }),
        Err(e) => {
            debug!(profile = profile_name, error = %e, "no stored password");
            None
        }
    }
}

/// Build a `DashboardConfig` from a profile, without CLI overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = DashboardConfig::new(url);
    config.credentials = resolve_credentials(profile, profile_name);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

// ── Session persistence ─────────────────────────────────────────────

/// Persists the session token pair in the system keyring under
/// `<profile>/session`. Keyring trouble never blocks a login: reads
/// degrade to "no session", writes to a warning.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    profile: String,
}

impl KeyringTokenStore {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, keyring::Error> {
        keyring_entry(&self.profile, "session")
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, CoreError> {
        let raw = match self.entry().and_then(|e| e.get_password()) {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => {
                warn!(profile = %self.profile, error = %e, "keyring unavailable, no saved session");
                return Ok(None);
            }
        };
        match serde_json::from_str::<PersistedTokens>(&raw) {
            Ok(tokens) => Ok(Some(tokens.into())),
            Err(e) => {
                warn!(profile = %self.profile, error = %e, "discarding unreadable saved session");
                Ok(None)
            }
        }
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), CoreError> {
        let json = serde_json::to_string(&tokens.to_persisted())
            .map_err(|e| CoreError::Internal(format!("serializing session: {e}")))?;
        if let Err(e) = self.entry().and_then(|entry| entry.set_password(&json)) {
            warn!(profile = %self.profile, error = %e, "could not save session to keyring");
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry().and_then(|e| e.delete_credential()) {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::Config {
                message: format!("could not remove saved session: {e}"),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_parse_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "staging"

[defaults]
output = "json"

[profiles.staging]
api_url = "https://staging.example.com"
email = "ops@example.com"
password_env = "STAGING_PW"
timeout = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "staging");
        assert_eq!(cfg.profile_name(Some("prod")), "prod");
        assert_eq!(cfg.defaults.output, "json");
        let staging = &cfg.profiles["staging"];
        assert_eq!(staging.email.as_deref(), Some("ops@example.com"));
        assert_eq!(staging.timeout, Some(5));
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "http://localhost:8000".into(),
                email: Some("me@example.com".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let back = load_config_from(&path).unwrap();
        assert_eq!(back.profiles["default"].api_url, "http://localhost:8000");
    }

    #[test]
    fn explicit_password_wins() {
        let profile = Profile {
            password: Some("plaintext".into()),
            ..Profile::default()
        };
        let pw = resolve_password(&profile, "p", Some(SecretString::from("flag".to_string())))
            .unwrap();
        assert_eq!(secrecy::ExposeSecret::expose_secret(&pw), "flag");
    }

    #[test]
    fn dashboard_config_from_profile() {
        let profile = Profile {
            api_url: "https://passes.example.com".into(),
            insecure: Some(true),
            timeout: Some(12),
            ..Profile::default()
        };
        let cfg = profile_to_dashboard_config(&profile, "p", &Defaults::default()).unwrap();
        assert_eq!(cfg.url.as_str(), "https://passes.example.com/");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(12));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_dashboard_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
