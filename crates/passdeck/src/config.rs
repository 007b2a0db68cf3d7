//! Bridges `passdeck-config` profiles and global flags into a
//! `DashboardConfig`. Core never sees profiles or flags.

use passdeck_config::{Config, Profile};
use passdeck_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Profile + flag overrides for the active profile.
///
/// A profile must exist unless `--url` names the backend directly.
pub fn effective_profile(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    let mut profile = match cfg.profiles.get(profile_name) {
        Some(profile) => profile.clone(),
        None if global.url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: passdeck_config::config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref email) = global.email {
        profile.email = Some(email.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok(profile)
}

/// Build the `DashboardConfig` for this invocation.
pub fn dashboard_config(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<DashboardConfig, CliError> {
    let profile = effective_profile(global, cfg, profile_name)?;
    let dashboard =
        passdeck_config::profile_to_dashboard_config(&profile, profile_name, &cfg.defaults)?;
    Ok(dashboard)
}
