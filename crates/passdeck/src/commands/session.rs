//! Login, logout, registration and `whoami`.

use std::io::{BufRead, IsTerminal};

use dialoguer::Input;
use passdeck_config::{KeyringTokenStore, load_config_or_default};
use passdeck_core::{Dashboard, TokenStore, User};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(user: &User) -> String {
    output::detail_lines(&[
        ("ID", user.id.to_string()),
        ("Email", user.email.clone()),
        ("Name", user.full_name.clone().unwrap_or_else(|| "-".into())),
        (
            "Organization",
            user.organization_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        ),
        ("Active", output::yes_no(user.is_active)),
        ("Superuser", output::yes_no(user.is_superuser)),
    ])
}

fn print_user(user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, user, user_detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Email from `--email` / profile, else prompt.
fn login_email(dashboard: &Dashboard, global: &GlobalOpts) -> Result<String, CliError> {
    if let Some(ref email) = global.email {
        return Ok(email.clone());
    }
    if let Some(passdeck_core::AuthCredentials::Password { email, .. }) =
        &dashboard.config().credentials
    {
        return Ok(email.clone());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "pass --email or set it in the profile".into(),
        });
    }
    Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(util::prompt_err)
}

fn read_password(from_stdin: bool, prompt: &str) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password(prompt).map_err(util::prompt_err)?
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

pub async fn login(
    dashboard: &Dashboard,
    args: LoginArgs,
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(), CliError> {
    let email = login_email(dashboard, global)?;

    // A configured password is used as-is; otherwise ask.
    let password = match &dashboard.config().credentials {
        Some(passdeck_core::AuthCredentials::Password {
            email: configured,
            password,
        }) if *configured == email && !args.password_stdin => password.clone(),
        _ => read_password(args.password_stdin, "Password: ")?,
    };

    let user = util::with_spinner(
        "Logging in",
        global,
        dashboard.session().login(&email, &password),
    )
    .await?;

    if args.save_password {
        passdeck_config::store_password(profile_name, password.expose_secret())?;
        util::note(global, "Password stored in system keyring");
    }
    util::note(global, &format!("Logged in as {}", user.display_name()));
    print_user(&user, global)
}

pub async fn register(
    dashboard: &Dashboard,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = login_email(dashboard, global)?;
    let password = read_password(args.password_stdin, "New password: ")?;
    if !args.password_stdin {
        let again = read_password(false, "Repeat password: ")?;
        if again.expose_secret() != password.expose_secret() {
            return Err(CliError::Validation {
                field: "password".into(),
                reason: "passwords do not match".into(),
            });
        }
    }

    let user = util::with_spinner(
        "Creating account",
        global,
        dashboard
            .session()
            .register(&email, &password, args.full_name.as_deref()),
    )
    .await?;
    util::note(global, &format!("Registered and logged in as {}", user.email));
    print_user(&user, global)
}

/// Drop the saved session for the active profile. Needs no backend.
pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    KeyringTokenStore::new(profile_name.clone()).clear()?;
    util::note(global, &format!("Logged out of profile '{profile_name}'"));
    Ok(())
}

pub fn whoami(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let user = dashboard.session().require_user()?;
    print_user(&user, global)
}
