//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use passdeck_core::{
    CoreError, EntityId, FieldGroup, FieldType, PassType, TextAlignment, ValidationPolicy,
    WalletKind,
};

use crate::cli::{AlignmentArg, FieldGroupArg, FieldTypeArg, GlobalOpts, PassTypeArg, PolicyArg, WalletArg};
use crate::error::CliError;

// ── Arg → domain conversions ────────────────────────────────────────

impl From<FieldGroupArg> for FieldGroup {
    fn from(arg: FieldGroupArg) -> Self {
        match arg {
            FieldGroupArg::Header => Self::Header,
            FieldGroupArg::Primary => Self::Primary,
            FieldGroupArg::Secondary => Self::Secondary,
            FieldGroupArg::Auxiliary => Self::Auxiliary,
            FieldGroupArg::Back => Self::Back,
        }
    }
}

impl From<FieldTypeArg> for FieldType {
    fn from(arg: FieldTypeArg) -> Self {
        match arg {
            FieldTypeArg::Text => Self::Text,
            FieldTypeArg::Number => Self::Number,
            FieldTypeArg::Date => Self::Date,
            FieldTypeArg::Currency => Self::Currency,
        }
    }
}

impl From<AlignmentArg> for TextAlignment {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Left => Self::Left,
            AlignmentArg::Center => Self::Center,
            AlignmentArg::Right => Self::Right,
        }
    }
}

impl From<PassTypeArg> for PassType {
    fn from(arg: PassTypeArg) -> Self {
        match arg {
            PassTypeArg::Generic => Self::Generic,
            PassTypeArg::Coupon => Self::Coupon,
            PassTypeArg::EventTicket => Self::EventTicket,
            PassTypeArg::BoardingPass => Self::BoardingPass,
            PassTypeArg::StoreCard => Self::StoreCard,
        }
    }
}

impl From<PolicyArg> for ValidationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Lenient => Self::Lenient,
            PolicyArg::Strict => Self::Strict,
        }
    }
}

impl From<WalletArg> for WalletKind {
    fn from(arg: WalletArg) -> Self {
        match arg {
            WalletArg::Apple => Self::Apple,
            WalletArg::Google => Self::Google,
        }
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::from(raw.trim())
}

/// `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("expected YYYY-MM-DD or RFC 3339, got '{raw}'"),
        })
}

/// Split `KEY=VALUE`. The value may be empty or contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(CliError::Validation {
            field: "set".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        }),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

// ── Interaction ─────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal and without `--yes`, refuses.
pub fn confirm(message: &str, action: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Await `fut` behind a spinner on interactive stderr.
pub async fn with_spinner<T, F>(message: &str, global: &GlobalOpts, fut: F) -> Result<T, CliError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    let spinner = (!global.quiet && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_owned());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });
    let result = fut.await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result.map_err(CliError::from)
}

/// One-line confirmation on stderr, unless `--quiet`.
pub fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn dates_accept_both_forms() {
        let day = parse_datetime("end", "2026-03-01").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2026, 3, 1));

        let ts = parse_datetime("end", "2026-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T10:30:00+00:00");

        assert!(parse_datetime("end", "March 1").is_err());
    }

    #[test]
    fn key_value_keeps_equals_in_value() {
        assert_eq!(
            parse_key_value("points=a=b").unwrap(),
            ("points".to_owned(), "a=b".to_owned())
        );
        assert_eq!(parse_key_value("tier=").unwrap().1, "");
        assert!(parse_key_value("=x").is_err());
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn group_args_map_to_groups() {
        assert_eq!(FieldGroup::from(FieldGroupArg::Auxiliary), FieldGroup::Auxiliary);
        assert_eq!(PassType::from(PassTypeArg::EventTicket), PassType::EventTicket);
    }
}
