// ── Issued pass domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use super::template::Template;

/// Per-pass overrides of template field values, keyed by field key.
pub type PassData = BTreeMap<String, String>;

/// Display status. A pass may be both redeemed and voided; redeemed wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PassStatus {
    Active,
    Voided,
    Redeemed,
}

/// Wallet platform a pass bundle is built for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WalletKind {
    #[default]
    Apple,
    Google,
}

impl WalletKind {
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Apple => "pkpass",
            Self::Google => "json",
        }
    }
}

/// A pass issued to one customer from one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletPass {
    pub id: EntityId,
    pub serial_number: String,
    pub organization_id: Option<EntityId>,
    pub template_id: EntityId,
    pub customer_id: EntityId,
    pub campaign_id: Option<EntityId>,
    pub pass_data: PassData,
    pub is_voided: bool,
    pub is_redeemed: bool,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub last_updated_tag: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WalletPass {
    pub fn status(&self) -> PassStatus {
        if self.is_redeemed {
            PassStatus::Redeemed
        } else if self.is_voided {
            PassStatus::Voided
        } else {
            PassStatus::Active
        }
    }

    /// First 8 characters of the serial number.
    pub fn short_serial(&self) -> String {
        self.serial_number.chars().take(8).collect()
    }

    /// Expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp <= now)
    }
}

/// Seed `pass_data` from a template: every field whose key is absent or
/// empty takes the template field's default value. Existing non-empty
/// entries are kept.
pub fn seed_pass_data(pass_data: &mut PassData, template: &Template) {
    for (_, field) in template.fields.iter() {
        let current = pass_data.entry(field.key.clone()).or_default();
        if current.is_empty() {
            current.clone_from(&field.value);
        }
    }
}

/// In-progress pass creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassDraft {
    pub template_id: Option<EntityId>,
    pub customer_id: Option<EntityId>,
    pub campaign_id: Option<EntityId>,
    pub pass_data: PassData,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl PassDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `template`. Switching to a different template clears the
    /// data entered so far before seeding; re-selecting the same one only
    /// fills gaps.
    pub fn select_template(&mut self, template: &Template) {
        if self.template_id.as_ref() != Some(&template.id) {
            self.pass_data.clear();
            self.template_id = Some(template.id.clone());
        }
        seed_pass_data(&mut self.pass_data, template);
    }

    /// Override one value. Keys the template doesn't know are kept and
    /// ignored at render time.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pass_data.insert(key.into(), value.into());
    }
}
