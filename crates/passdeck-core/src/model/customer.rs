// ── Customer domain types ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A pass holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub organization_id: Option<EntityId>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_opt_in: bool,
    pub sms_opt_in: bool,
    pub push_opt_in: bool,
    pub tags: Vec<String>,
    /// Display-only; any JSON value on the wire is shown as text.
    pub custom_fields: BTreeMap<String, String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_engagement: Option<DateTime<Utc>>,
}

impl Customer {
    /// `full_name`, else `first_name last_name`, else `email`.
    pub fn display_name(&self) -> String {
        display_name(
            self.full_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.email.as_deref(),
        )
    }

    pub fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone(),
            full_name: self.full_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email_opt_in: self.email_opt_in,
            sms_opt_in: self.sms_opt_in,
            push_opt_in: self.push_opt_in,
            tags: self.tags.clone(),
            custom_fields: self.custom_fields.clone(),
            is_active: self.is_active,
        }
    }
}

fn display_name(
    full: Option<&str>,
    first: Option<&str>,
    last: Option<&str>,
    email: Option<&str>,
) -> String {
    fn present(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    if let Some(full) = present(full) {
        return full.to_owned();
    }
    let parts: Vec<&str> = [present(first), present(last)].into_iter().flatten().collect();
    if !parts.is_empty() {
        return parts.join(" ");
    }
    present(email).unwrap_or_default().to_owned()
}

/// Client-writable customer content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    /// Required on create.
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_opt_in: bool,
    pub sms_opt_in: bool,
    pub push_opt_in: bool,
    pub tags: Vec<String>,
    pub custom_fields: BTreeMap<String, String>,
    pub is_active: bool,
}

impl Default for CustomerDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            phone: None,
            full_name: None,
            first_name: None,
            last_name: None,
            email_opt_in: true,
            sms_opt_in: true,
            push_opt_in: true,
            tags: Vec::new(),
            custom_fields: BTreeMap::new(),
            is_active: true,
        }
    }
}

impl CustomerDraft {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Append a trimmed tag. Blank input is ignored; duplicates are kept.
    /// Returns whether a tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.push(tag.to_owned());
        true
    }

    /// Remove every tag equal to `tag`. Returns how many were removed.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before - self.tags.len()
    }

    pub fn display_name(&self) -> String {
        display_name(
            self.full_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            Some(&self.email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_precedence() {
        let mut draft = CustomerDraft::new("ada@example.com");
        assert_eq!(draft.display_name(), "ada@example.com");

        draft.last_name = Some("Lovelace".into());
        assert_eq!(draft.display_name(), "Lovelace");

        draft.first_name = Some("Ada".into());
        assert_eq!(draft.display_name(), "Ada Lovelace");

        draft.full_name = Some("Countess of Lovelace".into());
        assert_eq!(draft.display_name(), "Countess of Lovelace");
    }

    #[test]
    fn opt_ins_default_to_true() {
        let draft = CustomerDraft::default();
        assert!(draft.email_opt_in && draft.sms_opt_in && draft.push_opt_in);
        assert!(draft.is_active);
    }

    #[test]
    fn tags_allow_duplicates_and_remove_by_value() {
        let mut draft = CustomerDraft::new("a@b.c");
        assert!(draft.add_tag(" vip "));
        assert!(draft.add_tag("vip"));
        assert!(draft.add_tag("new"));
        assert!(!draft.add_tag("   "));
        assert_eq!(draft.tags, ["vip", "vip", "new"]);

        assert_eq!(draft.remove_tag("vip"), 2);
        assert_eq!(draft.tags, ["new"]);
        assert_eq!(draft.remove_tag("missing"), 0);
    }
}
