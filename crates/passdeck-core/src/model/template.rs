// ── Template domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::color::CARD_FALLBACK_BACKGROUND;
use super::entity_id::EntityId;
use super::field::{ExtraAttributes, FieldGroup, FieldGroups, PassField};

/// Wallet pass style.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum PassType {
    #[default]
    Generic,
    Coupon,
    EventTicket,
    BoardingPass,
    StoreCard,
}

impl PassType {
    pub fn title(self) -> &'static str {
        match self {
            Self::Generic => "Generic",
            Self::Coupon => "Coupon",
            Self::EventTicket => "Event Ticket",
            Self::BoardingPass => "Boarding Pass",
            Self::StoreCard => "Store Card",
        }
    }
}

/// Card colors. Each is a hex string; the designer validates syntax,
/// the basic form stores whatever it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub label_color: Option<String>,
}

impl Appearance {
    /// Starting colors of the basic create form.
    pub fn basic() -> Self {
        Self {
            background_color: Some("#ffffff".into()),
            foreground_color: Some("#000000".into()),
            label_color: Some("#888888".into()),
        }
    }

    /// Starting colors of the designer.
    pub fn designer() -> Self {
        Self {
            background_color: Some("#FFFFFF".into()),
            foreground_color: Some("#000000".into()),
            label_color: Some("#7D7D7D".into()),
        }
    }

    /// Background used for badge contrast on cards.
    pub fn card_background(&self) -> &str {
        self.background_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(CARD_FALLBACK_BACKGROUND)
    }

    /// The three colors with their attribute names, for validation.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("background_color", self.background_color.as_deref()),
            ("foreground_color", self.foreground_color.as_deref()),
            ("label_color", self.label_color.as_deref()),
        ]
    }
}

/// When passes issued from a template stop being valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Expiration {
    #[default]
    None,
    /// A fixed calendar date.
    Fixed(NaiveDate),
    /// A number of days after issue.
    Relative(u32),
}

impl Expiration {
    pub fn describe(&self) -> String {
        match self {
            Self::None => "never".into(),
            Self::Fixed(date) => format!("on {}", date.format("%Y-%m-%d")),
            Self::Relative(days) => format!("{days} days after creation"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nfc {
    pub enabled: bool,
    pub message: Option<String>,
}

/// A stored pass template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: EntityId,
    pub organization_id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub pass_type: PassType,
    pub appearance: Appearance,
    pub fields: FieldGroups,
    pub expiration: Expiration,
    pub nfc: Nfc,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Stored attributes outside the editable model (design, images,
    /// locations).
    #[serde(default, skip_serializing_if = "ExtraAttributes::is_empty")]
    pub extra: ExtraAttributes,
}

impl Template {
    /// Whether new passes may be issued from this template.
    pub fn is_issuable(&self) -> bool {
        self.is_active && !self.is_archived
    }

    /// The editable part of this template, for update forms.
    pub fn to_draft(&self) -> TemplateDraft {
        TemplateDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            pass_type: self.pass_type,
            appearance: self.appearance.clone(),
            fields: self.fields.clone(),
            expiration: self.expiration,
            nfc: self.nfc.clone(),
            is_active: self.is_active,
            is_archived: self.is_archived,
            extra: self.extra.clone(),
        }
    }

    /// A draft for a copy of this template: same content (including the
    /// attributes in `extra`), name suffixed with ` (Copy)`. Identity and
    /// timestamps are not carried.
    pub fn duplicate(&self) -> TemplateDraft {
        let mut draft = self.to_draft();
        draft.name = format!("{} (Copy)", self.name);
        draft
    }
}

/// Client-writable template content. Identity, owner and timestamps are
/// assigned by the backend and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub pass_type: PassType,
    pub appearance: Appearance,
    pub fields: FieldGroups,
    pub expiration: Expiration,
    pub nfc: Nfc,
    pub is_active: bool,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "ExtraAttributes::is_empty")]
    pub extra: ExtraAttributes,
}

impl Default for TemplateDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pass_type: PassType::default(),
            appearance: Appearance::default(),
            fields: FieldGroups::default(),
            expiration: Expiration::default(),
            nfc: Nfc::default(),
            is_active: true,
            is_archived: false,
            extra: ExtraAttributes::new(),
        }
    }
}

impl TemplateDraft {
    /// Blank draft as the basic create form starts it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            appearance: Appearance::basic(),
            ..Self::default()
        }
    }

    /// Draft as the designer starts it: designer colors and one primary field.
    pub fn designer(name: impl Into<String>) -> Self {
        let mut fields = FieldGroups::default();
        fields
            .primary
            .push(PassField::new("primary1", "Primary Field", "Value"));
        Self {
            name: name.into(),
            appearance: Appearance::designer(),
            fields,
            ..Self::default()
        }
    }

    pub fn group(&self, group: FieldGroup) -> &[PassField] {
        self.fields.group(group)
    }
}

/// Client-side filter over a template listing.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    /// Keep archived templates. The backend listing leaves them out
    /// already; this only matters for listings that carry them.
    pub include_archived: bool,
    pub pass_type: Option<PassType>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &Template) -> bool {
        if template.is_archived && !self.include_archived {
            return false;
        }
        if self.pass_type.is_some_and(|t| t != template.pass_type) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => template
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn loyalty_template() -> Template {
        let mut fields = FieldGroups::default();
        fields.primary.push(PassField::new("p1", "Tier", "Gold"));
        fields.secondary.push(PassField::new("s1", "Points", "0"));
        Template {
            id: EntityId::from("tmpl-1"),
            organization_id: Some(EntityId::from("org-1")),
            name: "Loyalty".into(),
            description: Some("Coffee club".into()),
            pass_type: PassType::StoreCard,
            appearance: Appearance {
                background_color: Some("#1E40AF".into()),
                foreground_color: Some("#FFFFFF".into()),
                label_color: Some("#E5E7EB".into()),
            },
            fields,
            expiration: Expiration::Relative(30),
            nfc: Nfc {
                enabled: true,
                message: Some("Tap to pay".into()),
            },
            is_active: true,
            is_archived: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            extra: ExtraAttributes::new(),
        }
    }

    #[test]
    fn duplicate_renames_and_copies_content() {
        let mut original = loyalty_template();
        original
            .extra
            .insert("logo_image".into(), serde_json::json!("/img/logo.png"));
        let copy = original.duplicate();

        assert_eq!(copy.name, "Loyalty (Copy)");
        assert_eq!(copy.extra, original.extra);
        assert_eq!(copy.fields, original.fields);
        assert_eq!(copy.appearance, original.appearance);
        assert_eq!(copy.expiration, original.expiration);
        assert_eq!(copy.nfc, original.nfc);
        assert_eq!(copy.pass_type, original.pass_type);
    }

    #[test]
    fn designer_defaults() {
        let draft = TemplateDraft::designer("Untitled");
        assert_eq!(draft.fields.primary.len(), 1);
        assert_eq!(draft.fields.primary[0].key, "primary1");
        assert_eq!(draft.appearance.label_color.as_deref(), Some("#7D7D7D"));
        assert!(draft.is_active);
        assert!(!draft.is_archived);
    }

    #[test]
    fn basic_defaults_have_no_fields() {
        let draft = TemplateDraft::new("Basic");
        assert!(draft.fields.is_empty());
        assert_eq!(draft.appearance.background_color.as_deref(), Some("#ffffff"));
        assert_eq!(draft.appearance.label_color.as_deref(), Some("#888888"));
    }

    #[test]
    fn card_background_falls_back() {
        assert_eq!(Appearance::default().card_background(), "#f8fafc");
        let mut appearance = Appearance::basic();
        appearance.background_color = Some(String::new());
        assert_eq!(appearance.card_background(), "#f8fafc");
    }

    #[test]
    fn filter_hides_archived_by_default() {
        let mut t = loyalty_template();
        t.is_archived = true;
        assert!(!TemplateFilter::default().matches(&t));
        let all = TemplateFilter {
            include_archived: true,
            ..TemplateFilter::default()
        };
        assert!(all.matches(&t));
    }

    #[test]
    fn filter_by_type_and_name() {
        let t = loyalty_template();
        let by_type = TemplateFilter {
            pass_type: Some(PassType::Coupon),
            ..TemplateFilter::default()
        };
        assert!(!by_type.matches(&t));

        let by_name = TemplateFilter {
            search: Some("  LOYAL ".into()),
            ..TemplateFilter::default()
        };
        assert!(by_name.matches(&t));
    }

    #[test]
    fn pass_type_wire_names() {
        assert_eq!(PassType::EventTicket.to_string(), "eventTicket");
        assert_eq!("storecard".parse::<PassType>().unwrap(), PassType::StoreCard);
        assert_eq!(
            serde_json::to_value(PassType::BoardingPass).unwrap(),
            "boardingPass"
        );
    }

    #[test]
    fn expiration_description() {
        assert_eq!(Expiration::None.describe(), "never");
        assert_eq!(Expiration::Relative(7).describe(), "7 days after creation");
    }
}
