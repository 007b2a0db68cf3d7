// ── Field model ──
//
// A pass face is five ordered regions of labelled key/value fields.
// Templates carry the defaults; issued passes override values by key.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;
use uuid::Uuid;

// ── Field type / alignment ──────────────────────────────────────────

/// How a field's value is formatted for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Currency,
}

impl FieldType {
    /// Render `raw` for display. Values that don't parse for the type are
    /// shown unchanged.
    pub fn format(self, raw: &str) -> String {
        let trimmed = raw.trim();
        let formatted = match self {
            Self::Text => None,
            Self::Number => format_number(trimmed),
            Self::Currency => format_currency(trimmed),
            Self::Date => parse_date(trimmed).map(|d| d.format("%b %d, %Y").to_string()),
        };
        formatted.unwrap_or_else(|| raw.to_owned())
    }

    /// Whether `raw` parses as this type. Empty values always pass.
    pub fn parse_check(self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return true;
        }
        match self {
            Self::Text => true,
            Self::Number => split_decimal(trimmed).is_some(),
            Self::Currency => parse_amount(trimmed).is_some(),
            Self::Date => parse_date(trimmed).is_some(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

// ── PassField ───────────────────────────────────────────────────────

/// Backend attributes the dashboard does not edit. Kept so that writes
/// send them back untouched.
pub type ExtraAttributes = BTreeMap<String, serde_json::Value>;

/// One displayable field of a template or pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassField {
    /// Binding key into a pass's `pass_data`; unique within its group.
    pub key: String,
    pub label: String,
    /// Template default, or the resolved value on an issued pass.
    pub value: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub text_alignment: TextAlignment,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: ExtraAttributes,
}

impl PassField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: value.into(),
            field_type: FieldType::default(),
            text_alignment: TextAlignment::default(),
            extra: ExtraAttributes::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.text_alignment = alignment;
        self
    }

    /// The value formatted according to its type.
    pub fn display_value(&self) -> String {
        self.field_type.format(&self.value)
    }
}

// ── FieldGroup ──────────────────────────────────────────────────────

/// The five regions of a pass face, in rendering order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldGroup {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

impl FieldGroup {
    /// JSON attribute holding this group on the wire (`header_fields`, ...).
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Header => "header_fields",
            Self::Primary => "primary_fields",
            Self::Secondary => "secondary_fields",
            Self::Auxiliary => "auxiliary_fields",
            Self::Back => "back_fields",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Auxiliary => "Auxiliary",
            Self::Back => "Back",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldOpError {
    #[error("{group} fields has {len} entries; index {index} is out of range")]
    IndexOutOfRange {
        group: FieldGroup,
        index: usize,
        len: usize,
    },

    #[error("{group} fields already contain a field with key '{key}'")]
    DuplicateKey { group: FieldGroup, key: String },

    #[error("field key must not be empty")]
    EmptyKey,
}

// ── FieldGroups ─────────────────────────────────────────────────────

/// The ordered field lists of a template, one per [`FieldGroup`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroups {
    #[serde(default)]
    pub header: Vec<PassField>,
    #[serde(default)]
    pub primary: Vec<PassField>,
    #[serde(default)]
    pub secondary: Vec<PassField>,
    #[serde(default)]
    pub auxiliary: Vec<PassField>,
    #[serde(default)]
    pub back: Vec<PassField>,
}

impl FieldGroups {
    pub fn group(&self, group: FieldGroup) -> &[PassField] {
        match group {
            FieldGroup::Header => &self.header,
            FieldGroup::Primary => &self.primary,
            FieldGroup::Secondary => &self.secondary,
            FieldGroup::Auxiliary => &self.auxiliary,
            FieldGroup::Back => &self.back,
        }
    }

    pub fn group_mut(&mut self, group: FieldGroup) -> &mut Vec<PassField> {
        match group {
            FieldGroup::Header => &mut self.header,
            FieldGroup::Primary => &mut self.primary,
            FieldGroup::Secondary => &mut self.secondary,
            FieldGroup::Auxiliary => &mut self.auxiliary,
            FieldGroup::Back => &mut self.back,
        }
    }

    /// Every field with its group, groups in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldGroup, &PassField)> {
        FieldGroup::iter().flat_map(move |g| self.group(g).iter().map(move |f| (g, f)))
    }

    pub fn len(&self) -> usize {
        FieldGroup::iter().map(|g| self.group(g).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First field with `key`, searching groups in rendering order.
    pub fn find(&self, key: &str) -> Option<(FieldGroup, &PassField)> {
        self.iter().find(|(_, f)| f.key == key)
    }

    /// Append a blank field with a fresh key to `group`.
    ///
    /// The new field has empty label and value, `text` type and left
    /// alignment. Other groups are untouched.
    pub fn add_field(&mut self, group: FieldGroup) -> &mut PassField {
        let fields = self.group_mut(group);
        let key = loop {
            let candidate = generate_field_key();
            if !fields.iter().any(|f| f.key == candidate) {
                break candidate;
            }
        };
        fields.push(PassField::new(key, "", ""));
        let last = fields.len() - 1;
        &mut fields[last]
    }

    /// Append a caller-built field, rejecting empty or duplicate keys.
    pub fn push(&mut self, group: FieldGroup, field: PassField) -> Result<(), FieldOpError> {
        if field.key.trim().is_empty() {
            return Err(FieldOpError::EmptyKey);
        }
        let fields = self.group_mut(group);
        if fields.iter().any(|f| f.key == field.key) {
            return Err(FieldOpError::DuplicateKey {
                group,
                key: field.key,
            });
        }
        fields.push(field);
        Ok(())
    }

    /// Remove the field at `index`, keeping the order of the rest.
    pub fn remove_field(&mut self, group: FieldGroup, index: usize) -> Result<PassField, FieldOpError> {
        let fields = self.group_mut(group);
        if index >= fields.len() {
            return Err(FieldOpError::IndexOutOfRange {
                group,
                index,
                len: fields.len(),
            });
        }
        Ok(fields.remove(index))
    }

    /// Index of `key` within `group`.
    pub fn position(&self, group: FieldGroup, key: &str) -> Option<usize> {
        self.group(group).iter().position(|f| f.key == key)
    }
}

/// `field_` followed by 8 random hex characters.
pub fn generate_field_key() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("field_{}", &id[..8])
}

// ── Formatting helpers ──────────────────────────────────────────────

/// Split an optionally signed decimal into (negative, integer digits, fraction digits).
fn split_decimal(s: &str) -> Option<(bool, &str, &str)> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if int.is_empty() || !digits_only(int) || !digits_only(frac) {
        return None;
    }
    if unsigned.ends_with('.') {
        return None;
    }
    Some((negative, int, frac))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_number(s: &str) -> Option<String> {
    let (negative, int, frac) = split_decimal(s)?;
    let sign = if negative { "-" } else { "" };
    let grouped = group_thousands(int);
    if frac.is_empty() {
        Some(format!("{sign}{grouped}"))
    } else {
        Some(format!("{sign}{grouped}.{frac}"))
    }
}

/// Accepts `12.5`, `$12.50`, `1,234.5`.
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim_start_matches('$').chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

fn format_currency(s: &str) -> Option<String> {
    let value = parse_amount(s)?;
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.')?;
    let sign = if value < 0.0 { "-" } else { "" };
    Some(format!("{sign}${}.{frac}", group_thousands(int)))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
