// ── Template validation ──
//
// Two validators exist side by side. The basic create/edit path is lenient:
// only field key/label/value are required. The designer is strict: it adds
// a minimum name length, at least one primary field and hex syntax for
// every color that is set. Callers pick one per entry point.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{FieldGroup, PassField, TemplateDraft, is_hex_color};

pub const MIN_NAME_LEN: usize = 3;

/// One failed rule, addressed by attribute path (`name`,
/// `primary_fields[0].label`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All rule failures for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages recorded against exactly `path`.
    pub fn messages_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.path == path)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// ── Validators ──────────────────────────────────────────────────────

/// A template validation strategy. Either the whole draft passes or the
/// full list of failures is returned.
pub trait TemplateValidator {
    fn validate(&self, draft: &TemplateDraft) -> Result<(), ValidationErrors>;
}

/// Basic create/edit form rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientValidator;

/// Designer rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictValidator;

impl TemplateValidator for LenientValidator {
    fn validate(&self, draft: &TemplateDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_fields(draft, &mut errors);
        errors.into_result()
    }
}

impl TemplateValidator for StrictValidator {
    fn validate(&self, draft: &TemplateDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if draft.name.chars().count() < MIN_NAME_LEN {
            errors.push("name", "Template name must be at least 3 characters");
        }
        for (attr, color) in draft.appearance.entries() {
            if color.is_some_and(|c| !is_hex_color(c)) {
                errors.push(attr, "Must be a valid hex color");
            }
        }
        if draft.fields.primary.is_empty() {
            errors.push(
                FieldGroup::Primary.wire_name(),
                "At least one primary field is required",
            );
        }
        check_fields(draft, &mut errors);

        errors.into_result()
    }
}

/// Rules shared by both validators: per-field required attributes and key
/// uniqueness within a group.
fn check_fields(draft: &TemplateDraft, errors: &mut ValidationErrors) {
    for group in [
        FieldGroup::Header,
        FieldGroup::Primary,
        FieldGroup::Secondary,
        FieldGroup::Auxiliary,
        FieldGroup::Back,
    ] {
        let mut seen = HashSet::new();
        for (index, field) in draft.group(group).iter().enumerate() {
            let path = |attr: &str| format!("{}[{index}].{attr}", group.wire_name());
            check_field(field, &path, errors);
            if !field.key.is_empty() && !seen.insert(field.key.as_str()) {
                errors.push(path("key"), "Field key must be unique within its group");
            }
        }
    }
}

fn check_field(field: &PassField, path: &dyn Fn(&str) -> String, errors: &mut ValidationErrors) {
    if field.key.is_empty() {
        errors.push(path("key"), "Field key is required");
    }
    if field.label.is_empty() {
        errors.push(path("label"), "Field label is required");
    }
    if field.value.is_empty() {
        errors.push(path("value"), "Field value is required");
    }
}

/// Validator selection by entry point.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationPolicy {
    /// Basic create/edit form.
    #[default]
    Lenient,
    /// Designer.
    Strict,
}

impl ValidationPolicy {
    pub fn validate(self, draft: &TemplateDraft) -> Result<(), ValidationErrors> {
        match self {
            Self::Lenient => LenientValidator.validate(draft),
            Self::Strict => StrictValidator.validate(draft),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Appearance, PassField};
    use pretty_assertions::assert_eq;

    fn draft_without_primary() -> TemplateDraft {
        let mut draft = TemplateDraft::new("");
        draft
            .fields
            .header
            .push(PassField::new("h1", "Member", "Gold"));
        draft
    }

    #[test]
    fn strict_rejects_empty_name_and_no_primary() {
        let draft = draft_without_primary();
        let errors = StrictValidator.validate(&draft).unwrap_err();

        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["name", "primary_fields"]);
    }

    #[test]
    fn lenient_accepts_same_template() {
        let draft = draft_without_primary();
        assert!(LenientValidator.validate(&draft).is_ok());
        assert!(ValidationPolicy::Lenient.validate(&draft).is_ok());
    }

    #[test]
    fn both_require_field_attributes() {
        let mut draft = TemplateDraft::designer("Loyalty");
        draft.fields.back.push(PassField::new("terms", "", ""));

        for policy in [ValidationPolicy::Lenient, ValidationPolicy::Strict] {
            let errors = policy.validate(&draft).unwrap_err();
            assert_eq!(
                errors.messages_for("back_fields[0].label").collect::<Vec<_>>(),
                ["Field label is required"]
            );
            assert_eq!(
                errors.messages_for("back_fields[0].value").collect::<Vec<_>>(),
                ["Field value is required"]
            );
            assert_eq!(errors.len(), 2);
        }
    }

    #[test]
    fn lenient_ignores_colors_strict_checks_them() {
        let mut draft = TemplateDraft::designer("Loyalty");
        draft.appearance = Appearance {
            background_color: Some("blue".into()),
            foreground_color: Some("#abc".into()),
            label_color: None,
        };

        assert!(LenientValidator.validate(&draft).is_ok());

        let errors = StrictValidator.validate(&draft).unwrap_err();
        assert_eq!(
            errors.messages_for("background_color").collect::<Vec<_>>(),
            ["Must be a valid hex color"]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn duplicate_keys_in_group_are_rejected() {
        let mut draft = TemplateDraft::designer("Loyalty");
        draft
            .fields
            .primary
            .push(PassField::new("primary1", "Again", "x"));
        draft
            .fields
            .secondary
            .push(PassField::new("primary1", "Other group", "y"));

        let errors = LenientValidator.validate(&draft).unwrap_err();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["primary_fields[1].key"]);
    }

    #[test]
    fn name_length_counts_characters() {
        let mut draft = TemplateDraft::designer("ab");
        assert!(StrictValidator.validate(&draft).is_err());
        draft.name = "Été".into();
        assert!(StrictValidator.validate(&draft).is_ok());
    }

    #[test]
    fn errors_display_joined() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "too short");
        errors.push("primary_fields", "missing");
        assert_eq!(errors.to_string(), "name: too short; primary_fields: missing");
    }
}
