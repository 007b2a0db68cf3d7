// ── Pass-data resolution ──
//
// A field's effective value is the pass's override when present and
// non-empty, otherwise the template default. One level, per field.

use serde::Serialize;

use crate::model::{
    ColorError, FieldGroup, FieldType, PassData, PassField, PassStatus, PassType, Rgb,
    TemplateDraft, TextAlignment, Template, WalletPass,
};

/// Effective value of `field` given a pass's overrides.
pub fn resolve_value<'a>(pass_data: &'a PassData, field: &'a PassField) -> &'a str {
    pass_data
        .get(&field.key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(&field.value)
}

/// One field ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub group: FieldGroup,
    pub key: String,
    pub label: String,
    /// Resolved value before type formatting.
    pub raw: String,
    /// Resolved value formatted for its type.
    pub value: String,
    pub field_type: FieldType,
    pub alignment: TextAlignment,
    /// The value came from `pass_data` rather than the template.
    pub overridden: bool,
}

/// Every field of a template resolved against `pass_data`, in rendering
/// order. Keys in `pass_data` that no field uses are ignored.
pub fn resolve_fields(template: &TemplateDraft, pass_data: &PassData) -> Vec<ResolvedField> {
    template
        .fields
        .iter()
        .map(|(group, field)| {
            let overridden = pass_data.get(&field.key).is_some_and(|v| !v.is_empty());
            let raw = resolve_value(pass_data, field);
            ResolvedField {
                group,
                key: field.key.clone(),
                label: field.label.clone(),
                raw: raw.to_owned(),
                value: field.field_type.format(raw),
                field_type: field.field_type,
                alignment: field.text_alignment,
                overridden,
            }
        })
        .collect()
}

/// A card as the dashboard shows it: colors, badge contrast and resolved
/// field regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPreview {
    pub name: String,
    pub description: Option<String>,
    pub pass_type: PassType,
    pub background_color: String,
    pub foreground_color: Option<String>,
    pub label_color: Option<String>,
    /// `#000000` or `#ffffff`, whichever reads over `background_color`.
    pub badge_text_color: &'static str,
    pub status: Option<PassStatus>,
    pub short_serial: Option<String>,
    pub expiration: String,
    pub fields: Vec<ResolvedField>,
}

impl CardPreview {
    /// Preview of an unsaved or stored template with its default values.
    pub fn for_draft(draft: &TemplateDraft) -> Result<Self, ColorError> {
        Self::build(draft, &PassData::new())
    }

    pub fn for_template(template: &Template) -> Result<Self, ColorError> {
        Self::for_draft(&template.to_draft())
    }

    /// An issued pass rendered through its template.
    pub fn for_pass(template: &Template, pass: &WalletPass) -> Result<Self, ColorError> {
        let mut preview = Self::build(&template.to_draft(), &pass.pass_data)?;
        preview.status = Some(pass.status());
        preview.short_serial = Some(pass.short_serial());
        if let Some(exp) = pass.expiration_date {
            preview.expiration = format!("on {}", exp.format("%Y-%m-%d"));
        }
        Ok(preview)
    }

    fn build(draft: &TemplateDraft, pass_data: &PassData) -> Result<Self, ColorError> {
        let background = draft.appearance.card_background().to_owned();
        let badge_text_color = Rgb::from_hex(&background)?.contrast_text();
        Ok(Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            pass_type: draft.pass_type,
            background_color: background,
            foreground_color: draft.appearance.foreground_color.clone(),
            label_color: draft.appearance.label_color.clone(),
            badge_text_color,
            status: None,
            short_serial: None,
            expiration: draft.expiration.describe(),
            fields: resolve_fields(draft, pass_data),
        })
    }

    pub fn group(&self, group: FieldGroup) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(move |f| f.group == group)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::pass::tests::issued_pass;
    use crate::model::template::tests::loyalty_template;
    use crate::model::{Appearance, BLACK, WHITE};
    use pretty_assertions::assert_eq;

    #[test]
    fn override_wins_when_non_empty() {
        let field = PassField::new("p1", "Tier", "Gold");
        let mut data = PassData::new();
        assert_eq!(resolve_value(&data, &field), "Gold");

        data.insert("p1".into(), "Platinum".into());
        assert_eq!(resolve_value(&data, &field), "Platinum");

        data.insert("p1".into(), String::new());
        assert_eq!(resolve_value(&data, &field), "Gold");
    }

    #[test]
    fn resolution_is_per_field() {
        let template = loyalty_template().to_draft();
        let mut data = PassData::new();
        data.insert("s1".into(), "1500".into());
        data.insert("orphan".into(), "ignored".into());

        let fields = resolve_fields(&template, &data);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].raw, "Gold");
        assert!(!fields[0].overridden);
        assert_eq!(fields[1].raw, "1500");
        assert!(fields[1].overridden);
    }

    #[test]
    fn typed_values_are_formatted() {
        let mut template = loyalty_template().to_draft();
        template.fields.secondary[0].field_type = FieldType::Number;
        let mut data = PassData::new();
        data.insert("s1".into(), "1500".into());

        let fields = resolve_fields(&template, &data);
        assert_eq!(fields[1].value, "1,500");
    }

    #[test]
    fn pass_preview_carries_status_and_serial() {
        let template = loyalty_template();
        let mut pass = issued_pass();
        pass.is_voided = true;
        pass.pass_data.insert("p1".into(), "Platinum".into());

        let preview = CardPreview::for_pass(&template, &pass).unwrap();
        assert_eq!(preview.status, Some(PassStatus::Voided));
        assert_eq!(preview.short_serial.as_deref(), Some("a1b2c3d4"));
        assert_eq!(preview.badge_text_color, WHITE);
        let primary: Vec<_> = preview.group(FieldGroup::Primary).collect();
        assert_eq!(primary[0].value, "Platinum");
    }

    #[test]
    fn preview_without_background_uses_fallback() {
        let mut draft = TemplateDraft::new("Plain");
        draft.appearance = Appearance::default();
        let preview = CardPreview::for_draft(&draft).unwrap();
        assert_eq!(preview.background_color, "#f8fafc");
        assert_eq!(preview.badge_text_color, BLACK);
    }

    #[test]
    fn shorthand_background_cannot_be_previewed() {
        let mut draft = TemplateDraft::new("Short");
        draft.appearance.background_color = Some("#fff".into());
        assert!(CardPreview::for_draft(&draft).is_err());
    }
}
