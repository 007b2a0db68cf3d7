// ── Wire ↔ domain conversions ──
//
// Wire types are lenient (almost everything optional); domain types are
// not. Missing values take the backend's own defaults.

use chrono::NaiveDate;
use passdeck_api::types::{
    CampaignPayload, CampaignResponse, CustomerPayload, CustomerResponse, FieldPayload, JsonMap,
    PassCreateRequest, PassResponse, TemplatePayload, TemplateResponse, UserResponse,
};
use serde_json::Value;
use tracing::warn;

use crate::model::campaign::{DEFAULT_CAMPAIGN_STATUS, DEFAULT_CAMPAIGN_TYPE};
use crate::model::{
    Appearance, Campaign, CampaignDraft, Customer, CustomerDraft, EntityId, Expiration,
    FieldGroups, Nfc, PassData, PassField, Template, TemplateDraft, User, WalletPass,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn id_opt(raw: Option<String>) -> Option<EntityId> {
    raw.filter(|s| !s.is_empty()).map(EntityId::from)
}

fn non_empty(raw: Option<&String>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).cloned()
}

/// Flatten a JSON value to display text. Strings are taken verbatim,
/// null becomes empty, anything else its JSON form.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn map_to_strings(map: JsonMap) -> std::collections::BTreeMap<String, String> {
    map.into_iter()
        .map(|(k, v)| (k, value_to_string(v)))
        .collect()
}

fn strings_to_map(map: &std::collections::BTreeMap<String, String>) -> JsonMap {
    map.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

// ── Fields ───────────────────────────────────────────────────────────

impl From<FieldPayload> for PassField {
    fn from(f: FieldPayload) -> Self {
        Self {
            key: f.key,
            label: f.label,
            value: f.value,
            field_type: f
                .field_type
                .and_then(|t| t.parse().ok())
                .unwrap_or_default(),
            text_alignment: f
                .text_alignment
                .and_then(|a| a.parse().ok())
                .unwrap_or_default(),
            extra: f.extra,
        }
    }
}

impl From<&PassField> for FieldPayload {
    fn from(f: &PassField) -> Self {
        Self {
            key: f.key.clone(),
            label: f.label.clone(),
            value: f.value.clone(),
            field_type: Some(f.field_type.to_string()),
            text_alignment: Some(f.text_alignment.to_string()),
            extra: f.extra.clone(),
        }
    }
}

fn fields_from_wire(list: Option<Vec<FieldPayload>>) -> Vec<PassField> {
    list.unwrap_or_default().into_iter().map(PassField::from).collect()
}

fn fields_to_wire(list: &[PassField]) -> Vec<FieldPayload> {
    list.iter().map(FieldPayload::from).collect()
}

// ── Templates ────────────────────────────────────────────────────────

fn expiration_from_wire(kind: Option<&str>, value: Option<&str>) -> Expiration {
    let value = value.map(str::trim).unwrap_or_default();
    match kind {
        Some("fixed") => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Expiration::Fixed(date),
            Err(_) => {
                warn!(value, "unparsable fixed expiration date, treating as none");
                Expiration::None
            }
        },
        Some("relative") => match value.parse() {
            Ok(days) => Expiration::Relative(days),
            Err(_) => {
                warn!(value, "unparsable relative expiration, treating as none");
                Expiration::None
            }
        },
        _ => Expiration::None,
    }
}

/// `None` leaves the type unset; the backend stores null for "never".
fn expiration_to_wire(expiration: Expiration) -> (Option<String>, Option<String>) {
    match expiration {
        Expiration::None => (None, None),
        Expiration::Fixed(date) => (
            Some("fixed".into()),
            Some(date.format("%Y-%m-%d").to_string()),
        ),
        Expiration::Relative(days) => (Some("relative".into()), Some(days.to_string())),
    }
}

impl From<TemplateResponse> for Template {
    fn from(t: TemplateResponse) -> Self {
        let expiration =
            expiration_from_wire(t.expiration_type.as_deref(), t.expiration_value.as_deref());
        Self {
            id: EntityId::from(t.id),
            organization_id: id_opt(t.organization_id),
            name: t.name.unwrap_or_default(),
            description: non_empty(t.description.as_ref()),
            pass_type: t
                .pass_type
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            appearance: Appearance {
                background_color: non_empty(t.background_color.as_ref()),
                foreground_color: non_empty(t.foreground_color.as_ref()),
                label_color: non_empty(t.label_color.as_ref()),
            },
            fields: FieldGroups {
                header: fields_from_wire(t.header_fields),
                primary: fields_from_wire(t.primary_fields),
                secondary: fields_from_wire(t.secondary_fields),
                auxiliary: fields_from_wire(t.auxiliary_fields),
                back: fields_from_wire(t.back_fields),
            },
            expiration,
            nfc: Nfc {
                enabled: t.nfc_enabled.unwrap_or(false),
                message: non_empty(t.nfc_message.as_ref()),
            },
            is_active: t.is_active.unwrap_or(true),
            is_archived: t.is_archived.unwrap_or(false),
            created_at: t.created_at,
            updated_at: t.updated_at,
            extra: t.extra,
        }
    }
}

/// Request body for creating a template.
pub(crate) fn template_payload(
    draft: &TemplateDraft,
    organization_id: Option<&EntityId>,
) -> TemplatePayload {
    let (expiration_type, expiration_value) = expiration_to_wire(draft.expiration);
    TemplatePayload {
        name: Some(draft.name.clone()),
        description: draft.description.clone(),
        pass_type: Some(draft.pass_type.to_string()),
        organization_id: organization_id.map(ToString::to_string),
        background_color: draft.appearance.background_color.clone(),
        foreground_color: draft.appearance.foreground_color.clone(),
        label_color: draft.appearance.label_color.clone(),
        header_fields: fields_to_wire(&draft.fields.header),
        primary_fields: fields_to_wire(&draft.fields.primary),
        secondary_fields: fields_to_wire(&draft.fields.secondary),
        auxiliary_fields: fields_to_wire(&draft.fields.auxiliary),
        back_fields: fields_to_wire(&draft.fields.back),
        expiration_type,
        expiration_value,
        nfc_enabled: Some(draft.nfc.enabled),
        nfc_message: draft.nfc.message.clone(),
        is_active: Some(draft.is_active),
        is_archived: Some(draft.is_archived),
        extra: draft.extra.clone(),
    }
}

/// Request body for replacing a template's content. Updates only touch
/// the attributes they send, so "never expires" is spelled out to clear
/// an earlier expiration.
pub(crate) fn template_update_payload(draft: &TemplateDraft) -> TemplatePayload {
    let mut payload = template_payload(draft, None);
    payload.expiration_type.get_or_insert_with(|| "none".into());
    payload
}

// ── Passes ───────────────────────────────────────────────────────────

impl From<PassResponse> for WalletPass {
    fn from(p: PassResponse) -> Self {
        Self {
            id: EntityId::from(p.id),
            serial_number: p.serial_number.unwrap_or_default(),
            organization_id: id_opt(p.organization_id),
            template_id: EntityId::from(p.template_id.unwrap_or_default()),
            customer_id: EntityId::from(p.customer_id.unwrap_or_default()),
            campaign_id: id_opt(p.campaign_id),
            pass_data: p.pass_data.map(map_to_strings).unwrap_or_default(),
            is_voided: p.is_voided.unwrap_or(false),
            is_redeemed: p.is_redeemed.unwrap_or(false),
            redeemed_at: p.redeemed_at,
            expiration_date: p.expiration_date,
            last_updated_tag: p.last_updated_tag,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub(crate) fn pass_data_to_wire(data: &PassData) -> JsonMap {
    strings_to_map(data)
}

pub(crate) fn pass_create_request(
    template_id: &EntityId,
    customer_id: &EntityId,
    campaign_id: Option<&EntityId>,
    data: &PassData,
    expiration_date: Option<chrono::DateTime<chrono::Utc>>,
) -> PassCreateRequest {
    PassCreateRequest {
        template_id: template_id.to_string(),
        customer_id: customer_id.to_string(),
        pass_data: pass_data_to_wire(data),
        campaign_id: campaign_id.map(ToString::to_string),
        expiration_date,
    }
}

// ── Customers ────────────────────────────────────────────────────────

impl From<CustomerResponse> for Customer {
    fn from(c: CustomerResponse) -> Self {
        Self {
            id: EntityId::from(c.id),
            organization_id: id_opt(c.organization_id),
            email: non_empty(c.email.as_ref()),
            phone: non_empty(c.phone.as_ref()),
            full_name: non_empty(c.full_name.as_ref()),
            first_name: non_empty(c.first_name.as_ref()),
            last_name: non_empty(c.last_name.as_ref()),
            email_opt_in: c.email_opt_in.unwrap_or(true),
            sms_opt_in: c.sms_opt_in.unwrap_or(true),
            push_opt_in: c.push_opt_in.unwrap_or(true),
            tags: c.tags.unwrap_or_default(),
            custom_fields: c.custom_fields.map(map_to_strings).unwrap_or_default(),
            is_active: c.is_active.unwrap_or(true),
            created_at: c.created_at,
            last_engagement: c.last_engagement,
        }
    }
}

pub(crate) fn customer_payload(
    draft: &CustomerDraft,
    organization_id: Option<&EntityId>,
) -> CustomerPayload {
    CustomerPayload {
        email: Some(draft.email.clone()),
        phone: draft.phone.clone(),
        full_name: draft.full_name.clone(),
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        organization_id: organization_id.map(ToString::to_string),
        email_opt_in: draft.email_opt_in,
        sms_opt_in: draft.sms_opt_in,
        push_opt_in: draft.push_opt_in,
        tags: draft.tags.clone(),
        custom_fields: strings_to_map(&draft.custom_fields),
        is_active: draft.is_active,
    }
}

// ── Campaigns ────────────────────────────────────────────────────────

impl From<CampaignResponse> for Campaign {
    fn from(c: CampaignResponse) -> Self {
        Self {
            id: EntityId::from(c.id),
            organization_id: id_opt(c.organization_id),
            name: c.name.unwrap_or_default(),
            description: non_empty(c.description.as_ref()),
            campaign_type: c
                .campaign_type
                .unwrap_or_else(|| DEFAULT_CAMPAIGN_TYPE.into()),
            template_id: id_opt(c.template_id),
            content: non_empty(c.content.as_ref()),
            notification_message: non_empty(c.notification_message.as_ref()),
            status: c.status.unwrap_or_else(|| DEFAULT_CAMPAIGN_STATUS.into()),
            is_active: c.is_active.unwrap_or(false),
            start_date: c.start_date,
            end_date: c.end_date,
            created_at: c.created_at,
        }
    }
}

pub(crate) fn campaign_payload(
    draft: &CampaignDraft,
    organization_id: Option<&EntityId>,
) -> CampaignPayload {
    CampaignPayload {
        name: Some(draft.name.clone()),
        description: draft.description.clone(),
        organization_id: organization_id.map(ToString::to_string),
        campaign_type: Some(draft.campaign_type.clone()),
        template_id: draft.template_id.as_ref().map(ToString::to_string),
        content: draft.content.clone(),
        notification_message: draft.notification_message.clone(),
        status: Some(draft.status.clone()),
        is_active: Some(draft.is_active),
        start_date: draft.start_date,
        end_date: draft.end_date,
    }
}

// ── Users ────────────────────────────────────────────────────────────

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: EntityId::from(u.id),
            email: u.email.unwrap_or_default(),
            full_name: non_empty(u.full_name.as_ref()),
            organization_id: id_opt(u.organization_id),
            is_active: u.is_active.unwrap_or(true),
            is_superuser: u.is_superuser.unwrap_or(false),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{FieldType, PassType, TextAlignment};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template_response(extra: Value) -> TemplateResponse {
        let mut base = json!({
            "id": "tmpl-1",
            "name": "Loyalty",
            "primary_fields": [
                { "key": "p1", "label": "Tier", "value": "Gold", "type": "currency", "text_alignment": "right" },
                { "key": "p2", "label": "Odd", "value": "x", "type": "barcode" }
            ]
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn template_defaults_when_fields_missing() {
        let t = Template::from(template_response(json!({})));
        assert_eq!(t.pass_type, PassType::Generic);
        assert!(t.is_active);
        assert!(!t.is_archived);
        assert_eq!(t.expiration, Expiration::None);
        assert_eq!(t.appearance, Appearance::default());
        assert!(t.fields.header.is_empty());
    }

    #[test]
    fn field_types_parse_with_fallback() {
        let t = Template::from(template_response(json!({})));
        assert_eq!(t.fields.primary[0].field_type, FieldType::Currency);
        assert_eq!(t.fields.primary[0].text_alignment, TextAlignment::Right);
        assert_eq!(t.fields.primary[1].field_type, FieldType::Text);
    }

    #[test]
    fn expiration_round_trip_through_payload() {
        let t = Template::from(template_response(json!({
            "expiration_type": "fixed",
            "expiration_value": "2025-12-31",
            "pass_type": "eventTicket"
        })));
        assert_eq!(
            t.expiration,
            Expiration::Fixed(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
        );

        let payload = template_payload(&t.to_draft(), t.organization_id.as_ref());
        assert_eq!(payload.expiration_type.as_deref(), Some("fixed"));
        assert_eq!(payload.expiration_value.as_deref(), Some("2025-12-31"));
        assert_eq!(payload.pass_type.as_deref(), Some("eventTicket"));
        assert_eq!(payload.primary_fields[0].field_type.as_deref(), Some("currency"));
    }

    #[test]
    fn bad_relative_expiration_becomes_none() {
        let t = Template::from(template_response(json!({
            "expiration_type": "relative",
            "expiration_value": "soon"
        })));
        assert_eq!(t.expiration, Expiration::None);
    }

    #[test]
    fn unknown_attributes_carry_into_payload() {
        let mut t = Template::from(template_response(json!({
            "logo_image": "/img/logo.png",
            "design": { "layout": "banner" },
        })));
        t.fields.primary[0]
            .extra
            .insert("format".into(), json!("PKDateStyleShort"));

        let payload = template_payload(&t.to_draft(), None);
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["logo_image"], "/img/logo.png");
        assert_eq!(body["design"]["layout"], "banner");
        assert_eq!(body["primary_fields"][0]["format"], "PKDateStyleShort");
        assert!(body["primary_fields"][1].get("format").is_none());
    }

    #[test]
    fn never_expiring_template_omits_type_on_create_only() {
        let t = Template::from(template_response(json!({ "expiration_type": null })));
        let draft = t.to_draft();

        let created = serde_json::to_value(template_payload(&draft, None)).unwrap();
        assert!(created.get("expiration_type").is_none());

        let updated = template_update_payload(&draft);
        assert_eq!(updated.expiration_type.as_deref(), Some("none"));
        assert!(updated.expiration_value.is_none());
    }

    #[test]
    fn pass_data_values_flatten_to_text() {
        let p: PassResponse = serde_json::from_value(json!({
            "id": "pass-1",
            "serial_number": "abc",
            "template_id": "tmpl-1",
            "customer_id": "cust-1",
            "pass_data": { "points": 120, "tier": "Gold", "note": null }
        }))
        .unwrap();
        let pass = WalletPass::from(p);
        assert_eq!(pass.pass_data["points"], "120");
        assert_eq!(pass.pass_data["tier"], "Gold");
        assert_eq!(pass.pass_data["note"], "");
        assert!(!pass.is_voided);
    }

    #[test]
    fn customer_defaults_opt_ins_to_true() {
        let c: CustomerResponse = serde_json::from_value(json!({
            "id": "cust-1",
            "email": "ada@example.com",
            "custom_fields": { "tier": "gold", "visits": 3 }
        }))
        .unwrap();
        let customer = Customer::from(c);
        assert!(customer.email_opt_in && customer.sms_opt_in && customer.push_opt_in);
        assert_eq!(customer.custom_fields["visits"], "3");
        assert_eq!(customer.display_name(), "ada@example.com");
    }
}
