// Wire types for the v1 REST API.
//
// These mirror the backend's JSON payloads field for field. Most columns
// are optional on the wire because the backend's shared base schemas are;
// `passdeck-core` tightens them into domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Free-form `pass_data` / `custom_fields` map as carried on the wire.
pub type JsonMap = BTreeMap<String, serde_json::Value>;

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

// ── Templates ───────────────────────────────────────────────────────

/// One displayable field inside a template field group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPayload {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<String>,
    /// Attributes this client does not model (`format`, `is_relative`, ...),
    /// replayed unchanged on writes.
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResponse {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pass_type: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub foreground_color: Option<String>,
    #[serde(default)]
    pub label_color: Option<String>,
    #[serde(default)]
    pub header_fields: Option<Vec<FieldPayload>>,
    #[serde(default)]
    pub primary_fields: Option<Vec<FieldPayload>>,
    #[serde(default)]
    pub secondary_fields: Option<Vec<FieldPayload>>,
    #[serde(default)]
    pub auxiliary_fields: Option<Vec<FieldPayload>>,
    #[serde(default)]
    pub back_fields: Option<Vec<FieldPayload>>,
    #[serde(default)]
    pub expiration_type: Option<String>,
    #[serde(default)]
    pub expiration_value: Option<String>,
    #[serde(default)]
    pub nfc_enabled: Option<bool>,
    #[serde(default)]
    pub nfc_message: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_archived: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Everything else the backend stores on a template: `design`, image
    /// paths, `locations`, ...
    #[serde(flatten)]
    pub extra: JsonMap,
}

/// Body for `POST templates/` and `PUT templates/{id}`.
///
/// Identity and timestamps are never part of a write.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    pub header_fields: Vec<FieldPayload>,
    pub primary_fields: Vec<FieldPayload>,
    pub secondary_fields: Vec<FieldPayload>,
    pub auxiliary_fields: Vec<FieldPayload>,
    pub back_fields: Vec<FieldPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nfc_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nfc_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

// ── Passes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PassResponse {
    pub id: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub pass_data: Option<JsonMap>,
    #[serde(default)]
    pub is_voided: Option<bool>,
    #[serde(default)]
    pub is_redeemed: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub redeemed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated_tag: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassCreateRequest {
    pub template_id: String,
    pub customer_id: String,
    pub pass_data: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Partial update body for `PUT passes/{id}`; unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_voided: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_data: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Query filters for `GET passes/`.
#[derive(Debug, Clone, Default)]
pub struct PassQuery {
    pub template_id: Option<String>,
    pub customer_id: Option<String>,
    pub campaign_id: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// A downloaded pass bundle (`.pkpass` for Apple, JSON for Google).
#[derive(Debug, Clone)]
pub struct PassFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ── Customers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerResponse {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_opt_in: Option<bool>,
    #[serde(default)]
    pub sms_opt_in: Option<bool>,
    #[serde(default)]
    pub push_opt_in: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub custom_fields: Option<JsonMap>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_engagement: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub email_opt_in: bool,
    pub sms_opt_in: bool,
    pub push_opt_in: bool,
    pub tags: Vec<String>,
    pub custom_fields: JsonMap,
    pub is_active: bool,
}

// ── Campaigns ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignResponse {
    pub id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub campaign_type: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub notification_message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}
