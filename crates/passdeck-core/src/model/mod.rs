// ── Domain model ──
//
// Canonical types for templates, passes, customers and campaigns. These are
// what consumers work with; wire shapes stay in `passdeck-api`.

pub mod campaign;
pub mod color;
pub mod customer;
pub mod entity_id;
pub mod field;
pub mod pass;
pub mod template;
pub mod user;

pub use campaign::{Campaign, CampaignDraft};
pub use color::{
    BLACK, CARD_FALLBACK_BACKGROUND, ColorError, Rgb, WHITE, contrast_text_color, is_hex_color,
};
pub use customer::{Customer, CustomerDraft};
pub use entity_id::EntityId;
pub use field::{
    ExtraAttributes, FieldGroup, FieldGroups, FieldOpError, FieldType, PassField, TextAlignment,
};
pub use pass::{PassData, PassDraft, PassStatus, WalletKind, WalletPass, seed_pass_data};
pub use template::{
    Appearance, Expiration, Nfc, PassType, Template, TemplateDraft, TemplateFilter,
};
pub use user::User;
