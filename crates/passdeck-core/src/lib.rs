// passdeck-core: Wallet-pass domain layer between passdeck-api and consumers.
//
// Templates describe a pass face as five ordered field groups. Passes
// override template values per key. Everything here is plain data plus
// the `Dashboard` facade that validates and talks to the backend.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod resolve;
pub mod session;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, DashboardConfig, TlsVerification};
pub use dashboard::{Dashboard, NewField, PassFilter};
pub use error::CoreError;
pub use resolve::{CardPreview, ResolvedField, resolve_fields, resolve_value};
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use validate::{
    FieldError, LenientValidator, StrictValidator, TemplateValidator, ValidationErrors,
    ValidationPolicy,
};

pub use passdeck_api::TokenPair;
pub use passdeck_api::types::PassFile;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Templates and fields
    Appearance, Expiration, ExtraAttributes, FieldGroup, FieldGroups, FieldOpError, FieldType,
    Nfc, PassField, PassType, Template, TemplateDraft, TemplateFilter, TextAlignment,
    // Passes
    PassData, PassDraft, PassStatus, WalletKind, WalletPass, seed_pass_data,
    // Customers / campaigns / users
    Campaign, CampaignDraft, Customer, CustomerDraft, EntityId, User,
    // Colors
    ColorError, Rgb, contrast_text_color, is_hex_color,
};
