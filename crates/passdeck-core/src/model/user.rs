// ── User ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// The signed-in dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub full_name: Option<String>,
    pub organization_id: Option<EntityId>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
