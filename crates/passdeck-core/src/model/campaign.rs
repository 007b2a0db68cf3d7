// ── Campaign domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

pub const DEFAULT_CAMPAIGN_TYPE: &str = "standard";
pub const DEFAULT_CAMPAIGN_STATUS: &str = "draft";

/// A messaging campaign pushed to pass holders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: EntityId,
    pub organization_id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub campaign_type: String,
    pub template_id: Option<EntityId>,
    pub content: Option<String>,
    pub notification_message: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn to_draft(&self) -> CampaignDraft {
        CampaignDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            campaign_type: self.campaign_type.clone(),
            template_id: self.template_id.clone(),
            content: self.content.clone(),
            notification_message: self.notification_message.clone(),
            status: self.status.clone(),
            is_active: self.is_active,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Whether `now` lies within the scheduled window (open ends allowed).
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| now < end)
    }
}

/// Client-writable campaign content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub description: Option<String>,
    pub campaign_type: String,
    pub template_id: Option<EntityId>,
    pub content: Option<String>,
    pub notification_message: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CampaignDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            campaign_type: DEFAULT_CAMPAIGN_TYPE.into(),
            template_id: None,
            content: None,
            notification_message: None,
            status: DEFAULT_CAMPAIGN_STATUS.into(),
            is_active: false,
            start_date: None,
            end_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_draft_defaults() {
        let draft = CampaignDraft::new("Spring promo");
        assert_eq!(draft.campaign_type, "standard");
        assert_eq!(draft.status, "draft");
        assert!(!draft.is_active);
    }

    #[test]
    fn running_window() {
        let now = Utc::now();
        let campaign = Campaign {
            id: EntityId::from("c-1"),
            organization_id: None,
            name: "Promo".into(),
            description: None,
            campaign_type: "standard".into(),
            template_id: None,
            content: None,
            notification_message: None,
            status: "active".into(),
            is_active: true,
            start_date: Some(now - Duration::days(1)),
            end_date: Some(now + Duration::days(1)),
            created_at: None,
        };
        assert!(campaign.is_running_at(now));
        assert!(!campaign.is_running_at(now + Duration::days(2)));

        let inactive = Campaign {
            is_active: false,
            ..campaign
        };
        assert!(!inactive.is_running_at(now));
    }
}
