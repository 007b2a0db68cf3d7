// Campaign endpoints

use tracing::debug;

use crate::error::Error;
use crate::v1::client::ApiClient;
use crate::v1::types::{CampaignPayload, CampaignResponse};

impl ApiClient {
    /// `GET campaigns/`
    pub async fn list_campaigns(&self) -> Result<Vec<CampaignResponse>, Error> {
        self.get("campaigns/").await
    }

    /// `GET campaigns/{id}`
    pub async fn get_campaign(&self, id: &str) -> Result<CampaignResponse, Error> {
        self.get(&format!("campaigns/{id}")).await
    }

    /// `POST campaigns/`
    pub async fn create_campaign(&self, body: &CampaignPayload) -> Result<CampaignResponse, Error> {
        debug!(name = ?body.name, "creating campaign");
        self.post("campaigns/", body).await
    }

    /// `PUT campaigns/{id}`
    pub async fn update_campaign(
        &self,
        id: &str,
        body: &CampaignPayload,
    ) -> Result<CampaignResponse, Error> {
        debug!(campaign_id = id, "updating campaign");
        self.put(&format!("campaigns/{id}"), body).await
    }

    /// `DELETE campaigns/{id}`
    pub async fn delete_campaign(&self, id: &str) -> Result<(), Error> {
        debug!(campaign_id = id, "deleting campaign");
        self.delete(&format!("campaigns/{id}")).await
    }
}
