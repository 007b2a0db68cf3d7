// Issued pass endpoints

use tracing::debug;

use crate::error::Error;
use crate::v1::client::ApiClient;
use crate::v1::types::{PassCreateRequest, PassFile, PassQuery, PassResponse, PassUpdateRequest};

impl ApiClient {
    /// List passes, optionally filtered by template, customer or campaign.
    ///
    /// `GET passes/?template_id=&customer_id=&campaign_id=&skip=&limit=`
    pub async fn list_passes(&self, query: &PassQuery) -> Result<Vec<PassResponse>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref id) = query.template_id {
            params.push(("template_id", id.clone()));
        }
        if let Some(ref id) = query.customer_id {
            params.push(("customer_id", id.clone()));
        }
        if let Some(ref id) = query.campaign_id {
            params.push(("campaign_id", id.clone()));
        }
        if let Some(skip) = query.skip {
            params.push(("skip", skip.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_with_params("passes/", &params).await
    }

    /// `GET passes/{id}`
    pub async fn get_pass(&self, id: &str) -> Result<PassResponse, Error> {
        self.get(&format!("passes/{id}")).await
    }

    /// `POST passes/`
    pub async fn create_pass(&self, body: &PassCreateRequest) -> Result<PassResponse, Error> {
        debug!(
            template_id = %body.template_id,
            customer_id = %body.customer_id,
            "issuing pass"
        );
        self.post("passes/", body).await
    }

    /// Partial update; only the set fields of `body` are sent.
    ///
    /// `PUT passes/{id}`
    pub async fn update_pass(
        &self,
        id: &str,
        body: &PassUpdateRequest,
    ) -> Result<PassResponse, Error> {
        debug!(pass_id = id, "updating pass");
        self.put(&format!("passes/{id}"), body).await
    }

    /// `POST passes/{id}/redeem`
    pub async fn redeem_pass(&self, id: &str) -> Result<PassResponse, Error> {
        debug!(pass_id = id, "redeeming pass");
        self.post_empty(&format!("passes/{id}/redeem")).await
    }

    /// Download the wallet bundle for a pass.
    ///
    /// `GET passes/{id}/download?pass_type={apple|google}`
    pub async fn download_pass(&self, id: &str, wallet: &str) -> Result<PassFile, Error> {
        debug!(pass_id = id, wallet, "downloading pass");
        self.get_file(
            &format!("passes/{id}/download"),
            &[("pass_type", wallet.to_owned())],
        )
        .await
    }
}
