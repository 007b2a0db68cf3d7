// Pass template endpoints

use tracing::debug;

use crate::error::Error;
use crate::v1::client::ApiClient;
use crate::v1::types::{TemplatePayload, TemplateResponse};

impl ApiClient {
    /// List the organization's templates.
    ///
    /// `GET templates/`
    pub async fn list_templates(&self) -> Result<Vec<TemplateResponse>, Error> {
        self.get("templates/").await
    }

    /// `GET templates/{id}`
    pub async fn get_template(&self, id: &str) -> Result<TemplateResponse, Error> {
        self.get(&format!("templates/{id}")).await
    }

    /// `POST templates/`
    pub async fn create_template(&self, body: &TemplatePayload) -> Result<TemplateResponse, Error> {
        debug!(name = ?body.name, "creating template");
        self.post("templates/", body).await
    }

    /// `PUT templates/{id}`
    pub async fn update_template(
        &self,
        id: &str,
        body: &TemplatePayload,
    ) -> Result<TemplateResponse, Error> {
        debug!(template_id = id, "updating template");
        self.put(&format!("templates/{id}"), body).await
    }

    /// `DELETE templates/{id}`
    pub async fn delete_template(&self, id: &str) -> Result<(), Error> {
        debug!(template_id = id, "deleting template");
        self.delete(&format!("templates/{id}")).await
    }
}
