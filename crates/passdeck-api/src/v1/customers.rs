// Customer endpoints

use tracing::debug;

use crate::error::Error;
use crate::v1::client::ApiClient;
use crate::v1::types::{CustomerPayload, CustomerResponse};

impl ApiClient {
    /// List customers, with an optional server-side search term.
    ///
    /// `GET customers/?search=`
    pub async fn list_customers(&self, search: Option<&str>) -> Result<Vec<CustomerResponse>, Error> {
        match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                self.get_with_params("customers/", &[("search", term.to_owned())])
                    .await
            }
            None => self.get("customers/").await,
        }
    }

    /// `GET customers/{id}`
    pub async fn get_customer(&self, id: &str) -> Result<CustomerResponse, Error> {
        self.get(&format!("customers/{id}")).await
    }

    /// `POST customers/`
    pub async fn create_customer(&self, body: &CustomerPayload) -> Result<CustomerResponse, Error> {
        debug!(email = ?body.email, "creating customer");
        self.post("customers/", body).await
    }

    /// `PUT customers/{id}`
    pub async fn update_customer(
        &self,
        id: &str,
        body: &CustomerPayload,
    ) -> Result<CustomerResponse, Error> {
        debug!(customer_id = id, "updating customer");
        self.put(&format!("customers/{id}"), body).await
    }

    /// `DELETE customers/{id}`
    pub async fn delete_customer(&self, id: &str) -> Result<(), Error> {
        debug!(customer_id = id, "deleting customer");
        self.delete(&format!("customers/{id}")).await
    }
}
