// ── Dashboard facade ──
//
// The operations behind every dashboard screen: validate client-side,
// call the backend, hand back domain types. Each call stands alone;
// nothing is cached and nothing retries.

use std::sync::Arc;

use chrono::Utc;
use passdeck_api::types::{PassFile, PassQuery, PassUpdateRequest};
use passdeck_api::ApiClient;
use tracing::{debug, info};

use crate::config::{AuthCredentials, DashboardConfig};
use crate::convert::{
    campaign_payload, customer_payload, pass_create_request, template_payload,
    template_update_payload,
};
use crate::error::CoreError;
use crate::model::{
    Campaign, CampaignDraft, Customer, CustomerDraft, EntityId, FieldGroup, FieldType, PassDraft,
    PassField, Template, TemplateDraft, TemplateFilter, TextAlignment, User, WalletKind,
    WalletPass, seed_pass_data,
};
use crate::resolve::CardPreview;
use crate::session::{Session, TokenStore};
use crate::validate::{ValidationErrors, ValidationPolicy};

/// Filter for pass listings. All set criteria must match.
#[derive(Debug, Clone, Default)]
pub struct PassFilter {
    pub template_id: Option<EntityId>,
    pub customer_id: Option<EntityId>,
    pub campaign_id: Option<EntityId>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// A new field for [`Dashboard::add_template_field`]. Without a key, one
/// is generated.
#[derive(Debug, Clone, Default)]
pub struct NewField {
    pub key: Option<String>,
    pub label: String,
    pub value: String,
    pub field_type: FieldType,
    pub text_alignment: TextAlignment,
}

pub struct Dashboard {
    config: DashboardConfig,
    client: Arc<ApiClient>,
    session: Session,
}

/// Translate a 404 into `NotFound` for `entity_type`/`id`.
fn or_not_found<'a>(
    entity_type: &'static str,
    id: &'a EntityId,
) -> impl FnOnce(passdeck_api::Error) -> CoreError + 'a {
    move |err| {
        if err.is_not_found() {
            CoreError::not_found(entity_type, id)
        } else {
            CoreError::from(err)
        }
    }
}

impl Dashboard {
    pub fn new(config: DashboardConfig, store: Box<dyn TokenStore>) -> Result<Self, CoreError> {
        let client = Arc::new(ApiClient::new(config.url.as_str(), &config.transport())?);
        let session = Session::new(Arc::clone(&client), store);
        Ok(Self {
            config,
            client,
            session,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Establish a session: a persisted one if still valid, else the
    /// configured credentials.
    pub async fn connect(&self) -> Result<User, CoreError> {
        if let Some(user) = self.session.restore().await? {
            return Ok(user);
        }
        match &self.config.credentials {
            Some(AuthCredentials::Password { email, password }) => {
                self.session.login(email, password).await
            }
            Some(AuthCredentials::Token(token)) => {
                self.session.login_with_token(token.clone()).await
            }
            None => Err(CoreError::NotAuthenticated),
        }
    }

    fn organization_id(&self) -> Option<EntityId> {
        self.session.current_user().and_then(|u| u.organization_id)
    }

    // ── Templates ────────────────────────────────────────────────────

    /// Templates matching `filter`. Archived templates are kept only on
    /// request, and only if the backend listing returns them at all.
    pub async fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<Template>, CoreError> {
        let all = self.client.list_templates().await?;
        let total = all.len();
        let templates: Vec<Template> = all
            .into_iter()
            .map(Template::from)
            .filter(|t| filter.matches(t))
            .collect();
        debug!(total, shown = templates.len(), "listed templates");
        Ok(templates)
    }

    pub async fn get_template(&self, id: &EntityId) -> Result<Template, CoreError> {
        let resp = self
            .client
            .get_template(&id.to_string())
            .await
            .map_err(or_not_found("Template", id))?;
        Ok(resp.into())
    }

    /// Validate with `policy`, then create. Nothing is sent if
    /// validation fails.
    pub async fn create_template(
        &self,
        draft: &TemplateDraft,
        policy: ValidationPolicy,
    ) -> Result<Template, CoreError> {
        policy.validate(draft)?;
        let body = template_payload(draft, self.organization_id().as_ref());
        let created: Template = self.client.create_template(&body).await?.into();
        info!(template_id = %created.id, name = %created.name, "template created");
        Ok(created)
    }

    /// Validate with `policy`, then replace the template's content.
    pub async fn update_template(
        &self,
        id: &EntityId,
        draft: &TemplateDraft,
        policy: ValidationPolicy,
    ) -> Result<Template, CoreError> {
        policy.validate(draft)?;
        let body = template_update_payload(draft);
        let updated: Template = self
            .client
            .update_template(&id.to_string(), &body)
            .await
            .map_err(or_not_found("Template", id))?
            .into();
        info!(template_id = %id, "template updated");
        Ok(updated)
    }

    /// Create a copy named `"<name> (Copy)"`.
    pub async fn duplicate_template(&self, id: &EntityId) -> Result<Template, CoreError> {
        let original = self.get_template(id).await?;
        let copy = original.duplicate();
        let body = template_payload(&copy, self.organization_id().as_ref());
        let created: Template = self.client.create_template(&body).await?.into();
        info!(from = %id, template_id = %created.id, "template duplicated");
        Ok(created)
    }

    pub async fn delete_template(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_template(&id.to_string())
            .await
            .map_err(or_not_found("Template", id))?;
        info!(template_id = %id, "template deleted");
        Ok(())
    }

    /// Append a field to one group of a stored template and save it.
    /// Returns the saved template and the key of the new field.
    pub async fn add_template_field(
        &self,
        id: &EntityId,
        group: FieldGroup,
        field: NewField,
    ) -> Result<(Template, String), CoreError> {
        let template = self.get_template(id).await?;
        let mut draft = template.to_draft();

        let key = match field.key {
            Some(key) => {
                let built = PassField::new(key.clone(), field.label, field.value)
                    .with_type(field.field_type)
                    .with_alignment(field.text_alignment);
                draft.fields.push(group, built)?;
                key
            }
            None => {
                let added = draft.fields.add_field(group);
                added.label = field.label;
                added.value = field.value;
                added.field_type = field.field_type;
                added.text_alignment = field.text_alignment;
                added.key.clone()
            }
        };
        debug!(template_id = %id, %group, key = %key, "adding field");

        let saved = self
            .update_template(id, &draft, ValidationPolicy::Lenient)
            .await?;
        Ok((saved, key))
    }

    /// Remove the field at `index` of `group` and save. Issued passes keep
    /// their `pass_data` entry for it.
    pub async fn remove_template_field(
        &self,
        id: &EntityId,
        group: FieldGroup,
        index: usize,
    ) -> Result<(Template, PassField), CoreError> {
        let template = self.get_template(id).await?;
        let mut draft = template.to_draft();
        let removed = draft.fields.remove_field(group, index)?;
        debug!(template_id = %id, %group, index, key = %removed.key, "removing field");

        let saved = self
            .update_template(id, &draft, ValidationPolicy::Lenient)
            .await?;
        Ok((saved, removed))
    }

    pub async fn preview_template(&self, id: &EntityId) -> Result<CardPreview, CoreError> {
        let template = self.get_template(id).await?;
        Ok(CardPreview::for_template(&template)?)
    }

    // ── Passes ───────────────────────────────────────────────────────

    pub async fn list_passes(&self, filter: &PassFilter) -> Result<Vec<WalletPass>, CoreError> {
        let query = PassQuery {
            template_id: filter.template_id.as_ref().map(ToString::to_string),
            customer_id: filter.customer_id.as_ref().map(ToString::to_string),
            campaign_id: filter.campaign_id.as_ref().map(ToString::to_string),
            skip: filter.skip,
            limit: filter.limit,
        };
        let passes = self.client.list_passes(&query).await?;
        Ok(passes.into_iter().map(WalletPass::from).collect())
    }

    pub async fn get_pass(&self, id: &EntityId) -> Result<WalletPass, CoreError> {
        let resp = self
            .client
            .get_pass(&id.to_string())
            .await
            .map_err(or_not_found("Pass", id))?;
        Ok(resp.into())
    }

    /// A creation draft with `template_id` selected and seeded.
    pub async fn start_pass(&self, template_id: &EntityId) -> Result<(Template, PassDraft), CoreError> {
        let template = self.get_template(template_id).await?;
        let mut draft = PassDraft::new();
        draft.select_template(&template);
        Ok((template, draft))
    }

    /// Issue a pass. The template must be active and not archived; any
    /// field values still missing are seeded from it.
    pub async fn create_pass(&self, draft: &PassDraft) -> Result<WalletPass, CoreError> {
        let (template_id, customer_id) = match (&draft.template_id, &draft.customer_id) {
            (Some(t), Some(c)) => (t, c),
            (t, c) => {
                let mut errors = ValidationErrors::new();
                if t.is_none() {
                    errors.push("template_id", "Template is required");
                }
                if c.is_none() {
                    errors.push("customer_id", "Customer is required");
                }
                return Err(errors.into());
            }
        };

        let template = self.get_template(template_id).await?;
        if !template.is_issuable() {
            return Err(CoreError::Rejected {
                message: format!(
                    "template '{}' is {}; passes can only be issued from active templates",
                    template.name,
                    if template.is_archived { "archived" } else { "inactive" },
                ),
            });
        }

        let mut data = draft.pass_data.clone();
        seed_pass_data(&mut data, &template);
        let body = pass_create_request(
            template_id,
            customer_id,
            draft.campaign_id.as_ref(),
            &data,
            draft.expiration_date,
        );
        let created: WalletPass = self.client.create_pass(&body).await?.into();
        info!(pass_id = %created.id, template_id = %template_id, "pass issued");
        Ok(created)
    }

    /// Void a pass. There is no way back.
    pub async fn void_pass(&self, id: &EntityId) -> Result<WalletPass, CoreError> {
        let current = self.get_pass(id).await?;
        if current.is_voided {
            return Err(CoreError::Rejected {
                message: "pass is already voided".into(),
            });
        }
        let body = PassUpdateRequest {
            is_voided: Some(true),
            ..PassUpdateRequest::default()
        };
        let updated: WalletPass = self
            .client
            .update_pass(&id.to_string(), &body)
            .await
            .map_err(or_not_found("Pass", id))?
            .into();
        info!(pass_id = %id, "pass voided");
        Ok(updated)
    }

    /// Bump `last_updated_tag` so devices re-fetch the pass.
    pub async fn refresh_pass(&self, id: &EntityId) -> Result<WalletPass, CoreError> {
        let body = PassUpdateRequest {
            last_updated_tag: Some(Utc::now().to_rfc3339()),
            ..PassUpdateRequest::default()
        };
        let updated: WalletPass = self
            .client
            .update_pass(&id.to_string(), &body)
            .await
            .map_err(or_not_found("Pass", id))?
            .into();
        info!(pass_id = %id, tag = ?updated.last_updated_tag, "pass refreshed");
        Ok(updated)
    }

    pub async fn redeem_pass(&self, id: &EntityId) -> Result<WalletPass, CoreError> {
        let updated: WalletPass = self
            .client
            .redeem_pass(&id.to_string())
            .await
            .map_err(or_not_found("Pass", id))?
            .into();
        info!(pass_id = %id, "pass redeemed");
        Ok(updated)
    }

    pub async fn download_pass(&self, id: &EntityId, wallet: WalletKind) -> Result<PassFile, CoreError> {
        let file = self
            .client
            .download_pass(&id.to_string(), &wallet.to_string())
            .await
            .map_err(or_not_found("Pass", id))?;
        debug!(pass_id = %id, %wallet, bytes = file.bytes.len(), "pass downloaded");
        Ok(file)
    }

    /// An issued pass rendered through its template.
    pub async fn preview_pass(&self, id: &EntityId) -> Result<CardPreview, CoreError> {
        let pass = self.get_pass(id).await?;
        let template = self.get_template(&pass.template_id).await?;
        Ok(CardPreview::for_pass(&template, &pass)?)
    }

    // ── Customers ────────────────────────────────────────────────────

    pub async fn list_customers(&self, search: Option<&str>) -> Result<Vec<Customer>, CoreError> {
        let customers = self.client.list_customers(search).await?;
        Ok(customers.into_iter().map(Customer::from).collect())
    }

    pub async fn get_customer(&self, id: &EntityId) -> Result<Customer, CoreError> {
        let resp = self
            .client
            .get_customer(&id.to_string())
            .await
            .map_err(or_not_found("Customer", id))?;
        Ok(resp.into())
    }

    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, CoreError> {
        validate_customer(draft)?;
        let body = customer_payload(draft, self.organization_id().as_ref());
        let created: Customer = self.client.create_customer(&body).await?.into();
        info!(customer_id = %created.id, "customer created");
        Ok(created)
    }

    pub async fn update_customer(
        &self,
        id: &EntityId,
        draft: &CustomerDraft,
    ) -> Result<Customer, CoreError> {
        validate_customer(draft)?;
        let body = customer_payload(draft, None);
        let updated: Customer = self
            .client
            .update_customer(&id.to_string(), &body)
            .await
            .map_err(or_not_found("Customer", id))?
            .into();
        info!(customer_id = %id, "customer updated");
        Ok(updated)
    }

    pub async fn delete_customer(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_customer(&id.to_string())
            .await
            .map_err(or_not_found("Customer", id))?;
        info!(customer_id = %id, "customer deleted");
        Ok(())
    }

    /// Add a tag. Blank tags are rejected; duplicates are kept.
    pub async fn add_customer_tag(&self, id: &EntityId, tag: &str) -> Result<Customer, CoreError> {
        let mut draft = self.get_customer(id).await?.to_draft();
        if !draft.add_tag(tag) {
            let mut errors = ValidationErrors::new();
            errors.push("tags", "Tag must not be empty");
            return Err(errors.into());
        }
        self.update_customer(id, &draft).await
    }

    /// Remove every occurrence of `tag`.
    pub async fn remove_customer_tag(&self, id: &EntityId, tag: &str) -> Result<Customer, CoreError> {
        let mut draft = self.get_customer(id).await?.to_draft();
        let removed = draft.remove_tag(tag);
        debug!(customer_id = %id, tag, removed, "removing tag");
        self.update_customer(id, &draft).await
    }

    // ── Campaigns ────────────────────────────────────────────────────

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, CoreError> {
        let campaigns = self.client.list_campaigns().await?;
        Ok(campaigns.into_iter().map(Campaign::from).collect())
    }

    pub async fn get_campaign(&self, id: &EntityId) -> Result<Campaign, CoreError> {
        let resp = self
            .client
            .get_campaign(&id.to_string())
            .await
            .map_err(or_not_found("Campaign", id))?;
        Ok(resp.into())
    }

    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, CoreError> {
        validate_campaign(draft)?;
        let body = campaign_payload(draft, self.organization_id().as_ref());
        let created: Campaign = self.client.create_campaign(&body).await?.into();
        info!(campaign_id = %created.id, "campaign created");
        Ok(created)
    }

    pub async fn update_campaign(
        &self,
        id: &EntityId,
        draft: &CampaignDraft,
    ) -> Result<Campaign, CoreError> {
        validate_campaign(draft)?;
        let body = campaign_payload(draft, None);
        let updated: Campaign = self
            .client
            .update_campaign(&id.to_string(), &body)
            .await
            .map_err(or_not_found("Campaign", id))?
            .into();
        info!(campaign_id = %id, "campaign updated");
        Ok(updated)
    }

    pub async fn delete_campaign(&self, id: &EntityId) -> Result<(), CoreError> {
        self.client
            .delete_campaign(&id.to_string())
            .await
            .map_err(or_not_found("Campaign", id))?;
        info!(campaign_id = %id, "campaign deleted");
        Ok(())
    }
}

fn validate_customer(draft: &CustomerDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = draft.email.trim();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !email.contains('@') {
        errors.push("email", "Email must be a valid address");
    }
    errors.into_result()
}

fn validate_campaign(draft: &CampaignDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if draft.name.trim().is_empty() {
        errors.push("name", "Campaign name is required");
    }
    if draft
        .start_date
        .zip(draft.end_date)
        .is_some_and(|(start, end)| end < start)
    {
        errors.push("end_date", "End date must not be before the start date");
    }
    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn customer_requires_email() {
        let errors = validate_customer(&CustomerDraft::default()).unwrap_err();
        assert_eq!(errors.messages_for("email").collect::<Vec<_>>(), ["Email is required"]);
        assert!(validate_customer(&CustomerDraft::new("ada@example.com")).is_ok());
    }

    #[test]
    fn campaign_dates_must_be_ordered() {
        let mut draft = CampaignDraft::new("Promo");
        let now = Utc::now();
        draft.start_date = Some(now);
        draft.end_date = Some(now - chrono::Duration::days(1));
        let errors = validate_campaign(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
