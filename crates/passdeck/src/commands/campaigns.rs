//! Campaign command handlers.

use tabled::Tabled;

use passdeck_core::{Campaign, CampaignDraft, Dashboard};

use crate::cli::{CampaignDetails, CampaignsArgs, CampaignsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CampaignRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    campaign_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Running")]
    running: String,
    #[tabled(rename = "Window")]
    window: String,
}

fn window(c: &Campaign) -> String {
    let day = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map_or_else(|| "…".into(), |d| d.format("%Y-%m-%d").to_string())
    };
    if c.start_date.is_none() && c.end_date.is_none() {
        return "-".into();
    }
    format!("{} → {}", day(c.start_date), day(c.end_date))
}

impl From<&Campaign> for CampaignRow {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            campaign_type: c.campaign_type.clone(),
            status: c.status.clone(),
            running: output::yes_no(c.is_running_at(chrono::Utc::now())),
            window: window(c),
        }
    }
}

fn detail(c: &Campaign) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    output::detail_lines(&[
        ("ID", c.id.to_string()),
        ("Name", c.name.clone()),
        ("Description", opt(&c.description)),
        ("Type", c.campaign_type.clone()),
        ("Status", c.status.clone()),
        ("Active", output::yes_no(c.is_active)),
        (
            "Template",
            c.template_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        ),
        ("Window", window(c)),
        ("Notification", opt(&c.notification_message)),
    ])
}

fn print_campaign(campaign: &Campaign, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, campaign, detail, |c| c.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn apply_details(draft: &mut CampaignDraft, details: CampaignDetails) -> Result<(), CliError> {
    if details.description.is_some() {
        draft.description = details.description;
    }
    if let Some(template) = details.template {
        draft.template_id = Some(util::entity_id(&template));
    }
    if let Some(campaign_type) = details.campaign_type {
        draft.campaign_type = campaign_type;
    }
    if let Some(status) = details.status {
        draft.status = status;
    }
    if details.notification.is_some() {
        draft.notification_message = details.notification;
    }
    if let Some(ref start) = details.start {
        draft.start_date = Some(util::parse_datetime("start", start)?);
    }
    if let Some(ref end) = details.end {
        draft.end_date = Some(util::parse_datetime("end", end)?);
    }
    if let Some(active) = details.active {
        draft.is_active = active;
    }
    Ok(())
}

pub async fn handle(
    dashboard: &Dashboard,
    args: CampaignsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CampaignsCommand::List => {
            let campaigns = dashboard.list_campaigns().await?;
            let out = output::render_list(global.output, &campaigns, |c| CampaignRow::from(c), |c| {
                c.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CampaignsCommand::Get { id } => {
            let campaign = dashboard.get_campaign(&util::entity_id(&id)).await?;
            print_campaign(&campaign, global)
        }

        CampaignsCommand::Create { name, details } => {
            let mut draft = CampaignDraft::new(name);
            apply_details(&mut draft, details)?;
            let campaign = dashboard.create_campaign(&draft).await?;
            util::note(global, &format!("Created campaign '{}'", campaign.name));
            print_campaign(&campaign, global)
        }

        CampaignsCommand::Update { id, name, details } => {
            let id = util::entity_id(&id);
            let mut draft = dashboard.get_campaign(&id).await?.to_draft();
            if let Some(name) = name {
                draft.name = name;
            }
            apply_details(&mut draft, details)?;
            let campaign = dashboard.update_campaign(&id, &draft).await?;
            util::note(global, &format!("Updated campaign '{}'", campaign.name));
            print_campaign(&campaign, global)
        }

        CampaignsCommand::Delete { id } => {
            let id = util::entity_id(&id);
            if !util::confirm(&format!("Delete campaign {id}?"), "campaigns delete", global)? {
                return Ok(());
            }
            dashboard.delete_campaign(&id).await?;
            util::note(global, &format!("Deleted campaign {id}"));
            Ok(())
        }
    }
}
