//! Pass command handlers.

use std::path::PathBuf;

use tabled::Tabled;

use passdeck_core::{Dashboard, PassFilter, WalletKind, WalletPass};

use crate::cli::{GlobalOpts, PassesArgs, PassesCommand};
use crate::error::CliError;
use crate::output;

use super::{templates, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PassRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Template")]
    template: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl PassRow {
    fn new(p: &WalletPass, color: bool) -> Self {
        Self {
            id: p.id.to_string(),
            serial: p.short_serial(),
            status: output::status_label(p.status(), color),
            template: p.template_id.short(8),
            customer: p.customer_id.short(8),
            expires: p
                .expiration_date
                .map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d").to_string()),
            created: p
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(p: &WalletPass) -> String {
    let ts = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map_or_else(|| "-".into(), |d| d.to_rfc3339())
    };
    let mut out = output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Serial", p.serial_number.clone()),
        ("Status", p.status().to_string()),
        ("Template", p.template_id.to_string()),
        ("Customer", p.customer_id.to_string()),
        (
            "Campaign",
            p.campaign_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        ),
        ("Expires", ts(p.expiration_date)),
        ("Redeemed at", ts(p.redeemed_at)),
        (
            "Update tag",
            p.last_updated_tag.clone().unwrap_or_else(|| "-".into()),
        ),
        ("Created", ts(p.created_at)),
    ]);
    if !p.pass_data.is_empty() {
        out.push_str("\n\nPass data:");
        for (key, value) in &p.pass_data {
            out.push_str(&format!("\n  {key} = {value}"));
        }
    }
    out
}

fn print_pass(pass: &WalletPass, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, pass, detail, |p| p.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: PassesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PassesCommand::List {
            template,
            customer,
            campaign,
            limit,
            skip,
        } => {
            let filter = PassFilter {
                template_id: template.as_deref().map(util::entity_id),
                customer_id: customer.as_deref().map(util::entity_id),
                campaign_id: campaign.as_deref().map(util::entity_id),
                skip,
                limit,
            };
            let passes = dashboard.list_passes(&filter).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &passes,
                |p| PassRow::new(p, color),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassesCommand::Get { id } => {
            let pass = dashboard.get_pass(&util::entity_id(&id)).await?;
            print_pass(&pass, global)
        }

        PassesCommand::Create {
            template,
            customer,
            campaign,
            values,
            expires,
        } => {
            let (template, mut draft) = dashboard.start_pass(&util::entity_id(&template)).await?;
            draft.customer_id = Some(util::entity_id(&customer));
            draft.campaign_id = campaign.as_deref().map(util::entity_id);
            for raw in &values {
                let (key, value) = util::parse_key_value(raw)?;
                if template.fields.find(&key).is_none() {
                    tracing::warn!(
                        key = %key,
                        template = %template.name,
                        "template has no field with this key"
                    );
                }
                draft.set_value(key, value);
            }
            draft.expiration_date = expires
                .as_deref()
                .map(|raw| util::parse_datetime("expires", raw))
                .transpose()?;

            let pass = dashboard.create_pass(&draft).await?;
            util::note(global, &format!("Issued pass {}", pass.short_serial()));
            print_pass(&pass, global)
        }

        PassesCommand::Void { id } => {
            let id = util::entity_id(&id);
            if !util::confirm(
                &format!("Void pass {id}? This cannot be undone."),
                "passes void",
                global,
            )? {
                return Ok(());
            }
            let pass = dashboard.void_pass(&id).await?;
            util::note(global, &format!("Voided pass {}", pass.short_serial()));
            print_pass(&pass, global)
        }

        PassesCommand::Refresh { id } => {
            let pass = dashboard.refresh_pass(&util::entity_id(&id)).await?;
            util::note(global, &format!("Refresh requested for {}", pass.short_serial()));
            print_pass(&pass, global)
        }

        PassesCommand::Redeem { id } => {
            let pass = dashboard.redeem_pass(&util::entity_id(&id)).await?;
            util::note(global, &format!("Redeemed pass {}", pass.short_serial()));
            print_pass(&pass, global)
        }

        PassesCommand::Download { id, wallet, out } => {
            let wallet = WalletKind::from(wallet);
            let id = util::entity_id(&id);
            let file = util::with_spinner(
                "Downloading",
                global,
                dashboard.download_pass(&id, wallet),
            )
            .await?;
            let path = out.unwrap_or_else(|| {
                default_download_path(file.filename.as_deref(), &id.to_string(), wallet)
            });
            std::fs::write(&path, &file.bytes)?;
            util::note(
                global,
                &format!("Saved {} bytes to {}", file.bytes.len(), path.display()),
            );
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        PassesCommand::Preview { id } => {
            let preview = dashboard.preview_pass(&util::entity_id(&id)).await?;
            templates::print_preview(&preview, global)
        }
    }
}

/// Server-suggested filename when it is a bare name, else `pass-<id>.<ext>`.
fn default_download_path(suggested: Option<&str>, id: &str, wallet: WalletKind) -> PathBuf {
    suggested
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.'))
        .map_or_else(
            || PathBuf::from(format!("pass-{id}.{}", wallet.file_extension())),
            PathBuf::from,
        )
}
