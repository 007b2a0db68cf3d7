//! Customer command handlers.

use tabled::Tabled;

use passdeck_core::{Customer, CustomerDraft, Dashboard};

use crate::cli::{CustomerDetails, CustomersArgs, CustomersCommand, GlobalOpts, TagCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.display_name(),
            email: c.email.clone().unwrap_or_default(),
            phone: c.phone.clone().unwrap_or_default(),
            tags: c.tags.join(", "),
            active: output::yes_no(c.is_active),
        }
    }
}

fn detail(c: &Customer) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let mut out = output::detail_lines(&[
        ("ID", c.id.to_string()),
        ("Name", c.display_name()),
        ("Email", opt(&c.email)),
        ("Phone", opt(&c.phone)),
        (
            "Opt-ins",
            format!(
                "email {} · sms {} · push {}",
                output::yes_no(c.email_opt_in),
                output::yes_no(c.sms_opt_in),
                output::yes_no(c.push_opt_in)
            ),
        ),
        (
            "Tags",
            if c.tags.is_empty() {
                "-".into()
            } else {
                c.tags.join(", ")
            },
        ),
        ("Active", output::yes_no(c.is_active)),
        (
            "Last seen",
            c.last_engagement
                .map_or_else(|| "-".into(), |d| d.to_rfc3339()),
        ),
    ]);
    for (key, value) in &c.custom_fields {
        out.push_str(&format!("\n  {key} = {value}"));
    }
    out
}

fn print_customer(customer: &Customer, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, customer, detail, |c| c.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Overlay the flags that were given onto `draft`.
fn apply_details(draft: &mut CustomerDraft, details: CustomerDetails) {
    if details.name.is_some() {
        draft.full_name = details.name;
    }
    if details.first_name.is_some() {
        draft.first_name = details.first_name;
    }
    if details.last_name.is_some() {
        draft.last_name = details.last_name;
    }
    if details.phone.is_some() {
        draft.phone = details.phone;
    }
    if let Some(v) = details.email_opt_in {
        draft.email_opt_in = v;
    }
    if let Some(v) = details.sms_opt_in {
        draft.sms_opt_in = v;
    }
    if let Some(v) = details.push_opt_in {
        draft.push_opt_in = v;
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List { search } => {
            let customers = dashboard.list_customers(search.as_deref()).await?;
            let out = output::render_list(global.output, &customers, |c| CustomerRow::from(c), |c| {
                c.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { id } => {
            let customer = dashboard.get_customer(&util::entity_id(&id)).await?;
            print_customer(&customer, global)
        }

        CustomersCommand::Create {
            email,
            details,
            tags,
        } => {
            let mut draft = CustomerDraft::new(email);
            apply_details(&mut draft, details);
            for tag in &tags {
                draft.add_tag(tag);
            }
            let customer = dashboard.create_customer(&draft).await?;
            util::note(global, &format!("Created customer {}", customer.display_name()));
            print_customer(&customer, global)
        }

        CustomersCommand::Update { id, email, details } => {
            let id = util::entity_id(&id);
            let mut draft = dashboard.get_customer(&id).await?.to_draft();
            if let Some(email) = email {
                draft.email = email;
            }
            apply_details(&mut draft, details);
            let customer = dashboard.update_customer(&id, &draft).await?;
            util::note(global, &format!("Updated customer {}", customer.display_name()));
            print_customer(&customer, global)
        }

        CustomersCommand::Delete { id } => {
            let id = util::entity_id(&id);
            if !util::confirm(&format!("Delete customer {id}?"), "customers delete", global)? {
                return Ok(());
            }
            dashboard.delete_customer(&id).await?;
            util::note(global, &format!("Deleted customer {id}"));
            Ok(())
        }

        CustomersCommand::Tag(args) => match args.command {
            TagCommand::Add { id, tag } => {
                let customer = dashboard
                    .add_customer_tag(&util::entity_id(&id), &tag)
                    .await?;
                print_customer(&customer, global)
            }
            TagCommand::Remove { id, tag } => {
                let customer = dashboard
                    .remove_customer_tag(&util::entity_id(&id), &tag)
                    .await?;
                print_customer(&customer, global)
            }
        },
    }
}
