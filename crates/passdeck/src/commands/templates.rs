//! Template command handlers.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use passdeck_core::{
    CardPreview, Dashboard, FieldGroup, FieldGroups, NewField, Template, TemplateDraft,
    TemplateFilter, ValidationPolicy,
};

use crate::cli::{FieldsArgs, FieldsCommand, GlobalOpts, TemplatesArgs, TemplatesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    pass_type: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Archived")]
    archived: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Template> for TemplateRow {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            pass_type: t.pass_type.title().into(),
            fields: t.fields.len(),
            active: output::yes_no(t.is_active),
            archived: output::yes_no(t.is_archived),
            updated: t
                .updated_at
                .or(t.created_at)
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Group")]
    group: FieldGroup,
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Type")]
    field_type: String,
    #[tabled(rename = "Align")]
    align: String,
}

fn field_rows(fields: &FieldGroups) -> Vec<FieldRow> {
    FieldGroup::iter()
        .flat_map(|group| {
            fields
                .group(group)
                .iter()
                .enumerate()
                .map(move |(index, f)| FieldRow {
                    group,
                    index,
                    key: f.key.clone(),
                    label: f.label.clone(),
                    value: f.value.clone(),
                    field_type: f.field_type.to_string(),
                    align: f.text_alignment.to_string(),
                })
        })
        .collect()
}

fn detail(t: &Template) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let mut out = output::detail_lines(&[
        ("ID", t.id.to_string()),
        ("Name", t.name.clone()),
        ("Description", opt(&t.description)),
        ("Type", t.pass_type.title().into()),
        ("Background", opt(&t.appearance.background_color)),
        ("Foreground", opt(&t.appearance.foreground_color)),
        ("Label color", opt(&t.appearance.label_color)),
        ("Expires", t.expiration.describe()),
        (
            "NFC",
            if t.nfc.enabled {
                t.nfc.message.clone().unwrap_or_else(|| "enabled".into())
            } else {
                "off".into()
            },
        ),
        ("Active", output::yes_no(t.is_active)),
        ("Archived", output::yes_no(t.is_archived)),
    ]);
    let rows = field_rows(&t.fields);
    if !rows.is_empty() {
        out.push_str("\n\n");
        out.push_str(
            &tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    out
}

// ── Card preview ────────────────────────────────────────────────────

fn preview_text(p: &CardPreview) -> String {
    let mut lines = vec![
        format!("{}  [{}]", p.name, p.pass_type.title()),
        format!(
            "background {}  text {}  badge text {}",
            p.background_color,
            p.foreground_color.as_deref().unwrap_or("-"),
            p.badge_text_color
        ),
    ];
    if let (Some(status), Some(serial)) = (p.status, &p.short_serial) {
        lines.push(format!("{status} · {serial}"));
    }
    lines.push(format!("expires {}", p.expiration));
    for group in FieldGroup::iter() {
        let fields: Vec<_> = p.group(group).collect();
        if fields.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(group.title().to_owned());
        for f in fields {
            let marker = if f.overridden { " *" } else { "" };
            lines.push(format!("  {}: {}{marker}", f.label, f.value));
        }
    }
    lines.join("\n")
}

pub fn print_preview(preview: &CardPreview, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, preview, preview_text, |p| p.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Offline handlers ────────────────────────────────────────────────

#[derive(Serialize)]
struct ValidationReport<'a> {
    file: String,
    policy: ValidationPolicy,
    valid: bool,
    name: &'a str,
    fields: usize,
}

/// Commands that work on local files without a backend session.
pub fn is_offline(cmd: &TemplatesCommand) -> bool {
    matches!(
        cmd,
        TemplatesCommand::Validate { .. } | TemplatesCommand::Preview { file: Some(_), .. }
    )
}

pub fn handle_offline(cmd: TemplatesCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        TemplatesCommand::Validate { file, policy } => {
            let draft: TemplateDraft = util::read_json_file(&file)?;
            let policy = ValidationPolicy::from(policy);
            policy.validate(&draft).map_err(passdeck_core::CoreError::from)?;
            let report = ValidationReport {
                file: file.display().to_string(),
                policy,
                valid: true,
                name: &draft.name,
                fields: draft.fields.len(),
            };
            let out = output::render_single(
                global.output,
                &report,
                |r| format!("{} is valid ({} rules)", r.file, r.policy),
                |r| r.valid.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TemplatesCommand::Preview {
            file: Some(file), ..
        } => {
            let draft: TemplateDraft = util::read_json_file(&file)?;
            let preview = CardPreview::for_draft(&draft).map_err(passdeck_core::CoreError::from)?;
            print_preview(&preview, global)
        }

        _ => Err(CliError::Validation {
            field: "command".into(),
            reason: "this templates command needs a backend".into(),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: TemplatesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TemplatesCommand::List {
            archived,
            pass_type,
            search,
        } => {
            let filter = TemplateFilter {
                include_archived: archived,
                pass_type: pass_type.map(Into::into),
                search,
            };
            let templates = dashboard.list_templates(&filter).await?;
            let out = output::render_list(global.output, &templates, |t| TemplateRow::from(t), |t| {
                t.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TemplatesCommand::Get { id } => {
            let template = dashboard.get_template(&util::entity_id(&id)).await?;
            print_template(&template, global)
        }

        TemplatesCommand::Create {
            name,
            description,
            pass_type,
            designer,
            from_file,
            policy,
        } => {
            let draft = if let Some(ref path) = from_file {
                util::read_json_file(path)?
            } else {
                let name = name.unwrap_or_default();
                let mut draft = if designer {
                    TemplateDraft::designer(name)
                } else {
                    TemplateDraft::new(name)
                };
                draft.description = description;
                draft.pass_type = pass_type.into();
                draft
            };
            let created = dashboard.create_template(&draft, policy.into()).await?;
            util::note(global, &format!("Created template '{}'", created.name));
            print_template(&created, global)
        }

        TemplatesCommand::Update {
            id,
            name,
            description,
            active,
            archived,
            from_file,
            policy,
        } => {
            let id = util::entity_id(&id);
            let mut draft = if let Some(ref path) = from_file {
                util::read_json_file(path)?
            } else {
                dashboard.get_template(&id).await?.to_draft()
            };
            if let Some(name) = name {
                draft.name = name;
            }
            if description.is_some() {
                draft.description = description;
            }
            if let Some(active) = active {
                draft.is_active = active;
            }
            if let Some(archived) = archived {
                draft.is_archived = archived;
            }
            let updated = dashboard.update_template(&id, &draft, policy.into()).await?;
            util::note(global, &format!("Updated template '{}'", updated.name));
            print_template(&updated, global)
        }

        TemplatesCommand::Duplicate { id } => {
            let copy = dashboard.duplicate_template(&util::entity_id(&id)).await?;
            util::note(global, &format!("Created '{}'", copy.name));
            print_template(&copy, global)
        }

        TemplatesCommand::Delete { id } => {
            let id = util::entity_id(&id);
            if !util::confirm(&format!("Delete template {id}?"), "templates delete", global)? {
                return Ok(());
            }
            dashboard.delete_template(&id).await?;
            util::note(global, &format!("Deleted template {id}"));
            Ok(())
        }

        TemplatesCommand::Preview { id, .. } => {
            let Some(id) = id else {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: "a template ID or --file is required".into(),
                });
            };
            let preview = dashboard.preview_template(&util::entity_id(&id)).await?;
            print_preview(&preview, global)
        }

        TemplatesCommand::Fields(args) => handle_fields(dashboard, args, global).await,

        cmd @ TemplatesCommand::Validate { .. } => handle_offline(cmd, global),
    }
}

async fn handle_fields(
    dashboard: &Dashboard,
    args: FieldsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FieldsCommand::List { id } => {
            let template = dashboard.get_template(&util::entity_id(&id)).await?;
            print_fields(&template, global)
        }

        FieldsCommand::Add {
            id,
            group,
            label,
            value,
            key,
            field_type,
            align,
        } => {
            let field = NewField {
                key,
                label,
                value,
                field_type: field_type.into(),
                text_alignment: align.into(),
            };
            let group = FieldGroup::from(group);
            let (template, key) = dashboard
                .add_template_field(&util::entity_id(&id), group, field)
                .await?;
            util::note(global, &format!("Added field '{key}' to {}", group.title()));
            print_fields(&template, global)
        }

        FieldsCommand::Remove { id, group, index } => {
            let group = FieldGroup::from(group);
            let (template, removed) = dashboard
                .remove_template_field(&util::entity_id(&id), group, index)
                .await?;
            util::note(
                global,
                &format!("Removed field '{}' from {}", removed.key, group.title()),
            );
            print_fields(&template, global)
        }
    }
}

fn print_template(template: &Template, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, template, detail, |t| t.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_fields(template: &Template, global: &GlobalOpts) -> Result<(), CliError> {
    let rows = field_rows(&template.fields);
    let out = output::render_list(global.output, &rows, FieldRow::clone, |r| r.key.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
