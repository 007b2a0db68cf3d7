//! `colors contrast`: which text color reads on a background.

use serde::Serialize;
use tabled::Tabled;

use passdeck_core::Rgb;

use crate::cli::{ColorsArgs, ColorsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Clone, Serialize, Tabled)]
struct ContrastRow {
    #[tabled(rename = "Background")]
    background: String,
    #[tabled(rename = "Brightness")]
    brightness: u32,
    #[tabled(rename = "Text")]
    text: &'static str,
}

fn contrast_rows(colors: &[String]) -> Result<Vec<ContrastRow>, CliError> {
    colors
        .iter()
        .map(|raw| {
            let rgb = Rgb::from_hex(raw.trim()).map_err(|e| CliError::Validation {
                field: raw.clone(),
                reason: e.to_string(),
            })?;
            Ok(ContrastRow {
                background: raw.trim().to_owned(),
                brightness: rgb.brightness(),
                text: rgb.contrast_text(),
            })
        })
        .collect()
}

pub fn handle(args: ColorsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ColorsCommand::Contrast { colors } => {
            let rows = contrast_rows(&colors)?;
            let out = output::render_list(global.output, &rows, ContrastRow::clone, |r| {
                format!("{} {}", r.background, r.text)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
