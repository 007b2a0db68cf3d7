//! Command dispatch: bridges CLI args -> Dashboard calls -> output formatting.

pub mod campaigns;
pub mod colors;
pub mod config_cmd;
pub mod customers;
pub mod passes;
pub mod session;
pub mod templates;
pub mod util;

use passdeck_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler. The
/// session is already established.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => session::whoami(dashboard, global),
        Command::Templates(args) => templates::handle(dashboard, args, global).await,
        Command::Passes(args) => passes::handle(dashboard, args, global).await,
        Command::Customers(args) => customers::handle(dashboard, args, global).await,
        Command::Campaigns(args) => campaigns::handle(dashboard, args, global).await,
        // Offline and session commands are handled before dispatch
        Command::Login(_)
        | Command::Logout
        | Command::Register(_)
        | Command::Colors(_)
        | Command::Config(_)
        | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "command does not need a backend session".into(),
        }),
    }
}
