mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use passdeck_config::KeyringTokenStore;
use passdeck_core::Dashboard;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr so structured stdout stays parseable.
/// `PASSDECK_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if std::env::var("PASSDECK_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;
    match cli.command {
        // ── Offline commands ─────────────────────────────────────────
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "passdeck", &mut std::io::stdout());
            Ok(())
        }

        Command::Colors(args) => commands::colors::handle(args, &global),

        Command::Templates(args) if commands::templates::is_offline(&args.command) => {
            commands::templates::handle_offline(args.command, &global)
        }

        Command::Logout => commands::session::logout(&global),

        // ── Backend commands ─────────────────────────────────────────
        cmd => {
            let (dashboard, profile_name) = build_dashboard(&global)?;
            match cmd {
                Command::Login(args) => {
                    commands::session::login(&dashboard, args, &global, &profile_name).await
                }
                Command::Register(args) => {
                    commands::session::register(&dashboard, args, &global).await
                }
                cmd => {
                    let user = commands::util::with_spinner(
                        "Connecting",
                        &global,
                        dashboard.connect(),
                    )
                    .await?;
                    tracing::debug!(email = %user.email, command = ?cmd, "dispatching command");
                    commands::dispatch(cmd, &dashboard, &global).await
                }
            }
        }
    }
}

/// Build a `Dashboard` for the active profile with its keyring-backed
/// session store.
fn build_dashboard(global: &GlobalOpts) -> Result<(Dashboard, String), CliError> {
    let cfg = passdeck_config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let dashboard_config = config::dashboard_config(global, &cfg, &profile_name)?;
    let store = KeyringTokenStore::new(profile_name.clone());
    let dashboard = Dashboard::new(dashboard_config, Box::new(store))?;
    Ok((dashboard, profile_name))
}
