mod commands;
mod listener;

use clap::{Parser, Subcommand};
use commands::CommandError;
use nsreg_common::PlayerId;
use nsreg_kernel::Registry;
use nsreg_persist::RegistryStore;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nsreg", about = "Manage namespaces, their owners and members")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Registry document, loaded at start and saved at exit
    #[arg(long, env = "NSREG_STORE", default_value = "namespace.yaml", global = true)]
    store: PathBuf,

    /// Identity of the player issuing the command
    #[arg(long = "as", value_name = "UUID", global = true)]
    sender: Option<PlayerId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a namespace owned by the sender
    Create { name: String },
    /// Add a member to a namespace (sender must be an admin)
    Add {
        namespace: String,
        target: PlayerId,
        /// "admin" or "user", any case
        role: String,
    },
    /// Remove a member from a namespace (sender must be an admin)
    Del { namespace: String, target: PlayerId },
    /// Change a member's role (sender must be an admin)
    Role {
        namespace: String,
        target: PlayerId,
        role: String,
    },
    /// List the members of a namespace
    List { namespace: String },
    /// List namespaces: those of --member, else of the sender, else all
    Ls {
        #[arg(long, value_name = "UUID")]
        member: Option<PlayerId>,
    },
    /// Report a player joining; enrolls them in a personal namespace if they have none
    Join { player: PlayerId, display_name: String },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    execute(cli, &mut std::io::stdout().lock())
}

/// One host lifecycle: load, run the command, report to `out`, save.
///
/// A failed load returns early and the document is left untouched. A failed
/// save is logged and does not change the command's exit status.
fn execute(cli: Cli, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let store = RegistryStore::open(&cli.store);
    let mut registry = store.load().map_err(|e| {
        anyhow::anyhow!("failed to load registry from {}: {e}", cli.store.display())
    })?;

    let status = match run(cli.command, cli.sender, &mut registry) {
        Ok(message) => {
            writeln!(out, "{message}")?;
            ExitCode::SUCCESS
        }
        Err(e) => {
            writeln!(out, "{e}")?;
            ExitCode::FAILURE
        }
    };

    if let Err(e) = store.save(&registry) {
        tracing::error!("failed to save registry: {e}");
    }

    Ok(status)
}

/// Execute one command against the registry and return the text to show.
fn run(
    command: Commands,
    sender: Option<PlayerId>,
    registry: &mut Registry,
) -> Result<String, CommandError> {
    let require_sender = || sender.ok_or(CommandError::SenderRequired);
    match command {
        Commands::Create { name } => {
            let name = commands::create(registry, &name, require_sender()?)?;
            Ok(format!("created namespace {name}"))
        }
        Commands::Add {
            namespace,
            target,
            role,
        } => {
            commands::add_member(registry, &namespace, require_sender()?, target, &role)?;
            Ok("ok!".to_string())
        }
        Commands::Del { namespace, target } => {
            commands::del_member(registry, &namespace, require_sender()?, target)?;
            Ok("ok!".to_string())
        }
        Commands::Role {
            namespace,
            target,
            role,
        } => {
            commands::set_role(registry, &namespace, require_sender()?, target, &role)?;
            Ok("ok!".to_string())
        }
        Commands::List { namespace } => {
            let members = commands::list_members(registry, &namespace)?;
            Ok(commands::render_members(&namespace, &members))
        }
        Commands::Ls { member } => {
            let who = member.or(sender);
            let names = commands::list_namespaces(registry, who);
            let heading = who.map_or_else(|| "all".to_string(), |id| id.to_string());
            Ok(commands::render_namespaces(&heading, &names))
        }
        Commands::Join {
            player,
            display_name,
        } => match listener::on_player_join(registry, player, &display_name)? {
            Some(name) => Ok(format!("enrolled {player} in namespace {name}")),
            None => Ok(format!("{player} already belongs to a namespace")),
        },
    }
}
