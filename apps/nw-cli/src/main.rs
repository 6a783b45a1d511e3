//! # nw-cli
//!
//! Command-line interface for Notewell goal sync.
//!
//! Works against the workspace's local goal cache and, when configured,
//! the remote goal store:
//! - `nw goal create/list/show/update/delete` — manage goals
//! - `nw mode` — show whether sync is remote or local-only

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::WorkspaceConfig;

/// Notewell CLI — manage synchronized goals from the terminal.
#[derive(Parser)]
#[command(name = "nw", version, about)]
struct Cli {
    /// Workspace root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    workspace_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Show the current sync availability mode.
    Mode,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let root = cli
        .workspace_root
        .canonicalize()
        .unwrap_or(cli.workspace_root);
    let config = WorkspaceConfig::load(&root)?;
    let engine = config.build_engine()?;

    let result = match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &engine, &config),
        Commands::Mode => {
            println!("{}", engine.availability());
            Ok(())
        }
    };

    // Let any background migration finish before the process exits.
    engine.flush_background();
    result
}
