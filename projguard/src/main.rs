//! ProjGuard: keeps unapproved windows off protected (projector)
//! monitors by relocating them back to the primary display.
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
mod app;
mod config_file;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Watches the desktop and moves every window that is not allow-listed off \
                  the protected monitors, back onto the primary display. Runs until \
                  interrupted; use the check subcommand to inspect the detected topology."
)]
struct ProjguardCli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log level filter, e.g. "debug" or "projguard_core=trace".
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    subcommand: Option<ProjguardSubcommand>,
}

#[derive(Debug, Subcommand)]
enum ProjguardSubcommand {
    /// Validate the configuration and print the detected monitor topology
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = ProjguardCli::parse();
    logging::init(&cli.log_level);
    match cli.subcommand {
        Some(ProjguardSubcommand::Check) => app::check(cli.config),
        None => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            // Tray and settings integrations publish AppCommands through
            // this sender; held here so the channel stays open.
            let (_commands, command_rx) = tokio::sync::mpsc::unbounded_channel();
            runtime.block_on(app::run(cli.config, command_rx))
        }
    }
}
