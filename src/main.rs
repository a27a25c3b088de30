use std::os::unix::fs::MetadataExt;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

mod bundle;
mod catalog;
mod config;
mod distro;
mod git;
mod logging;
mod process;
mod selfupdate;
mod system;
mod tui;
mod ui;

#[derive(Parser)]
#[command(name = "mypctools")]
#[command(about = "A personal TUI for managing scripts and apps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update binary and scripts to latest version
    Update,
}

fn running_as_root() -> bool {
    std::fs::metadata("/proc/self")
        .map(|m| m.uid() == 0)
        .unwrap_or(false)
}

fn update() -> Result<()> {
    ui::print_banner(env!("CARGO_PKG_VERSION"));
    let root = config::locate_root_dir();
    selfupdate::run_blocking(&root)?;
    ui::print_outro("Update complete! Run 'mypctools' to start.");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("{} {:#}", "Warning: logging disabled:".yellow(), e);
    }

    match cli.command {
        Some(Commands::Update) => {
            if let Err(e) = update() {
                ui::print_error(&format!("Update failed: {:#}", e));
                tracing::error!(error = %format!("{:#}", e), "update failed");
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            if running_as_root() {
                bail!("Do not run as root. Use your normal user.");
            }
            // Full-screen TUI is the default.
            tui::run_tui(config::locate_root_dir())
        }
    }
}
