use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "iconforge",
    about = "Derive app, tray, and badge icon assets from flat raster artwork"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true, default_value = "iconforge.toml")]
    pub config: PathBuf,

    /// Print pipeline diagnostics (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new iconforge.toml config file
    Init,

    /// Render the configured icon targets
    Generate {
        /// Show what would be rendered without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Only render specific targets (comma-separated)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<TargetKind>>,

        /// Re-render even when sources and settings are unchanged
        #[arg(long)]
        force: bool,
    },

    /// Compose a badge onto a 1x/2x base icon pair
    Compose {
        /// Base icon at 1x
        #[arg(long)]
        base: PathBuf,

        /// Base icon at 2x
        #[arg(long)]
        base_2x: PathBuf,

        /// Badge image
        #[arg(long, conflicts_with = "badge_dir")]
        badge: Option<PathBuf>,

        /// Directory searched for badge.png, then icon.png
        #[arg(long)]
        badge_dir: Option<PathBuf>,

        /// Output path for the 1x image; the 2x image gets an @2x suffix
        #[arg(long)]
        out: PathBuf,

        /// Override the composition mode from the config
        #[arg(long)]
        mode: Option<ComposeMode>,
    },

    /// Check config validity and whether outputs are up to date
    Check,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum TargetKind {
    App,
    Tray,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ComposeMode {
    Overlay,
    SideBySide,
}
