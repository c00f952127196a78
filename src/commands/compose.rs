use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::{Cli, ComposeMode};
use crate::compose::{
    compose_with, ComposeOptions, OverlayOptions, ScalePair, SideBySideOptions,
};
use crate::config::Config;
use crate::icon::{find_badge, load_buffer, scaled_path, write_png};
use crate::pixel::PixelBuffer;
use crate::silhouette::SilhouetteOptions;

pub struct ComposeArgs {
    pub base: PathBuf,
    pub base_2x: PathBuf,
    pub badge: Option<PathBuf>,
    pub badge_dir: Option<PathBuf>,
    pub out: PathBuf,
    pub mode: Option<ComposeMode>,
}

pub async fn run(cli: &Cli, args: ComposeArgs) -> Result<()> {
    // The config file is optional for `compose`; defaults apply without one.
    let (options, silhouette) = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        (config.compose_options(), config.silhouette)
    } else {
        (ComposeOptions::default(), SilhouetteOptions::default())
    };
    let options = apply_mode(options, args.mode);

    let badge_path = resolve_badge(args.badge.as_deref(), args.badge_dir.as_deref());
    match &badge_path {
        Some(path) => println!("{} Badge: {}", "ℹ".blue(), path.display()),
        None => println!(
            "{} No badge found; writing the base icons unchanged.",
            "!".yellow()
        ),
    }

    let base_1x = load_buffer(&args.base)?;
    let base_2x = load_buffer(&args.base_2x)?;
    let badge = match &badge_path {
        Some(path) => Some(load_buffer(path)?),
        None => None,
    };

    let pair = compose_pair(base_1x, base_2x, badge, options, silhouette).await?;

    let out_2x = scaled_path(&args.out, 2);
    write_png(&pair.x1, &args.out)?;
    println!(
        "{} Wrote {} ({}x{})",
        "✓".green(),
        args.out.display(),
        pair.x1.width(),
        pair.x1.height()
    );
    write_png(&pair.x2, &out_2x)?;
    println!(
        "{} Wrote {} ({}x{})",
        "✓".green(),
        out_2x.display(),
        pair.x2.width(),
        pair.x2.height()
    );

    Ok(())
}

/// Composes the 1x and 2x outputs on the blocking pool at the same time, each
/// from its own base. Without a badge the bases are returned unchanged.
pub async fn compose_pair(
    base_1x: PixelBuffer,
    base_2x: PixelBuffer,
    badge: Option<PixelBuffer>,
    options: ComposeOptions,
    silhouette: SilhouetteOptions,
) -> Result<ScalePair> {
    let Some(badge) = badge else {
        return Ok(ScalePair {
            x1: base_1x,
            x2: base_2x,
        });
    };

    let badge = Arc::new(badge);
    let options = Arc::new(options);
    let silhouette = Arc::new(silhouette);

    let spawn = |base: PixelBuffer| {
        let badge = Arc::clone(&badge);
        let options = Arc::clone(&options);
        let silhouette = Arc::clone(&silhouette);
        tokio::task::spawn_blocking(move || compose_with(&base, &badge, &options, &silhouette))
    };

    let (x1, x2) =
        tokio::try_join!(spawn(base_1x), spawn(base_2x)).context("Compose task failed")?;
    Ok(ScalePair { x1, x2 })
}

/// An explicit badge wins; otherwise the directory is probed. A badge path
/// that does not exist counts as no badge.
pub fn resolve_badge(badge: Option<&Path>, badge_dir: Option<&Path>) -> Option<PathBuf> {
    match (badge, badge_dir) {
        (Some(path), _) => path.is_file().then(|| path.to_path_buf()),
        (None, Some(dir)) => find_badge(dir),
        (None, None) => None,
    }
}

/// Switches mode on the CLI's request, keeping the configured options when
/// the mode already matches.
pub fn apply_mode(options: ComposeOptions, mode: Option<ComposeMode>) -> ComposeOptions {
    match (mode, options) {
        (Some(ComposeMode::Overlay), ComposeOptions::SideBySide(_)) => {
            ComposeOptions::Overlay(OverlayOptions::default())
        }
        (Some(ComposeMode::SideBySide), ComposeOptions::Overlay(_)) => {
            ComposeOptions::SideBySide(SideBySideOptions::default())
        }
        (_, options) => options,
    }
}
