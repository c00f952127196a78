use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::task::JoinSet;

use crate::cli::{Cli, TargetKind};
use crate::config::{AppIconConfig, Config, TrayIconConfig};
use crate::icon::{encode_ico, load_source, write_bytes, write_png};
use crate::lockfile::Lockfile;
use crate::pipeline::{normalize_source, render_square, SquareIconOptions};
use crate::pixel::PixelBuffer;
use crate::plan::{build_render_plan, Action, TargetAction, APP_TARGET, TRAY_TARGET};

pub async fn run(
    cli: &Cli,
    dry_run: bool,
    only: Option<Vec<TargetKind>>,
    force: bool,
) -> Result<()> {
    let config = Config::load(&cli.config)?;
    let config_dir = cli.config.parent().unwrap_or(Path::new("."));
    let lockfile_path = config_dir.join(crate::lockfile::LOCKFILE_NAME);
    let mut lockfile = Lockfile::load(&lockfile_path)?;
    lockfile.version = 1;

    let plan = build_render_plan(&config, &lockfile, config_dir)?;

    for warning in &plan.warnings {
        println!("{} {}", "!".yellow(), warning);
    }

    if plan.targets.is_empty() {
        println!(
            "{} No [app] or [tray] target configured in {}.",
            "!".yellow(),
            cli.config.display()
        );
        return Ok(());
    }

    let selected =
        |kind: TargetKind| -> bool { only.as_ref().map_or(true, |kinds| kinds.contains(&kind)) };
    let wanted = |target: &TargetAction| -> bool {
        let kind = match target.name.as_str() {
            APP_TARGET => TargetKind::App,
            _ => TargetKind::Tray,
        };
        selected(kind) && (force || !matches!(target.action, Action::Skip))
    };

    if !force && !plan.has_changes() {
        println!("{} Everything is up to date.", "✓".green());
        return Ok(());
    }

    for target in plan.targets.iter().filter(|t| wanted(t)) {
        print_action(target, force);
    }
    println!("\n{}", plan.summary());

    if dry_run {
        println!("\n{} Dry run, nothing written.", "ℹ".blue());
        return Ok(());
    }

    for target in plan.targets.iter().filter(|t| wanted(t)) {
        match target.name.as_str() {
            APP_TARGET => {
                if let Some(app) = &config.app {
                    render_app(&config, app, config_dir).await?;
                }
            }
            TRAY_TARGET => {
                if let Some(tray) = &config.tray {
                    render_tray(&config, tray, config_dir).await?;
                }
            }
            _ => continue,
        }
        lockfile
            .targets
            .insert(target.name.clone(), target.lock.clone());
        // Persist after each target so an interrupted run keeps finished work.
        lockfile.save(&lockfile_path)?;
    }

    println!("\n{} Done.", "✓".green());
    Ok(())
}

fn print_action(target: &TargetAction, force: bool) {
    match &target.action {
        Action::Create => println!("  {} {}", "+".green(), target.name),
        Action::Update { changes } => {
            println!("  {} {}", "~".yellow(), target.name);
            for change in changes {
                println!("      {}", change);
            }
        }
        Action::Skip if force => println!("  {} {} (forced)", "~".yellow(), target.name),
        Action::Skip => println!("  {} {}", "=".dimmed(), target.name),
    }
}

async fn render_app(config: &Config, app: &AppIconConfig, config_dir: &Path) -> Result<()> {
    let source = load_source(&config_dir.join(&app.source))?;
    let options = app.square_options(&config.crop);
    let glyph = normalize_source(&source, &options);

    let sizes: BTreeSet<u32> = app.png_sizes.iter().chain(&app.ico_sizes).copied().collect();
    let rendered = render_sizes(glyph, options, sizes).await?;
    let out_dir = config_dir.join(&app.out_dir);

    for (size, name) in app.png_outputs() {
        let path = out_dir.join(name);
        write_png(&rendered[&size], &path)?;
        println!("{} Wrote {} ({}px)", "✓".green(), path.display(), size);
    }

    if !app.ico_sizes.is_empty() {
        let frames: Vec<PixelBuffer> = app
            .ico_sizes
            .iter()
            .map(|size| rendered[size].clone())
            .collect();
        let path = out_dir.join("icon.ico");
        write_bytes(&encode_ico(&frames)?, &path)?;
        println!(
            "{} Wrote {} ({:?})",
            "✓".green(),
            path.display(),
            app.ico_sizes
        );
    }

    Ok(())
}

async fn render_tray(config: &Config, tray: &TrayIconConfig, config_dir: &Path) -> Result<()> {
    let source = load_source(&config_dir.join(&tray.source))?;
    let options = tray.square_options(&config.crop);
    let glyph = normalize_source(&source, &options);

    let outputs = tray.outputs();
    let sizes = outputs.iter().map(|(size, _)| *size).collect();
    let rendered = render_sizes(glyph, options, sizes).await?;
    let out_dir = config_dir.join(&tray.out_dir);

    for (size, name) in outputs {
        let path = out_dir.join(name);
        write_png(&rendered[&size], &path)?;
        println!("{} Wrote {} ({}px)", "✓".green(), path.display(), size);
    }

    Ok(())
}

/// Renders every size on the blocking pool; sizes share only the read-only glyph.
async fn render_sizes(
    glyph: PixelBuffer,
    options: SquareIconOptions,
    sizes: BTreeSet<u32>,
) -> Result<BTreeMap<u32, PixelBuffer>> {
    let glyph = Arc::new(glyph);
    let options = Arc::new(options);
    let mut tasks = JoinSet::new();

    for size in sizes {
        let glyph = Arc::clone(&glyph);
        let options = Arc::clone(&options);
        tasks.spawn_blocking(move || (size, render_square(&glyph, size, &options)));
    }

    let mut rendered = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (size, buf) = joined.context("Icon render task failed")?;
        rendered.insert(size, buf);
    }
    Ok(rendered)
}
