use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::config::Config;
use crate::lockfile::Lockfile;
use crate::plan::{build_render_plan, Action};

pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    println!("{} Config is valid ({})", "✓".green(), cli.config.display());

    if config.app.is_none() && config.tray.is_none() {
        println!(
            "{} No [app] or [tray] target configured; only `iconforge compose` will use this file.",
            "ℹ".blue()
        );
        return Ok(());
    }

    let config_dir = cli.config.parent().unwrap_or(Path::new("."));
    let lockfile_path = config_dir.join(crate::lockfile::LOCKFILE_NAME);

    if !lockfile_path.exists() {
        println!(
            "{} No lockfile found. Run `iconforge generate` to create one.",
            "!".yellow()
        );
        return Ok(());
    }

    let lockfile = Lockfile::load(&lockfile_path)?;
    println!(
        "{} Lockfile is valid ({})",
        "✓".green(),
        lockfile_path.display()
    );

    let plan = build_render_plan(&config, &lockfile, config_dir)?;

    for warning in &plan.warnings {
        println!("{} {}", "!".yellow(), warning);
    }

    let mut stale = 0;
    for target in &plan.targets {
        match &target.action {
            Action::Create => {
                stale += 1;
                println!("  {} {} (never rendered)", "+".green(), target.name);
            }
            Action::Update { changes } => {
                stale += 1;
                println!("  {} {}", "~".yellow(), target.name);
                for change in changes {
                    println!("      {}", change);
                }
            }
            Action::Skip => {}
        }
    }

    if stale == 0 {
        println!("{} All outputs are up to date.", "✓".green());
    } else {
        println!(
            "{} {} target(s) out of date. Run `iconforge generate`.",
            "!".yellow(),
            stale
        );
    }

    Ok(())
}
