use anyhow::Result;
use clap::Parser;
use iconforge::cli::{Cli, Commands};
use iconforge::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match &cli.command {
        Commands::Init => commands::init::run(&cli),
        Commands::Generate {
            dry_run,
            only,
            force,
        } => commands::generate::run(&cli, *dry_run, only.clone(), *force).await,
        Commands::Compose {
            base,
            base_2x,
            badge,
            badge_dir,
            out,
            mode,
        } => {
            let args = commands::compose::ComposeArgs {
                base: base.clone(),
                base_2x: base_2x.clone(),
                badge: badge.clone(),
                badge_dir: badge_dir.clone(),
                out: out.clone(),
                mode: *mode,
            };
            commands::compose::run(&cli, args).await
        }
        Commands::Check => commands::check::run(&cli),
    }
}
