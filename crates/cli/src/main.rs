mod cli;
mod run;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::debug;

use kebiao_core::config::load_dotenv;
use kebiao_core::Config;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    // Logs go to stderr so `show --json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(path) = args.timetable {
        config.timetable.path = path;
    }

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    debug!(%today, profile = config.profile_label(), "starting");

    match args.command {
        Command::Show { json } => run::show(&config, today, json),
        Command::Push {
            dry_run,
            no_weather,
        } => run::push(&config, today, dry_run, no_weather).await,
        Command::TestNotify { channel } => run::test_notify(&config, channel).await,
        Command::Config => run::print_config(&config),
    }
}
