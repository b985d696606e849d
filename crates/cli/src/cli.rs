use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use kebiao_core::timetable::DATE_FORMAT;

/// Daily timetable push.
///
/// Resolves which courses meet today from a weekly timetable and the
/// semester calendar, then delivers the list (with the local weather)
/// through PushPlus.
#[derive(Parser, Debug)]
#[command(name = "kebiao", version, about = "Push today's classes from a weekly timetable")]
pub struct CliArgs {
    /// Timetable JSON file (overrides TIMETABLE_PATH)
    #[arg(long, global = true)]
    pub timetable: Option<PathBuf>,

    /// Resolve for this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Config profile (overrides KEBIAO_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved schedule
    Show {
        /// Print as JSON instead of a plain listing
        #[arg(long)]
        json: bool,
    },

    /// Render today's message and deliver it
    Push {
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Skip the weather lookup
        #[arg(long)]
        no_weather: bool,
    },

    /// Send a sample message to check channel credentials
    TestNotify {
        /// Only this channel (0 = PushPlus, 1 = webhook when configured)
        #[arg(long)]
        channel: Option<usize>,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
