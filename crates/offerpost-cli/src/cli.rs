use std::path::PathBuf;

use clap::{Parser, Subcommand};
use offerpost_core::config::{DEFAULT_LEDGER_PATH, DEFAULT_OFFERS_PATH};

pub const DEFAULT_LOG_PATH: &str = "bot/bot.log";

#[derive(Parser, Debug)]
#[command(
    name = "offerpost",
    version,
    about = "Publish scraped offers to a Facebook page"
)]
pub struct Cli {
    /// Pending offers written by the scraper
    #[arg(long, global = true, default_value = DEFAULT_OFFERS_PATH)]
    pub offers_file: PathBuf,

    /// Published-history ledger
    #[arg(long, global = true, default_value = DEFAULT_LEDGER_PATH)]
    pub ledger_file: PathBuf,

    /// Log file (also logged to stdout)
    #[arg(long, global = true, default_value = DEFAULT_LOG_PATH)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Startup pass, then watch the offers file and run every 12h until Ctrl-C
    #[default]
    Run,
    /// Process the offers file once and print the summary
    Once,
    /// Print ledger entries as JSON lines
    History,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.unwrap_or_default()
    }
}
