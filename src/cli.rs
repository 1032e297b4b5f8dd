use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Debug, Parser)]
#[command(
    name = "livestat",
    version,
    about = "Aggregates scraped livestream-presence snapshots into CSV reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deduplicate raw snapshots into the master and per-member CSVs
    Process,
    /// Distinct livestream days per month, one CSV per group
    Monthly,
    /// Pre/post-event activity comparison, one CSV per group
    Prepost,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Process => commands::process::run()?,
        Command::Monthly => commands::monthly::run()?,
        Command::Prepost => commands::prepost::run()?,
    };
    for line in &report.details {
        println!("{line}");
    }
    Ok(())
}
