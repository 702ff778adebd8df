//! Binary crate for the `forecast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive city/date form
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod output;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    let log_level = if cmd.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).with_writer(std::io::stderr).init();

    cmd.run()
}
