//! # Lottery API Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load configuration (--config, platform config dir, or defaults)
//!   ├─> Initialize logging (stderr, plus rolling files with --log-dir)
//!   └─> Execute the subcommand
//! ```
//!
//! ```bash
//! lottery-api convert federal.csv v1/lotteries/federal/draws federal
//! lottery-api index v1/lotteries/federal/draws
//! lottery-api update-latest result.json --lottery federal
//! ```
//!
//! Any returned error exits with a non-zero status.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use lottery_api::config::ApiConfig;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut config =
        ApiConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.log_dir {
        config.logging.log_dir = Some(dir);
    }

    lottery_api::logging::init(&config.logging)?;

    cli::run_command(cli.command, &config)
}
