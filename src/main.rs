//! Command-line front end for the requirements engine.

mod cli;

use clap::Parser;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
