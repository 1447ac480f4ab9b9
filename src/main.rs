//! Command-line interface for keeping rental dispute case files.

use clap::Parser as _;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
