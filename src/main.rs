//! `qa`: browse and interact with an in-memory Q&A board from the terminal.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
