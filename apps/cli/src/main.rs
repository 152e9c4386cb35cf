//! Limitrofe CLI: look up which municipalities border a given one.
//!
//! Loads the adjacency CSV (remote or local), lists the municipalities it
//! knows and answers "neighbors of X" queries.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
