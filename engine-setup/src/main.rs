mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use engine_setup_lib::logging::initialize_logging;

// Every step is awaited in order; nothing is spawned.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.global_args.verbose);
    cli.run().await
}
