use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    fetch_release::FetchReleaseCommand, premake::PremakeCommand, setup::SetupCommand,
    status::StatusCommand, vulkan::VulkanCommand,
};

#[derive(Parser)]
#[command(name = "engine-setup")]
#[command(about = "Fetch and install the third-party tooling the engine build needs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Root of the engine checkout (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install every component (Premake, then the Vulkan SDK)
    Setup(SetupCommand),

    /// Install Premake into a binaries directory
    Premake(PremakeCommand),

    /// Install the Vulkan SDK
    Vulkan(VulkanCommand),

    /// Download a GitHub repository's latest release asset and unpack it
    FetchRelease(FetchReleaseCommand),

    /// Show the install status of each component
    Status(StatusCommand),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Setup(cmd) => cmd.run(self.global_args).await,
            Commands::Premake(cmd) => cmd.run(self.global_args).await,
            Commands::Vulkan(cmd) => cmd.run(self.global_args).await,
            Commands::FetchRelease(cmd) => cmd.run(self.global_args).await,
            Commands::Status(cmd) => cmd.run(self.global_args),
        }
    }
}
