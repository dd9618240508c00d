use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Result, bail};
use clap::Args;
use engine_setup_lib::components::Premake;
use engine_setup_lib::components::premake::premake_executable_path;
use engine_setup_lib::config::Config;
use engine_setup_lib::github::ReleaseClient;
use engine_setup_lib::installer::{Component, install_component};
use engine_setup_lib::launcher::SystemHost;
use std::path::PathBuf;

#[derive(Args)]
pub struct PremakeCommand {
    /// Binaries directory Premake is installed under
    pub binaries_path: PathBuf,
}

impl PremakeCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config =
            Config::load(global_args.root.as_deref())?.with_binaries_dir(&self.binaries_path);
        let platform = config.require_platform()?;
        let client = ReleaseClient::new()?;
        // Premake is a plain archive, nothing is ever launched or confirmed.
        let host = SystemHost::new(platform, false);

        let premake = Premake::new(&config);
        let result = install_component(&config, &premake, &client, &host, false).await;
        if !ui::report_install(premake.name(), &result) {
            bail!("Failed to install {}", premake.name());
        }

        if let Some(executable) = premake_executable_path(&config) {
            ui::info(&format!("Executable: {}", executable.display()));
        }
        Ok(())
    }
}
