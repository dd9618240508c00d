use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Result, bail};
use clap::Args;
use engine_setup_lib::components::{Premake, VulkanSdk};
use engine_setup_lib::config::Config;
use engine_setup_lib::github::ReleaseClient;
use engine_setup_lib::installer::{Component, install_component};
use engine_setup_lib::launcher::SystemHost;

#[derive(Args)]
pub struct SetupCommand {
    /// Reinstall components even if they are already installed
    #[arg(long = "override")]
    pub override_install: bool,

    /// Launch vendor installers without asking
    #[arg(long, short)]
    pub yes: bool,
}

impl SetupCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::load(global_args.root.as_deref())?;
        let platform = config.require_platform()?;
        let client = ReleaseClient::new()?;
        let host = SystemHost::new(platform, self.yes);

        ui::info(&format!(
            "Setting up {} for {}",
            config.binaries_dir.display(),
            platform
        ));

        // A failing component never stops the ones after it.
        let mut failed = Vec::new();

        let premake = Premake::new(&config);
        let result =
            install_component(&config, &premake, &client, &host, self.override_install).await;
        if !ui::report_install(premake.name(), &result) {
            failed.push(premake.name().to_string());
        }

        let vulkan = VulkanSdk::new(&config);
        let result =
            install_component(&config, &vulkan, &client, &host, self.override_install).await;
        if !ui::report_install(vulkan.name(), &result) {
            failed.push(vulkan.name().to_string());
        }

        if !failed.is_empty() {
            bail!("Setup did not complete for: {}", failed.join(", "));
        }
        ui::success("Setup complete!");
        Ok(())
    }
}
