use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Result, bail};
use clap::Args;
use engine_setup_lib::components::VulkanSdk;
use engine_setup_lib::config::Config;
use engine_setup_lib::github::ReleaseClient;
use engine_setup_lib::installer::{Component, install_component};
use engine_setup_lib::launcher::SystemHost;

#[derive(Args)]
pub struct VulkanCommand {
    /// Re-run the install even if the SDK is already in place
    #[arg(long = "override")]
    pub override_install: bool,

    /// Launch the SDK installer without asking
    #[arg(long, short)]
    pub yes: bool,
}

impl VulkanCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::load(global_args.root.as_deref())?;
        let platform = config.require_platform()?;
        let client = ReleaseClient::new()?;
        let host = SystemHost::new(platform, self.yes);

        let vulkan = VulkanSdk::new(&config);
        let result =
            install_component(&config, &vulkan, &client, &host, self.override_install).await;
        if !ui::report_install(vulkan.name(), &result) {
            bail!("Failed to install {}", vulkan.name());
        }
        Ok(())
    }
}
