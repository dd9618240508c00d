use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::Args;
use engine_setup_lib::components::{Premake, VulkanSdk};
use engine_setup_lib::config::Config;
use engine_setup_lib::installer::{Component, probe_status};

#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = Config::load(global_args.root.as_deref())?;
        let platform = config.require_platform()?;

        ui::info(&format!("Binaries directory: {}", config.binaries_dir.display()));

        let premake = Premake::new(&config);
        ui::info(&ui::status_line(
            premake.name(),
            probe_status(&premake, &config, platform),
        ));

        let vulkan = VulkanSdk::new(&config);
        ui::info(&ui::status_line(
            vulkan.name(),
            probe_status(&vulkan, &config, platform),
        ));

        Ok(())
    }
}
