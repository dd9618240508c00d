use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Context, Result};
use clap::Args;
use engine_setup_lib::archive::ExtractOutcome;
use engine_setup_lib::github::{
    ReleaseClient, fetch_release_archive, resolve_latest_release_asset_url,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct FetchReleaseCommand {
    /// Repository owner, e.g. `premake`
    pub owner: String,

    /// Repository name, e.g. `premake-core`
    pub repo: String,

    /// Position of the asset in the latest release's asset list
    #[arg(allow_negative_numbers = true)]
    pub asset_index: i64,

    /// Directory to unpack into; the archive is downloaded next to it
    pub output_path: PathBuf,
}

impl FetchReleaseCommand {
    pub async fn run(self, _global_args: GlobalArgs) -> Result<()> {
        let client = ReleaseClient::new()?;

        let url =
            resolve_latest_release_asset_url(&client, &self.owner, &self.repo, self.asset_index)
                .await
                .context("Failed to get the browser download url")?;
        ui::info(&format!("Resolved {url}"));

        match fetch_release_archive(&client, &url, &self.output_path).await? {
            ExtractOutcome::Extracted(dir) => {
                ui::success(&format!("Unpacked to: {}", dir.display()));
            }
            ExtractOutcome::Skipped => {
                ui::warning("The asset is not a zip or tar.gz archive; it was left as downloaded.");
            }
        }
        Ok(())
    }
}
