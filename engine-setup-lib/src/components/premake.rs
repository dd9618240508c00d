use crate::archive::archive_extension;
use crate::config::Config;
use crate::error::SetupError;
use crate::github::build_versioned_download_url;
use crate::installer::{Acquisition, Component};
use crate::manifest::ExpectedFileManifest;
use crate::platform::PlatformType;
use std::path::PathBuf;

pub const PREMAKE_OWNER: &str = "premake";
pub const PREMAKE_REPO: &str = "premake-core";

/// The Premake build-file generator, shipped as a single executable per platform.
pub struct Premake {
    version: semver::Version,
}

impl Premake {
    pub fn new(config: &Config) -> Self {
        Self {
            version: config.premake_version.clone(),
        }
    }

    pub fn with_version(version: semver::Version) -> Self {
        Self { version }
    }

    /// Release asset name, e.g. `premake-5.0.0-beta2-linux.tar.gz`.
    pub fn release_file_name(&self, platform: PlatformType) -> String {
        let suffix = match platform {
            PlatformType::Windows => "windows.zip",
            PlatformType::Linux => "linux.tar.gz",
            PlatformType::MacOS => "macosx.tar.gz",
        };
        format!("premake-{}-{}", self.version, suffix)
    }

    pub fn download_url(&self, platform: PlatformType) -> String {
        build_versioned_download_url(
            PREMAKE_OWNER,
            PREMAKE_REPO,
            &self.version.to_string(),
            &self.release_file_name(platform),
        )
    }

    pub fn executable_name(platform: PlatformType) -> String {
        format!("premake5{}", platform.executable_suffix())
    }
}

impl Component for Premake {
    fn name(&self) -> &str {
        "Premake"
    }

    fn install_dir(&self, config: &Config, platform: PlatformType) -> PathBuf {
        config
            .binaries_dir
            .join("premake")
            .join(self.version.to_string())
            .join(platform.name())
    }

    fn manifest(&self, platform: PlatformType) -> ExpectedFileManifest {
        ExpectedFileManifest::new([Self::executable_name(platform)])
    }

    fn acquisition(
        &self,
        config: &Config,
        platform: PlatformType,
    ) -> Result<Acquisition, SetupError> {
        let file_name = self.release_file_name(platform);
        let install_dir = self.install_dir(config, platform);
        Ok(Acquisition::Archive {
            url: self.download_url(platform),
            archive_path: PathBuf::from(format!(
                "{}.{}",
                install_dir.display(),
                archive_extension(&file_name)
            )),
        })
    }

    #[cfg(unix)]
    fn finalize(
        &self,
        install_dir: &std::path::Path,
        platform: PlatformType,
    ) -> Result<(), SetupError> {
        use std::os::unix::fs::PermissionsExt;

        let executable = install_dir.join(Self::executable_name(platform));
        if executable.is_file() {
            let mut perms = std::fs::metadata(&executable)?.permissions();
            perms.set_mode(perms.mode() | 0o755);
            std::fs::set_permissions(&executable, perms)?;
        }
        Ok(())
    }
}

/// Whether a complete Premake install exists for the configured version.
pub fn premake_exists(config: &Config) -> bool {
    let Some(platform) = config.platform else {
        return false;
    };
    let premake = Premake::new(config);
    premake
        .manifest(platform)
        .is_satisfied(&premake.install_dir(config, platform))
}

/// Path of the Premake executable a project-generation step should invoke.
pub fn premake_executable_path(config: &Config) -> Option<PathBuf> {
    let platform = config.platform?;
    let premake = Premake::new(config);
    Some(
        premake
            .install_dir(config, platform)
            .join(Premake::executable_name(platform)),
    )
}
