use crate::error::SetupError;
use crate::platform::{PlatformType, resolve_platform};
use crate::release_version::ReleaseVersion;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "engine-setup.toml";
pub const DEFAULT_BINARIES_DIR: &str = "External/Binaries";
pub const DEFAULT_PREMAKE_VERSION: &str = "5.0.0-beta2";
pub const DEFAULT_VULKAN_VERSION: ReleaseVersion = ReleaseVersion::new(1, 3, 268, 0);

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the engine checkout
    pub root_dir: PathBuf,

    /// Directory holding one subdirectory per installed component
    pub binaries_dir: PathBuf,

    /// User home, where some vendor installers put their files
    pub home_dir: Option<PathBuf>,

    /// Resolved once per run; `None` on hosts we do not provision.
    pub platform: Option<PlatformType>,

    pub premake_version: semver::Version,

    pub vulkan_version: ReleaseVersion,
}

/// On-disk layout of `engine-setup.toml`.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub binaries_dir: Option<PathBuf>,
    pub premake: Option<VersionSection<String>>,
    pub vulkan: Option<VersionSection<ReleaseVersion>>,
}

/// `[premake]` / `[vulkan]` toml sections.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct VersionSection<V> {
    pub version: Option<V>,
}

impl Config {
    pub fn new_for_root(root_dir: &Path) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            binaries_dir: root_dir.join(DEFAULT_BINARIES_DIR),
            home_dir: dirs::home_dir(),
            platform: resolve_platform(),
            premake_version: semver::Version::parse(DEFAULT_PREMAKE_VERSION)
                .unwrap_or_else(|_| semver::Version::new(5, 0, 0)),
            vulkan_version: DEFAULT_VULKAN_VERSION,
        }
    }

    /// Builds the config for `root_dir` (the current directory when `None`),
    /// applying `engine-setup.toml` from that directory if it exists.
    pub fn load(root_dir: Option<&Path>) -> Result<Self, SetupError> {
        let root_dir = match root_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let mut config = Self::new_for_root(&root_dir);

        let config_path = root_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            tracing::debug!("Reading {}", config_path.display());
            let content = fs::read_to_string(&config_path)?;
            let file = toml::from_str::<ConfigFile>(&content).map_err(|e| {
                SetupError::Config(format!("{}: {}", config_path.display(), e))
            })?;
            config.apply(file)?;
        }

        Ok(config)
    }

    fn apply(&mut self, file: ConfigFile) -> Result<(), SetupError> {
        if let Some(binaries_dir) = file.binaries_dir {
            self.binaries_dir = self.root_dir.join(binaries_dir);
        }
        if let Some(version) = file.premake.and_then(|s| s.version) {
            self.premake_version = semver::Version::parse(&version).map_err(|e| {
                SetupError::Config(format!("Invalid premake version '{version}': {e}"))
            })?;
        }
        if let Some(version) = file.vulkan.and_then(|s| s.version) {
            self.vulkan_version = version;
        }
        Ok(())
    }

    /// Overrides where components are installed, e.g. from a positional argument.
    pub fn with_binaries_dir(self, binaries_dir: &Path) -> Self {
        Self {
            binaries_dir: binaries_dir.to_path_buf(),
            ..self
        }
    }

    pub fn require_platform(&self) -> Result<PlatformType, SetupError> {
        self.platform.ok_or_else(SetupError::unsupported_host)
    }
}
