use crate::archive::archive_extension;
use crate::config::Config;
use crate::error::SetupError;
use crate::installer::{Acquisition, Component};
use crate::manifest::ExpectedFileManifest;
use crate::platform::PlatformType;
use crate::release_version::ReleaseVersion;
use std::path::PathBuf;

const LUNARG_DOWNLOAD: &str = "https://sdk.lunarg.com/sdk/download";

/// The LunarG Vulkan SDK. Windows and macOS ship GUI installers the user has
/// to run; the Linux tarball is `.tar.xz`, which we do not unpack.
pub struct VulkanSdk {
    version: ReleaseVersion,
}

impl VulkanSdk {
    pub fn new(config: &Config) -> Self {
        Self {
            version: config.vulkan_version,
        }
    }

    pub fn with_version(version: ReleaseVersion) -> Self {
        Self { version }
    }

    pub fn sdk_url(&self, platform: PlatformType) -> String {
        let v = self.version;
        match platform {
            PlatformType::MacOS => format!("{LUNARG_DOWNLOAD}/{v}/mac/vulkansdk-macos-{v}.dmg"),
            PlatformType::Windows => {
                format!("{LUNARG_DOWNLOAD}/{v}/windows/VulkanSDK-{v}-Installer.exe")
            }
            PlatformType::Linux => {
                format!("{LUNARG_DOWNLOAD}/{v}/linux/vulkansdk-linux-x86_64-{v}.tar.xz")
            }
        }
    }

    fn root_dir(config: &Config) -> PathBuf {
        config.binaries_dir.join("vulkansdk")
    }
}

impl Component for VulkanSdk {
    fn name(&self) -> &str {
        "VulkanSDK"
    }

    fn install_dir(&self, config: &Config, platform: PlatformType) -> PathBuf {
        Self::root_dir(config)
            .join(self.version.to_string())
            .join(platform.name())
    }

    fn manifest(&self, platform: PlatformType) -> ExpectedFileManifest {
        match platform {
            PlatformType::Windows => {
                ExpectedFileManifest::new(["Include/vulkan/vulkan.h", "Lib/vulkan-1.lib"])
            }
            PlatformType::MacOS => {
                ExpectedFileManifest::new(["include/vulkan/vulkan.h", "lib/libvulkan.dylib"])
            }
            PlatformType::Linux => {
                ExpectedFileManifest::new(["include/vulkan/vulkan.h", "lib/libvulkan.so"])
            }
        }
    }

    /// macOS and Linux SDKs live in `~/VulkanSDK/{version}`, Windows in
    /// `C:\VulkanSDK\{version}`.
    fn vendor_install_dir(&self, config: &Config, platform: PlatformType) -> Option<PathBuf> {
        let version = self.version.to_string();
        match platform {
            PlatformType::Windows => Some(PathBuf::from(format!("C:\\VulkanSDK\\{version}"))),
            PlatformType::MacOS | PlatformType::Linux => config
                .home_dir
                .as_ref()
                .map(|home| home.join("VulkanSDK").join(version)),
        }
    }

    fn installer_package_path(&self, config: &Config, platform: PlatformType) -> Option<PathBuf> {
        match platform {
            PlatformType::Windows | PlatformType::MacOS => {
                Some(Self::root_dir(config).join(format!(
                    "vulkan-sdk-installer-{}.{}",
                    self.version,
                    archive_extension(&self.sdk_url(platform))
                )))
            }
            PlatformType::Linux => None,
        }
    }

    fn vendor_subdirs(&self, platform: PlatformType) -> Vec<(PathBuf, PathBuf)> {
        match platform {
            PlatformType::Windows => ["Include", "Lib", "Lib32"]
                .into_iter()
                .map(|dir| (PathBuf::from(dir), PathBuf::from(dir)))
                .collect(),
            PlatformType::MacOS => vec![(PathBuf::from("macOS"), PathBuf::new())],
            PlatformType::Linux => vec![(PathBuf::from("x86_64"), PathBuf::new())],
        }
    }

    fn acquisition(
        &self,
        config: &Config,
        platform: PlatformType,
    ) -> Result<Acquisition, SetupError> {
        let url = self.sdk_url(platform);
        match self.installer_package_path(config, platform) {
            Some(package_path) => Ok(Acquisition::InstallerPackage { url, package_path }),
            None => Ok(Acquisition::Manual {
                instructions: format!(
                    "download the Vulkan SDK {} tarball and extract it into ~/VulkanSDK so that ~/VulkanSDK/{}/x86_64 exists, then run setup again",
                    self.version, self.version
                ),
                url,
            }),
        }
    }
}
