use serde::{Deserialize, Serialize};
use std::fmt;

/// Host operating systems the setup knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    Windows,
    Linux,
    MacOS,
}

impl PlatformType {
    /// Maps a `std::env::consts::OS` style string to a platform.
    pub fn from_os_str(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Self::Windows),
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::MacOS),
            _ => None,
        }
    }

    /// Directory-safe name, also used when namespacing installs per platform.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOS => "MacOS",
        }
    }

    pub fn executable_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Linux | Self::MacOS => "",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves the platform this process was built for.
/// `None` means the host is not one we provision; callers abort the dependent step.
pub fn resolve_platform() -> Option<PlatformType> {
    PlatformType::from_os_str(std::env::consts::OS)
}
