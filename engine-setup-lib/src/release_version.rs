use crate::error::SetupError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static RELEASE_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.(\d+))?$").expect("static regex is valid")
});

/// Four-part vendor version such as the Vulkan SDK's `1.3.268.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub revision: u32,
}

impl ReleaseVersion {
    pub const fn new(major: u32, minor: u32, patch: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            revision,
        }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.revision
        )
    }
}

impl FromStr for ReleaseVersion {
    type Err = SetupError;

    /// Accepts `1`, `1.3`, `1.3.268` and `1.3.268.0` (optionally prefixed with `v`).
    /// Missing components are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SetupError::Config(format!("Invalid release version '{s}'"));
        let caps = RELEASE_VERSION_REGEX.captures(s.trim()).ok_or_else(invalid)?;

        let component = |i: usize| -> Result<u32, SetupError> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| invalid())
                .map(|v| v.unwrap_or(0))
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            revision: component(4)?,
        })
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = SetupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReleaseVersion> for String {
    fn from(value: ReleaseVersion) -> Self {
        value.to_string()
    }
}
