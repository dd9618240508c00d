use std::path::PathBuf;
use thiserror::Error;

/// Every fallible step of the setup reports through this type.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error("Failed to resolve download URL: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Failed to download: {0}")]
    Download(#[from] DownloadError),

    #[error("Failed to extract archive '{}': {reason}", .path.display())]
    Extract { path: PathBuf, reason: String },

    #[error("{component} installation is incomplete, missing: {}", display_paths(.missing))]
    Manifest {
        component: String,
        missing: Vec<PathBuf>,
    },

    #[error("{component} needs manual action: {action}")]
    ExternalActionRequired { component: String, action: String },

    #[error("Unsupported platform '{0}'")]
    UnsupportedPlatform(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid progress template: {0}")]
    ProgressTemplate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    /// The provider answered without an `assets` list, usually an error payload.
    #[error("{message}")]
    NoAssets { message: String },

    #[error("asset index {index} is out of range, the release has {len} assets")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("asset {index} has no browser download URL")]
    MissingDownloadUrl { index: usize },

    #[error("malformed release metadata: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// No usable HTTP transport could be constructed.
    #[error("no HTTP transfer capability available: {0}")]
    TransferUnavailable(String),
}

impl From<reqwest::Error> for SetupError {
    fn from(value: reqwest::Error) -> Self {
        SetupError::Download(DownloadError::Network(value))
    }
}

impl SetupError {
    pub fn unsupported_host() -> Self {
        SetupError::UnsupportedPlatform(std::env::consts::OS.to_string())
    }

    pub fn extract(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SetupError::Extract {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
