use crate::error::SetupError;
use std::path::{Path, PathBuf};

/// Relative paths that must all exist under an install directory for it to
/// count as a complete installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFileManifest {
    files: Vec<PathBuf>,
}

impl ExpectedFileManifest {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for file in files {
            let file = file.into();
            if !unique.contains(&file) {
                unique.push(file);
            }
        }
        Self { files: unique }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Entries absent under `root`, in manifest order.
    pub fn missing(&self, root: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|file| !root.join(file).exists())
            .cloned()
            .collect()
    }

    /// An empty manifest is never satisfied; the root must exist too.
    pub fn is_satisfied(&self, root: &Path) -> bool {
        !self.files.is_empty() && root.is_dir() && self.missing(root).is_empty()
    }

    pub fn verify(&self, component: &str, root: &Path) -> Result<(), SetupError> {
        let missing = if root.is_dir() {
            self.missing(root)
        } else {
            self.files.clone()
        };
        if missing.is_empty() && !self.files.is_empty() {
            return Ok(());
        }
        Err(SetupError::Manifest {
            component: component.to_string(),
            missing,
        })
    }
}
