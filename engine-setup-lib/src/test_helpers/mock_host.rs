use crate::error::SetupError;
use crate::launcher::HostActions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Answers every confirmation the same way and records opened paths.
pub struct MockHost {
    answer: bool,
    opened: Mutex<Vec<PathBuf>>,
}

impl MockHost {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

impl HostActions for MockHost {
    fn open(&self, path: &Path) -> Result<(), SetupError> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn confirm(&self, _question: &str) -> bool {
        self.answer
    }
}
