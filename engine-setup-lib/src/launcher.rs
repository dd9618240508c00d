use crate::error::SetupError;
use crate::platform::PlatformType;
use colored::Colorize;
use std::io::BufRead;
use std::path::Path;
use std::process::Command;

/// Host interactions the installers need but must not perform directly, so
/// installation logic stays testable without a console or desktop session.
pub trait HostActions {
    /// Opens `path` with the operating system's default handler.
    fn open(&self, path: &Path) -> Result<(), SetupError>;

    /// Asks a yes/no question; `false` means the user declined.
    fn confirm(&self, question: &str) -> bool;
}

/// Shells out to the platform opener and prompts on stdin.
pub struct SystemHost {
    platform: PlatformType,
    assume_yes: bool,
}

impl SystemHost {
    pub fn new(platform: PlatformType, assume_yes: bool) -> Self {
        Self {
            platform,
            assume_yes,
        }
    }
}

impl HostActions for SystemHost {
    fn open(&self, path: &Path) -> Result<(), SetupError> {
        let mut cmd = match self.platform {
            PlatformType::Windows => {
                let mut cmd = Command::new("cmd");
                // The empty string is the window title `start` expects first.
                cmd.args(["/C", "start", ""]);
                cmd
            }
            PlatformType::MacOS => Command::new("open"),
            PlatformType::Linux => Command::new("xdg-open"),
        };

        let output = cmd.arg(path).output()?;
        if !output.status.success() {
            return Err(SetupError::ExternalActionRequired {
                component: path.display().to_string(),
                action: format!(
                    "could not be opened automatically ({}), open it manually",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        tracing::info!("{} {} {}", "[?]".magenta(), question.magenta(), "[y/n]".dimmed());
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        parse_confirmation(&answer)
    }
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
