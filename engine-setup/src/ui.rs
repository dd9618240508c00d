use colored::*;
use engine_setup_lib::error::SetupError;
use engine_setup_lib::installer::InstallStatus;

pub fn success(msg: &str) {
    tracing::info!("{} {}", "✓".green(), msg.green());
}

pub fn error(msg: &str) {
    tracing::info!("{} {}", "Error:".red(), msg.red());
}

pub fn info(msg: &str) {
    tracing::info!("{}", msg);
}

pub fn warning(msg: &str) {
    tracing::info!("{}", msg.yellow());
}

pub fn tip(msg: &str) {
    tracing::info!("{} {}", "Tip:".dimmed(), msg.dimmed());
}

/// Prints the outcome of one component install. Returns whether it counts as
/// a success for the overall exit status.
pub fn report_install(component: &str, result: &Result<InstallStatus, SetupError>) -> bool {
    match result {
        Ok(InstallStatus::FullyInstalled) => {
            success(&format!("{component} is ready."));
            true
        }
        Ok(status) => {
            warning(&format!("{component}: {status}."));
            tip("Finish the vendor installer, then run `engine-setup setup` again.");
            true
        }
        Err(SetupError::ExternalActionRequired { action, .. }) => {
            warning(&format!("{component} needs manual action: {action}"));
            false
        }
        Err(e) => {
            error(&format!("Failed to install {component}: {e}"));
            false
        }
    }
}

pub fn status_line(component: &str, status: InstallStatus) -> String {
    let status_str = status.to_string();
    let status_str = match status {
        InstallStatus::FullyInstalled => status_str.green(),
        InstallStatus::Setup | InstallStatus::Downloaded => status_str.yellow(),
        InstallStatus::NotInstalled => status_str.dimmed(),
    };
    format!("{:<12} {}", component.cyan(), status_str)
}
