use crate::archive::{ExtractOutcome, extract};
use crate::config::Config;
use crate::download_client::DownloadClient;
use crate::error::SetupError;
use crate::launcher::HostActions;
use crate::manifest::ExpectedFileManifest;
use crate::platform::PlatformType;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where a component is in its installation lifecycle. Always recomputed
/// from the filesystem, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstallStatus {
    /// Nothing on disk yet.
    NotInstalled,
    /// The vendor installer package is downloaded but has not been run.
    Downloaded,
    /// The vendor installer has run; its files are not yet in our tree.
    Setup,
    /// Every manifest entry exists under the install directory.
    FullyInstalled,
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            InstallStatus::NotInstalled => "not installed",
            InstallStatus::Downloaded => "installer downloaded",
            InstallStatus::Setup => "vendor install detected",
            InstallStatus::FullyInstalled => "installed",
        };
        f.write_str(s)
    }
}

/// How a component gets from the network onto disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// An archive we download and unpack into the install directory.
    Archive { url: String, archive_path: PathBuf },
    /// A vendor installer the user has to run (GUI installers, disk images).
    InstallerPackage { url: String, package_path: PathBuf },
    /// Nothing we can fetch and unpack on this platform; the user must do it.
    Manual { url: String, instructions: String },
}

/// A third-party tool materialized under the binaries directory.
pub trait Component {
    fn name(&self) -> &str;

    /// Versioned, platform-namespaced directory the component lives in.
    fn install_dir(&self, config: &Config, platform: PlatformType) -> PathBuf;

    fn manifest(&self, platform: PlatformType) -> ExpectedFileManifest;

    /// Where the vendor's own installer puts the component, if it has one.
    fn vendor_install_dir(&self, _config: &Config, _platform: PlatformType) -> Option<PathBuf> {
        None
    }

    /// Where a downloaded vendor installer package is kept.
    fn installer_package_path(
        &self,
        _config: &Config,
        _platform: PlatformType,
    ) -> Option<PathBuf> {
        None
    }

    /// `(source, destination)` pairs, relative to the vendor install dir and
    /// our install dir, merged when a vendor install is detected.
    fn vendor_subdirs(&self, _platform: PlatformType) -> Vec<(PathBuf, PathBuf)> {
        Vec::new()
    }

    fn acquisition(
        &self,
        config: &Config,
        platform: PlatformType,
    ) -> Result<Acquisition, SetupError>;

    /// Runs after files land in the install directory.
    fn finalize(&self, _install_dir: &Path, _platform: PlatformType) -> Result<(), SetupError> {
        Ok(())
    }
}

pub fn probe_status<C: Component>(
    component: &C,
    config: &Config,
    platform: PlatformType,
) -> InstallStatus {
    let install_dir = component.install_dir(config, platform);
    if component.manifest(platform).is_satisfied(&install_dir) {
        return InstallStatus::FullyInstalled;
    }
    probe_pending_status(component, config, platform)
}

/// Status ignoring any existing install; what `override` re-runs from.
fn probe_pending_status<C: Component>(
    component: &C,
    config: &Config,
    platform: PlatformType,
) -> InstallStatus {
    if component
        .vendor_install_dir(config, platform)
        .is_some_and(|dir| dir.is_dir())
    {
        return InstallStatus::Setup;
    }
    if component
        .installer_package_path(config, platform)
        .is_some_and(|path| path.is_file())
    {
        return InstallStatus::Downloaded;
    }
    InstallStatus::NotInstalled
}

/// Installs one component, returning the status it ended in.
///
/// A complete install short-circuits without touching the network unless
/// `override_install` is set. Existing files are overwritten, never removed.
pub async fn install_component<C, D, H>(
    config: &Config,
    component: &C,
    client: &D,
    host: &H,
    override_install: bool,
) -> Result<InstallStatus, SetupError>
where
    C: Component,
    D: DownloadClient,
    H: HostActions,
{
    let platform = config.require_platform()?;
    let name = component.name();
    let install_dir = component.install_dir(config, platform);
    tracing::info!(
        "Installing {} to directory: {}",
        name,
        std::path::absolute(&install_dir)
            .unwrap_or_else(|_| install_dir.clone())
            .display()
    );

    let status = probe_status(component, config, platform);
    if status == InstallStatus::FullyInstalled && !override_install {
        tracing::info!("{} is already installed.", name);
        return Ok(InstallStatus::FullyInstalled);
    }

    match probe_pending_status(component, config, platform) {
        InstallStatus::Setup => {
            let vendor_dir = component
                .vendor_install_dir(config, platform)
                .ok_or_else(|| SetupError::Config(format!("{name} has no vendor install")))?;
            tracing::info!(
                "{} detected at '{}', copying into the install directory",
                name,
                vendor_dir.display()
            );
            let copied = merge_vendor_install(
                &vendor_dir,
                &component.vendor_subdirs(platform),
                &install_dir,
            )?;
            tracing::debug!("Copied {} files", copied);
            component.finalize(&install_dir, platform)?;
            component
                .manifest(platform)
                .verify(name, &install_dir)
                .map_err(|e| SetupError::ExternalActionRequired {
                    component: name.to_string(),
                    action: format!(
                        "the vendor install at '{}' is incomplete ({e}); finish the {name} installer and run setup again",
                        vendor_dir.display()
                    ),
                })?;
            tracing::info!("Finished copying {} to '{}'", name, install_dir.display());
            Ok(InstallStatus::FullyInstalled)
        }
        InstallStatus::Downloaded => {
            let package = component
                .installer_package_path(config, platform)
                .unwrap_or_default();
            Err(SetupError::ExternalActionRequired {
                component: name.to_string(),
                action: format!(
                    "run the installer at '{}' and then run setup again",
                    package.display()
                ),
            })
        }
        InstallStatus::NotInstalled | InstallStatus::FullyInstalled => {
            acquire(config, component, client, host, platform, &install_dir).await
        }
    }
}

async fn acquire<C, D, H>(
    config: &Config,
    component: &C,
    client: &D,
    host: &H,
    platform: PlatformType,
    install_dir: &Path,
) -> Result<InstallStatus, SetupError>
where
    C: Component,
    D: DownloadClient,
    H: HostActions,
{
    let name = component.name();
    match component.acquisition(config, platform)? {
        Acquisition::Archive { url, archive_path } => {
            tracing::info!("Downloading {} from {}", name, url);
            client.download(&url, &archive_path).await?;
            match extract(&archive_path, Some(install_dir), true)? {
                ExtractOutcome::Extracted(dir) => tracing::debug!("Extracted to {}", dir.display()),
                ExtractOutcome::Skipped => {
                    return Err(SetupError::extract(
                        &archive_path,
                        "not a zip or tar.gz archive",
                    ));
                }
            }
            component.finalize(install_dir, platform)?;
            component.manifest(platform).verify(name, install_dir)?;
            tracing::info!("{} installed.", name);
            Ok(InstallStatus::FullyInstalled)
        }
        Acquisition::InstallerPackage { url, package_path } => {
            tracing::info!("Downloading {} installer from {}", name, url);
            client.download(&url, &package_path).await?;
            tracing::info!("Downloaded {} installer to '{}'", name, package_path.display());

            if !host.confirm(&format!("Run the {name} installer now?")) {
                return Err(SetupError::ExternalActionRequired {
                    component: name.to_string(),
                    action: format!(
                        "run the installer at '{}' and then run setup again",
                        package_path.display()
                    ),
                });
            }
            host.open(&package_path)?;
            tracing::info!(
                "Complete the {} installer, then run setup again to copy it into place.",
                name
            );
            Ok(InstallStatus::Downloaded)
        }
        Acquisition::Manual { url, instructions } => Err(SetupError::ExternalActionRequired {
            component: name.to_string(),
            action: format!("{instructions} (download: {url})"),
        }),
    }
}

/// Copies each `(source, destination)` subtree from `vendor_dir` into
/// `install_dir`. Missing sources are skipped; existing files are overwritten.
/// Returns the number of files copied.
pub fn merge_vendor_install(
    vendor_dir: &Path,
    subdirs: &[(PathBuf, PathBuf)],
    install_dir: &Path,
) -> Result<usize, SetupError> {
    let mut copied = 0;
    fs::create_dir_all(install_dir)?;

    for (source_rel, dest_rel) in subdirs {
        let source_base = vendor_dir.join(source_rel);
        let dest_base = install_dir.join(dest_rel);
        if !source_base.is_dir() {
            tracing::debug!("Skipping missing '{}'", source_base.display());
            continue;
        }

        for entry in WalkDir::new(&source_base).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&source_base)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let target = dest_base.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}
