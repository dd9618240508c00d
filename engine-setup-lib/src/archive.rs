use crate::error::SetupError;
use crate::logging::spinner_style;
use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Archive formats the fetcher can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    /// Anything else; extraction is skipped.
    Other,
}

impl ArchiveKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "zip" => Self::Zip,
            "tar.gz" => Self::TarGz,
            _ => Self::Other,
        }
    }

    pub fn of(path: &str) -> Self {
        Self::from_extension(&archive_extension(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Contents were written to this directory.
    Extracted(PathBuf),
    /// The extension is not an archive we unpack; nothing was touched.
    Skipped,
}

/// Infers the extension of a file name or URL: the text after the last `.`,
/// except that a trailing `gz` takes the segment before it along (`tar.gz`).
pub fn archive_extension(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let segments: Vec<&str> = file_name.split('.').collect();
    let last = segments[segments.len() - 1];
    if last == "gz" && segments.len() > 1 {
        format!("{}.{}", segments[segments.len() - 2], last)
    } else {
        last.to_string()
    }
}

/// The directory an archive unpacks into when the caller gives none: the
/// archive path with its inferred extension stripped.
pub fn default_extract_dir(archive_path: &Path) -> PathBuf {
    let path_str = archive_path.to_string_lossy();
    let extension = archive_extension(&path_str);
    match path_str.strip_suffix(&format!(".{extension}")) {
        Some(stripped) => PathBuf::from(stripped),
        None => archive_path.with_extension(""),
    }
}

/// Extracts `archive_path` by inferred extension. Unknown extensions are a
/// no-op and leave the source in place. The source is deleted after a
/// successful extraction when `delete_source` is set.
#[instrument(skip_all, fields(archive = %archive_path.display()))]
pub fn extract(
    archive_path: &Path,
    destination: Option<&Path>,
    delete_source: bool,
) -> Result<ExtractOutcome, SetupError> {
    let kind = ArchiveKind::of(&archive_path.to_string_lossy());
    if kind == ArchiveKind::Other {
        tracing::debug!(
            "Not an archive we unpack, leaving '{}' as is",
            archive_path.display()
        );
        return Ok(ExtractOutcome::Skipped);
    }

    let destination = destination
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_extract_dir(archive_path));

    let current_span = tracing::Span::current();
    current_span.pb_set_style(&spinner_style("{msg}")?);
    current_span.pb_set_message("Extracting...");
    current_span.pb_set_finish_message("Extracting... Done");

    fs::create_dir_all(&destination)?;
    match kind {
        ArchiveKind::Zip => extract_zip(archive_path, &destination)?,
        ArchiveKind::TarGz => extract_tar_gz(archive_path, &destination)?,
        ArchiveKind::Other => unreachable!("handled above"),
    }

    if delete_source {
        tracing::debug!("Removing archive '{}'", archive_path.display());
        fs::remove_file(archive_path)?;
    }

    Ok(ExtractOutcome::Extracted(destination))
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<(), SetupError> {
    let file = fs::File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| SetupError::extract(archive_path, e))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| SetupError::extract(archive_path, e))?;
        let outpath = match file.enclosed_name() {
            Some(path) => destination.join(path),
            None => continue,
        };

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent()
                && !p.exists()
            {
                fs::create_dir_all(p)?;
            }
            let mut outfile = fs::File::create(&outpath)?;
            std::io::copy(&mut file, &mut outfile)
                .map_err(|e| SetupError::extract(archive_path, e))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

fn extract_tar_gz(archive_path: &Path, destination: &Path) -> Result<(), SetupError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .unpack(destination)
        .map_err(|e| SetupError::extract(archive_path, e))
}
