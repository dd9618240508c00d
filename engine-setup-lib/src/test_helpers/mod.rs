mod mock_download_client;
mod mock_host;

pub use mock_download_client::MockDownloadClient;
pub use mock_host::MockHost;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates an empty file, and its parent directories.
pub fn touch(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")
}

pub fn zip_bytes(entries: &[(&str, &str)]) -> anyhow::Result<Vec<u8>> {
    let mut zip_buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));

    // 0o755 so extracted binaries stay executable.
    #[cfg(unix)]
    let options = SimpleFileOptions::default().unix_permissions(0o755);
    #[cfg(not(unix))]
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(zip_buffer)
}

pub fn tar_gz_bytes(entries: &[(&str, &str)]) -> anyhow::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes())?;
    }
    Ok(builder.into_inner()?.finish()?)
}

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> anyhow::Result<()> {
    fs::write(path, zip_bytes(entries)?)?;
    Ok(())
}

pub fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) -> anyhow::Result<()> {
    fs::write(path, tar_gz_bytes(entries)?)?;
    Ok(())
}
