use super::{tar_gz_bytes, zip_bytes};
use crate::download_client::DownloadClient;
use crate::error::{DownloadError, SetupError};
use crate::github::LatestReleaseResponse;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Payload {
    Bytes(Vec<u8>),
    Status(u16),
}

/// Serves a fixed release and a fixed download body, recording every call.
pub struct MockDownloadClient {
    release: LatestReleaseResponse,
    payload: Payload,
    metadata_queries: AtomicUsize,
    downloads: Mutex<Vec<String>>,
}

impl MockDownloadClient {
    fn new(release: LatestReleaseResponse, payload: Payload) -> Self {
        Self {
            release,
            payload,
            metadata_queries: AtomicUsize::new(0),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_release(release: LatestReleaseResponse) -> Self {
        Self::new(release, Payload::Status(404))
    }

    pub fn serving_zip(entries: &[(&str, &str)]) -> Self {
        let bytes = zip_bytes(entries).expect("zip fixture");
        Self::new(LatestReleaseResponse::default(), Payload::Bytes(bytes))
    }

    pub fn serving_tar_gz(entries: &[(&str, &str)]) -> Self {
        let bytes = tar_gz_bytes(entries).expect("tar.gz fixture");
        Self::new(LatestReleaseResponse::default(), Payload::Bytes(bytes))
    }

    pub fn serving_bytes(bytes: &[u8]) -> Self {
        Self::new(LatestReleaseResponse::default(), Payload::Bytes(bytes.to_vec()))
    }

    pub fn failing(status: u16) -> Self {
        Self::new(LatestReleaseResponse::default(), Payload::Status(status))
    }

    pub fn metadata_queries(&self) -> usize {
        self.metadata_queries.load(Ordering::SeqCst)
    }

    /// URLs requested through `download`, in order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.metadata_queries() + self.downloads().len()
    }
}

impl DownloadClient for MockDownloadClient {
    async fn latest_release(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<LatestReleaseResponse, SetupError> {
        self.metadata_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.release.clone())
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<(), SetupError> {
        self.downloads.lock().unwrap().push(url.to_string());
        match &self.payload {
            Payload::Bytes(bytes) => {
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(destination, bytes)?;
                Ok(())
            }
            Payload::Status(status) => Err(DownloadError::Status {
                url: url.to_string(),
                status: *status,
            }
            .into()),
        }
    }
}
