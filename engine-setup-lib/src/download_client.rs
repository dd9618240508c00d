use crate::error::SetupError;
use crate::github::LatestReleaseResponse;
use std::path::Path;

/// Network seam for everything the installers fetch.
pub trait DownloadClient {
    /// Queries the provider's latest-release metadata for `owner/repo`.
    /// Error payloads are returned as a response without assets so their
    /// `message` can be surfaced.
    fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<LatestReleaseResponse, SetupError>> + Send;

    /// Streams `url` into `destination`, creating parent directories.
    fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), SetupError>> + Send;
}

/// Percentage of `total` covered by `downloaded`, or `None` when the size is
/// unknown or zero.
pub fn percent_complete(downloaded: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(total) if total > 0 => Some(downloaded.min(total) as f64 * 100.0 / total as f64),
        _ => None,
    }
}
