use crate::archive::{ExtractOutcome, archive_extension, extract};
use crate::download_client::{DownloadClient, percent_complete};
use crate::error::{DownloadError, ResolutionError, SetupError};
use crate::logging::{download_bar_style, download_spinner_style};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Some vendors refuse requests from non-browser agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/83.0.4103.97 Safari/537.36";

const GITHUB_API: &str = "https://api.github.com";
const GITHUB: &str = "https://github.com";

/// Matches the GitHub API JSON for a single release asset
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Body of `GET /repos/{owner}/{repo}/releases/latest`. A failed query returns
/// `{"message": "..."}` instead, which leaves `assets` empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LatestReleaseResponse {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<ReleaseAsset>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LatestReleaseResponse {
    pub fn from_json(body: &str) -> Result<Self, SetupError> {
        serde_json::from_str(body)
            .map_err(|e| ResolutionError::InvalidResponse(e.to_string()).into())
    }

    /// Interprets a metadata body together with its HTTP status. Error
    /// statuses always resolve to a response carrying a message, even when the
    /// body is not JSON.
    pub fn from_status_and_body(status: StatusCode, body: &str) -> Result<Self, SetupError> {
        if status.is_success() {
            return Self::from_json(body);
        }

        let fallback = format!("GitHub API request failed: {status}");
        let mut release = Self::from_json(body).unwrap_or_default();
        if release.message.is_none() {
            release.message = Some(fallback);
        }
        Ok(release)
    }
}

pub fn latest_release_api_url(owner: &str, repo: &str) -> String {
    release_api_url_at(GITHUB_API, owner, repo)
}

fn release_api_url_at(api_base: &str, owner: &str, repo: &str) -> String {
    format!("{api_base}/repos/{owner}/{repo}/releases/latest")
}

pub fn repository_git_url(owner: &str, repo: &str) -> String {
    format!("{GITHUB}/{owner}/{repo}.git")
}

/// Direct asset URL for releases whose file names are predictable.
pub fn build_versioned_download_url(
    owner: &str,
    repo: &str,
    version: &str,
    filename: &str,
) -> String {
    format!("{GITHUB}/{owner}/{repo}/releases/download/v{version}/{filename}")
}

/// Picks the `browser_download_url` of the asset at `index`.
pub fn select_asset_url(
    response: &LatestReleaseResponse,
    index: i64,
) -> Result<String, ResolutionError> {
    let Some(assets) = &response.assets else {
        return Err(ResolutionError::NoAssets {
            message: response
                .message
                .clone()
                .unwrap_or_else(|| "release metadata has no assets".to_string()),
        });
    };

    let position = usize::try_from(index)
        .ok()
        .filter(|i| *i < assets.len())
        .ok_or(ResolutionError::IndexOutOfRange {
            index,
            len: assets.len(),
        })?;

    let url = &assets[position].browser_download_url;
    if url.is_empty() {
        return Err(ResolutionError::MissingDownloadUrl { index: position });
    }
    Ok(url.clone())
}

/// Rejects owner/repository names that cannot form a single API path segment.
pub fn validate_repository(owner: &str, repo: &str) -> Result<(), SetupError> {
    for (label, value) in [("owner", owner), ("repository", repo)] {
        let malformed = value.is_empty()
            || value.contains(['/', '\\'])
            || value.chars().any(char::is_whitespace);
        if malformed {
            return Err(SetupError::Usage(format!("invalid {label} name '{value}'")));
        }
    }
    Ok(())
}

pub async fn resolve_latest_release_asset_url<D: DownloadClient>(
    client: &D,
    owner: &str,
    repo: &str,
    asset_index: i64,
) -> Result<String, SetupError> {
    validate_repository(owner, repo)?;
    tracing::debug!("Querying {}", latest_release_api_url(owner, repo));
    let response = client.latest_release(owner, repo).await?;
    Ok(select_asset_url(&response, asset_index)?)
}

/// Downloads `url` next to `output_path` (as `output_path.{ext}`), unpacks it
/// into `output_path` and removes the archive.
pub async fn fetch_release_archive<D: DownloadClient>(
    client: &D,
    url: &str,
    output_path: &Path,
) -> Result<ExtractOutcome, SetupError> {
    let archive_path = PathBuf::from(format!(
        "{}.{}",
        output_path.display(),
        archive_extension(url)
    ));
    client.download(url, &archive_path).await?;
    extract(&archive_path, Some(output_path), true)
}

/// reqwest-backed client for GitHub metadata and vendor downloads.
pub struct ReleaseClient {
    client: Client,
    api_base: String,
}

impl ReleaseClient {
    pub fn new() -> Result<Self, SetupError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| DownloadError::TransferUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_base: GITHUB_API.to_string(),
        })
    }

    /// Points metadata queries at another GitHub API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn stream_to_file(&self, url: &str, destination: &Path) -> Result<(), SetupError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let total = response.content_length().filter(|len| *len > 0);
        let current_span = tracing::Span::current();
        match total {
            Some(len) => {
                current_span.pb_set_style(&download_bar_style()?);
                current_span.pb_set_length(len);
            }
            None => current_span.pb_set_style(&download_spinner_style()?),
        }

        let mut file = tokio::fs::File::create(destination).await?;
        let mut downloaded = 0u64;
        let mut reported_decile = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            current_span.pb_set_position(downloaded);

            if let Some(percent) = percent_complete(downloaded, total) {
                let decile = (percent / 10.0) as u64;
                if decile > reported_decile {
                    reported_decile = decile;
                    tracing::debug!("{percent:.0}% of {url}");
                }
            }
        }

        file.flush().await?;
        Ok(())
    }
}

impl DownloadClient for ReleaseClient {
    async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<LatestReleaseResponse, SetupError> {
        let response = self
            .client
            .get(release_api_url_at(&self.api_base, owner, repo))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        LatestReleaseResponse::from_status_and_body(status, &body)
    }

    #[instrument(skip_all)]
    async fn download(&self, url: &str, destination: &Path) -> Result<(), SetupError> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());
        let current_span = tracing::Span::current();
        current_span.pb_set_message(&format!("Downloading {file_name}..."));
        current_span.pb_set_finish_message(&format!("Downloading {file_name}... Complete!"));

        let result = self.stream_to_file(url, destination).await;
        if result.is_err() && destination.exists() {
            // A partial file would later be mistaken for a finished download.
            let _ = tokio::fs::remove_file(destination).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockDownloadClient;

    fn release_with_assets(count: usize) -> LatestReleaseResponse {
        LatestReleaseResponse {
            tag_name: Some("v1.0.0".to_string()),
            assets: Some(
                (0..count)
                    .map(|i| ReleaseAsset {
                        name: format!("asset-{i}.zip"),
                        browser_download_url: format!("https://example.com/asset-{i}.zip"),
                        size: 1000,
                    })
                    .collect(),
            ),
            message: None,
        }
    }

    #[test]
    fn test_premake_windows_url() {
        assert_eq!(
            build_versioned_download_url(
                "premake",
                "premake-core",
                "5.0.0-beta2",
                "premake-5.0.0-beta2-windows.zip"
            ),
            "https://github.com/premake/premake-core/releases/download/v5.0.0-beta2/premake-5.0.0-beta2-windows.zip"
        );
    }

    #[test]
    fn test_api_and_git_urls() {
        assert_eq!(
            latest_release_api_url("premake", "premake-core"),
            "https://api.github.com/repos/premake/premake-core/releases/latest"
        );
        assert_eq!(
            repository_git_url("premake", "premake-core"),
            "https://github.com/premake/premake-core.git"
        );
    }

    #[test]
    fn test_select_asset_url() {
        let release = release_with_assets(3);
        assert_eq!(
            select_asset_url(&release, 1).unwrap(),
            "https://example.com/asset-1.zip"
        );
    }

    #[test]
    fn test_index_out_of_range_never_yields_url() {
        for count in [0, 1, 3] {
            let release = release_with_assets(count);
            for index in [-5, -1, count as i64, count as i64 + 1, i64::MAX] {
                assert_eq!(
                    select_asset_url(&release, index),
                    Err(ResolutionError::IndexOutOfRange { index, len: count })
                );
            }
        }
    }

    #[test]
    fn test_not_found_payload_surfaces_message() {
        let body = r#"{"message": "Not Found", "documentation_url": "https://docs.github.com/rest"}"#;
        let response = LatestReleaseResponse::from_json(body).unwrap();
        assert_eq!(
            select_asset_url(&response, 0),
            Err(ResolutionError::NoAssets {
                message: "Not Found".to_string()
            })
        );
    }

    #[test]
    fn test_missing_message_has_fallback() {
        let response = LatestReleaseResponse::from_json("{}").unwrap();
        assert!(matches!(
            select_asset_url(&response, 0),
            Err(ResolutionError::NoAssets { .. })
        ));
    }

    #[test]
    fn test_empty_download_url_is_rejected() {
        let body = r#"{"assets": [{"name": "a.zip", "browser_download_url": ""}]}"#;
        let response = LatestReleaseResponse::from_json(body).unwrap();
        assert_eq!(
            select_asset_url(&response, 0),
            Err(ResolutionError::MissingDownloadUrl { index: 0 })
        );
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            LatestReleaseResponse::from_json("<html>rate limited</html>"),
            Err(SetupError::Resolution(ResolutionError::InvalidResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_repository_is_a_usage_error_before_any_query() {
        let client = MockDownloadClient::with_release(release_with_assets(1));
        let cases = [
            ("", "premake-core"),
            ("premake", ""),
            ("premake/x", "core"),
            ("premake", "core dump"),
        ];
        for (owner, repo) in cases {
            let result = resolve_latest_release_asset_url(&client, owner, repo, 0).await;
            assert!(matches!(result, Err(SetupError::Usage(_))), "{owner}/{repo}");
        }
        assert_eq!(client.metadata_queries(), 0);
    }

    #[tokio::test]
    async fn test_resolve_through_client() -> anyhow::Result<()> {
        let client = MockDownloadClient::with_release(release_with_assets(2));
        let url = resolve_latest_release_asset_url(&client, "owner", "repo", 1).await?;
        assert_eq!(url, "https://example.com/asset-1.zip");
        assert_eq!(client.metadata_queries(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_release_archive_unpacks_into_output_path() -> anyhow::Result<()> {
        let tmp_dir = tempfile::TempDir::new()?;
        let client = MockDownloadClient::serving_zip(&[("tool", "binary")]);
        let output_path = tmp_dir.path().join("out");

        let outcome =
            fetch_release_archive(&client, "https://example.com/tool-1.0.zip", &output_path)
                .await?;

        assert_eq!(outcome, ExtractOutcome::Extracted(output_path.clone()));
        assert!(output_path.join("tool").exists());
        assert!(!tmp_dir.path().join("out.zip").exists());
        assert_eq!(client.downloads(), vec!["https://example.com/tool-1.0.zip"]);
        Ok(())
    }

    /// Answers the first request on a loopback port with `response` verbatim.
    async fn serve_once(response: String) -> anyhow::Result<String> {
        use tokio::io::AsyncReadExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok(format!("http://{address}"))
    }

    fn loopback_client(api_base: &str) -> anyhow::Result<ReleaseClient> {
        Ok(ReleaseClient {
            client: Client::builder().no_proxy().build()?,
            api_base: api_base.to_string(),
        })
    }

    fn json_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn test_download_without_content_length_writes_whole_body() -> anyhow::Result<()> {
        let tmp_dir = tempfile::TempDir::new()?;
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n\
             5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n"
                .to_string(),
        )
        .await?;
        let destination = tmp_dir.path().join("nested").join("payload.bin");

        let client = loopback_client(&base)?;
        client
            .download(&format!("{base}/payload.bin"), &destination)
            .await?;

        assert_eq!(std::fs::read_to_string(&destination)?, "hello world");
        Ok(())
    }

    #[tokio::test]
    async fn test_download_error_status_leaves_no_file() -> anyhow::Result<()> {
        let tmp_dir = tempfile::TempDir::new()?;
        let base = serve_once(json_response("404 Not Found", "missing")).await?;
        let destination = tmp_dir.path().join("installer.exe");

        let client = loopback_client(&base)?;
        let result = client
            .download(&format!("{base}/installer.exe"), &destination)
            .await;

        assert!(matches!(
            result,
            Err(SetupError::Download(DownloadError::Status { status: 404, .. }))
        ));
        assert!(!destination.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_truncated_download_removes_partial_file() -> anyhow::Result<()> {
        let tmp_dir = tempfile::TempDir::new()?;
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nonly a few bytes"
                .to_string(),
        )
        .await?;
        let destination = tmp_dir.path().join("sdk.dmg");

        let client = loopback_client(&base)?;
        let result = client
            .download(&format!("{base}/sdk.dmg"), &destination)
            .await;

        assert!(result.is_err());
        assert!(!destination.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_payload_message_reaches_resolution() -> anyhow::Result<()> {
        let base = serve_once(json_response(
            "404 Not Found",
            r#"{"message":"Not Found"}"#,
        ))
        .await?;

        let client = loopback_client(&base)?;
        let release = client.latest_release("premake", "no-such-repo").await?;

        assert_eq!(
            select_asset_url(&release, 0),
            Err(ResolutionError::NoAssets {
                message: "Not Found".to_string()
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_with_html_body_keeps_status() -> anyhow::Result<()> {
        let base = serve_once(
            "HTTP/1.1 502 Bad Gateway\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html></html>"
                .to_string(),
        )
        .await?;

        let client = loopback_client(&base)?;
        let release = client.latest_release("premake", "premake-core").await?;

        assert_eq!(
            select_asset_url(&release, 0),
            Err(ResolutionError::NoAssets {
                message: "GitHub API request failed: 502 Bad Gateway".to_string()
            })
        );
        Ok(())
    }

    #[test]
    fn test_success_status_with_html_body_is_invalid() {
        assert!(matches!(
            LatestReleaseResponse::from_status_and_body(StatusCode::OK, "<html></html>"),
            Err(SetupError::Resolution(ResolutionError::InvalidResponse(_)))
        ));
    }
}
