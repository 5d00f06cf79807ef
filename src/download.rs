//! Chunked download of a single Drive file to a local path.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE};
use reqwest::{Response, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, error};

use crate::client::DriveClient;
use crate::error::{DriveError, Result};
use crate::export::TransferMode;
use crate::progress::{ProgressReporter, TransferProgress};

/// Default chunk size (100 MiB).
pub const DEFAULT_CHUNK_SIZE: u64 = 100 * 1024 * 1024;

/// Settings for a download.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Bytes requested per ranged request.
    pub chunk_size: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A remote file together with its resolved content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub id: String,
    pub mime_type: String,
}

impl FileHandle {
    /// Resolve the content type of `file_id`.
    pub async fn resolve(client: &DriveClient, file_id: &str) -> Result<Self> {
        let mime_type = client.get_mime_type(file_id).await?;
        Ok(Self {
            id: file_id.to_string(),
            mime_type,
        })
    }
}

/// Outcome of a completed download.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub file: FileHandle,
    pub mode: TransferMode,
    pub destination: PathBuf,
    pub bytes_written: u64,
}

/// Parsed `Content-Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// Inclusive byte range of this response, absent for `bytes */total`.
    pub range: Option<(u64, u64)>,
    /// Full size of the content, absent for `bytes a-b/*`.
    pub total: Option<u64>,
}

impl ContentRange {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || DriveError::InvalidContentRange(value.to_string());

        let spec = value.trim().strip_prefix("bytes ").ok_or_else(invalid)?;
        let (range, total) = spec.split_once('/').ok_or_else(invalid)?;

        let range = match range.trim() {
            "*" => None,
            r => {
                let (start, end) = r.split_once('-').ok_or_else(invalid)?;
                let start = start.trim().parse::<u64>().map_err(|_| invalid())?;
                let end = end.trim().parse::<u64>().map_err(|_| invalid())?;
                if end < start {
                    return Err(invalid());
                }
                Some((start, end))
            }
        };

        let total = match total.trim() {
            "*" => None,
            t => Some(t.parse::<u64>().map_err(|_| invalid())?),
        };

        Ok(Self { range, total })
    }
}

/// Download `file_id` into `destination`.
///
/// The destination is created or truncated only after the file type has
/// been resolved, so an unsupported type leaves it untouched. A failure
/// mid-transfer leaves whatever was already written.
pub async fn download_file(
    client: &DriveClient,
    file_id: &str,
    destination: &Path,
    config: &DownloadConfig,
    reporter: &dyn ProgressReporter,
) -> Result<DownloadSummary> {
    let result = run_download(client, file_id, destination, config, reporter).await;

    match &result {
        Err(DriveError::FileNotFound(id)) => error!("Error: File not found with ID {}.", id),
        Err(err @ DriveError::UnsupportedType(_)) => error!("{}", err),
        _ => {}
    }
    result
}

async fn run_download(
    client: &DriveClient,
    file_id: &str,
    destination: &Path,
    config: &DownloadConfig,
    reporter: &dyn ProgressReporter,
) -> Result<DownloadSummary> {
    let file = FileHandle::resolve(client, file_id).await?;
    let mode = TransferMode::for_mime_type(&file.mime_type)?;
    debug!(file_id, ?mode, destination = %destination.display(), "starting transfer");

    let mut out = File::create(destination).await?;
    let chunk_size = config.chunk_size.max(1);
    let mut received: u64 = 0;

    loop {
        let end = received.saturating_add(chunk_size - 1);
        let response = client.request_range(file_id, mode, received, end).await?;
        let status = response.status();

        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            // Zero-byte files answer any range with `bytes */0`.
            let range = header_content_range(&response)?;
            if range.and_then(|r| r.total) == Some(0) && received == 0 {
                reporter.on_chunk(mode, TransferProgress { received: 0, total: Some(0) }, true);
                break;
            }
            return Err(DriveError::ApiError {
                status: status.as_u16(),
                message: format!("range {}-{} not satisfiable", received, end),
            });
        }

        let content_range = header_content_range(&response)?;
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if let Some((start, _)) = content_range.and_then(|r| r.range) {
            if start != received {
                return Err(DriveError::InvalidContentRange(format!(
                    "expected chunk at offset {}, got {}",
                    received, start
                )));
            }
        }

        if status != StatusCode::PARTIAL_CONTENT && received > 0 {
            // The server ignored the range and is resending from byte 0.
            out.set_len(0).await?;
            out.seek(SeekFrom::Start(0)).await?;
            received = 0;
        }

        let written = write_body(response, &mut out).await?;
        received += written;

        let (total, done) = if status == StatusCode::PARTIAL_CONTENT {
            match content_range.and_then(|r| r.total) {
                Some(total) if written == 0 && received < total => {
                    return Err(DriveError::InvalidContentRange(format!(
                        "empty chunk at offset {} of {}",
                        received, total
                    )));
                }
                Some(total) => (Some(total), received >= total),
                None => (None, written < chunk_size),
            }
        } else {
            // The server ignored the range and sent the whole body.
            (content_length.or(Some(received)), true)
        };

        reporter.on_chunk(mode, TransferProgress { received, total }, done);
        if done {
            break;
        }
    }

    out.flush().await?;
    debug!(bytes = received, "transfer complete");
    reporter.on_complete(destination, received);

    Ok(DownloadSummary {
        file,
        mode,
        destination: destination.to_path_buf(),
        bytes_written: received,
    })
}

fn header_content_range(response: &Response) -> Result<Option<ContentRange>> {
    match response.headers().get(CONTENT_RANGE) {
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| DriveError::InvalidContentRange(format!("{:?}", value)))?;
            ContentRange::parse(value).map(Some)
        }
        None => Ok(None),
    }
}

/// Stream a response body to the end of `out`, returning the byte count.
async fn write_body(response: Response, out: &mut File) -> Result<u64> {
    let mut written = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    Ok(written)
}
