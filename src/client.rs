//! Google Drive API client.

use reqwest::header::RANGE;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::export::TransferMode;
use crate::models::{ApiErrorResponse, FileEntry, FileListResponse, FileMetadata, MimeTypeResponse};

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Entries returned by a single listing call. No further pages are fetched.
pub const LIST_PAGE_SIZE: u32 = 100;

/// Authenticated handle to the Drive API.
pub struct DriveClient {
    api_base: String,
    auth: Authenticator,
    http: Client,
}

impl DriveClient {
    /// Create a client talking to the public Drive API.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_api_base(auth, DRIVE_API_BASE)
    }

    /// Create a client talking to a different API root (e.g. a local mock).
    pub fn with_api_base(auth: Authenticator, api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            auth,
            http: Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch only the content type of a file.
    pub async fn get_mime_type(&self, file_id: &str) -> Result<String> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true"), ("fields", "mimeType")])
            .send()
            .await?;

        let response = check_status(response, file_id).await?;
        let body: MimeTypeResponse = response.json().await?;
        debug!(file_id, mime_type = %body.mime_type, "resolved file type");
        Ok(body.mime_type)
    }

    /// Get file metadata by ID.
    pub async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&token)
            .query(&[
                ("supportsAllDrives", "true"),
                ("fields", "id, name, size, mimeType"),
            ])
            .send()
            .await?;

        let response = check_status(response, file_id).await?;
        let metadata: FileMetadata = response.json().await?;
        Ok(metadata)
    }

    /// List files visible to the service account, one page only.
    pub async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let token = self.auth.get_access_token().await?;
        let page_size = LIST_PAGE_SIZE.to_string();

        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&token)
            .query(&[
                ("pageSize", page_size.as_str()),
                ("fields", "nextPageToken, files(id, name)"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let list_response: FileListResponse = response.json().await?;
        if list_response.next_page_token.is_some() {
            debug!("more than {} files visible; only the first page is listed", LIST_PAGE_SIZE);
        }
        Ok(list_response.files)
    }

    /// Request the byte range `start..=end` of a file's content.
    ///
    /// Returns the response once its status is 2xx or 416; the body is left
    /// for the caller to stream.
    pub async fn request_range(
        &self,
        file_id: &str,
        mode: TransferMode,
        start: u64,
        end: u64,
    ) -> Result<Response> {
        let token = self.auth.get_access_token().await?;

        let request = match mode {
            TransferMode::Export(doc) => self
                .http
                .get(format!("{}/files/{}/export", self.api_base, file_id))
                .query(&[("mimeType", doc.export_mime_type())]),
            TransferMode::Media => self
                .http
                .get(format!("{}/files/{}", self.api_base, file_id))
                .query(&[("alt", "media"), ("supportsAllDrives", "true")]),
        };

        let response = request
            .bearer_auth(&token)
            .header(RANGE, format!("bytes={}-{}", start, end))
            .send()
            .await?;

        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(response);
        }
        check_status(response, file_id).await
    }
}

/// Pass successful responses through; turn everything else into a `DriveError`.
async fn check_status(response: Response, file_id: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(DriveError::FileNotFound(file_id.to_string()));
    }
    Err(api_error(response).await)
}

async fn api_error(response: Response) -> DriveError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }
    DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    }
}
