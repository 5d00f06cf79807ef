//! Error types for the drive_download crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to Google Drive or writing downloads.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("no credentials file provided (use --credentials or GOOGLE_APPLICATION_CREDENTIALS)")]
    CredentialsMissing,

    #[error("failed to read credentials file {path:?}: {source}")]
    CredentialsFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("File not found with ID {0}")]
    FileNotFound(String),

    #[error("Unsupported Google Docs Editors file type: {0}")]
    UnsupportedType(String),

    #[error("malformed Content-Range header: {0}")]
    InvalidContentRange(String),

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriveError {
    /// Whether the error comes from loading or using the service-account credential.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            DriveError::CredentialsMissing
                | DriveError::CredentialsFileError { .. }
                | DriveError::CredentialsParseError(_)
                | DriveError::JwtError(_)
                | DriveError::TokenRefreshError(_)
        )
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
