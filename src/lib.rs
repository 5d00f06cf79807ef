//! drive_download - download files from Google Drive with a service account.
//!
//! This library provides:
//! - Service-account authentication against the Drive API
//! - Chunked download of stored files, and export of Docs/Sheets/Slides
//! - A single-page listing of files shared with the service account
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use drive_download::download::{download_file, DownloadConfig};
//! use drive_download::progress::LogReporter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = drive_download::authenticate(Some(Path::new("service-account.json")), None)?;
//!     let summary = download_file(
//!         &client,
//!         "1AbCxyz",
//!         Path::new("/tmp/out.pdf"),
//!         &DownloadConfig::default(),
//!         &LogReporter,
//!     )
//!     .await?;
//!     println!("{} bytes", summary.bytes_written);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod download;
pub mod error;
pub mod export;
pub mod lister;
pub mod logging;
pub mod models;
pub mod progress;
pub mod url_parser;

// Re-exports for convenience
pub use auth::{authenticate, Authenticator};
pub use client::DriveClient;
pub use error::{DriveError, Result};
pub use models::{FileEntry, FileMetadata};
pub use url_parser::extract_id;
