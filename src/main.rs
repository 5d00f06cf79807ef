//! drive_download CLI - Download a file from Google Drive.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use drive_download::download::{download_file, DownloadConfig, DEFAULT_CHUNK_SIZE};
use drive_download::progress::LogReporter;
use drive_download::{authenticate, extract_id, logging, DriveClient, DriveError};

/// Download files from Google Drive.
#[derive(Parser)]
#[command(name = "drive_download")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The file ID on Google Drive, or a Drive/Docs sharing link
    /// (https://drive.google.com/file/d/<ID>/view, https://docs.google.com/document/d/<ID>/edit).
    #[arg(value_name = "file_id")]
    file_id: String,

    /// The local path where the file should be saved.
    #[arg(value_name = "destination")]
    destination: PathBuf,

    /// Path to the service account JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Bytes requested per chunk.
    #[arg(
        long,
        env = "DRIVE_DOWNLOAD_CHUNK_SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    chunk_size: u64,

    /// Drive API root, e.g. for a local test server.
    #[arg(long, env = "DRIVE_API_BASE", hide = true)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let client = match authenticate(cli.credentials.as_deref(), cli.api_base.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to authenticate Google Drive: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&client, &cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The token is fetched lazily, so a rejected credential shows up here.
            match e.downcast_ref::<DriveError>() {
                Some(drive_err) if drive_err.is_auth_error() => {
                    error!("Failed to authenticate Google Drive: {}", drive_err)
                }
                _ => error!("Failed to download file: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &DriveClient, cli: &Cli) -> Result<()> {
    let file_id = extract_id(&cli.file_id)
        .with_context(|| format!("Invalid file URL or ID: {}", cli.file_id))?;

    let config = DownloadConfig {
        chunk_size: cli.chunk_size,
    };

    download_file(client, &file_id, &cli.destination, &config, &LogReporter).await?;
    Ok(())
}
