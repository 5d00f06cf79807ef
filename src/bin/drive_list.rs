//! drive_list CLI - List files shared with a service account.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use drive_download::{authenticate, lister, logging};

/// Verify and list files that are shared with the service account.
#[derive(Parser)]
#[command(name = "drive_list")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the service account JSON credentials file.
    #[arg(long)]
    credentials: PathBuf,

    /// Drive API root, e.g. for a local test server.
    #[arg(long, env = "DRIVE_API_BASE", hide = true)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let client = match authenticate(Some(cli.credentials.as_path()), cli.api_base.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to authenticate Google Drive: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout();
    if let Err(e) = lister::print_files(&client, &mut stdout).await {
        error!("Failed to list files: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
