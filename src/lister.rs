//! Listing of files shared with the service account.

use std::io::{self, Write};

use tracing::error;

use crate::client::DriveClient;
use crate::error::DriveError;
use crate::models::FileEntry;

/// Print up to one page of files visible to the credential.
///
/// API and transport failures are logged and swallowed; only failures to
/// write to `out` are returned. Returns the number of entries printed.
pub async fn print_files<W: Write>(client: &DriveClient, out: &mut W) -> io::Result<usize> {
    match client.list_files().await {
        Ok(files) => render(&files, out).map(|_| files.len()),
        Err(err @ (DriveError::ApiError { .. } | DriveError::HttpError(_))) => {
            error!("An HTTP error occurred: {}", err);
            Ok(0)
        }
        Err(err) => {
            error!("An error occurred while listing files: {}", err);
            Ok(0)
        }
    }
}

/// Write `No files found.` or a `name (id)` line per entry.
pub fn render<W: Write>(files: &[FileEntry], out: &mut W) -> io::Result<()> {
    if files.is_empty() {
        writeln!(out, "No files found.")?;
        return Ok(());
    }

    writeln!(out, "Files:")?;
    for file in files {
        writeln!(out, "{}", file)?;
    }
    Ok(())
}
